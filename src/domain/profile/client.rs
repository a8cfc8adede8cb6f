//! Profile sub-client — cached profile fetch, profile and address edits.

use crate::auth::SessionEvent;
use crate::client::PortalClient;
use crate::domain::profile::forms::{ADDRESS_SAVE_FAILED, PROFILE_UPDATE_FAILED};
use crate::domain::profile::state::FETCH_FAILED;
use crate::domain::profile::wire::{AddressRequest, ProfileResponse};
use crate::domain::profile::{
    Address, AddressForm, FetchOutcome, Profile, ProfileForm, ProfilePatch, ProfileStore,
    WalletAccount,
};
use crate::error::{SdkError, GENERAL};
use crate::http::RetryPolicy;
use crate::shared::Envelope;
use chrono::Utc;
use rust_decimal::Decimal;

pub struct ProfileClient<'a> {
    pub(crate) client: &'a PortalClient,
}

impl<'a> ProfileClient<'a> {
    /// `GET /profile`, uncached. The backend wraps the profile in a one-element
    /// array.
    pub async fn get(&self) -> Result<Profile, SdkError> {
        let url = self.client.http.url("/profile");
        let envelope: Envelope<Vec<ProfileResponse>> = self
            .client
            .http
            .get(&url, self.client.get_retry.clone())
            .await?;
        let message = envelope.message;
        envelope
            .data
            .into_iter()
            .next()
            .map(Profile::from)
            .ok_or_else(|| SdkError::Other(message.unwrap_or_else(|| FETCH_FAILED.to_string())))
    }

    /// Load the profile into the shared store.
    ///
    /// Skipped without a session, while another fetch is in flight, or when a
    /// user is already cached, unless `force` is set.
    pub async fn fetch_user(&self, force: bool) -> FetchOutcome {
        let has_session = self.client.session.is_authenticated().await;
        let ticket = match self
            .client
            .profile_store
            .write()
            .await
            .begin_fetch(has_session, force)
        {
            Some(ticket) => ticket,
            None => return FetchOutcome::Skipped,
        };

        let result = self.get().await.map_err(|e| match e {
            SdkError::Other(message) => message,
            other => {
                tracing::warn!(error = %other, "Profile fetch failed");
                FETCH_FAILED.to_string()
            }
        });

        let outcome = self
            .client
            .profile_store
            .write()
            .await
            .finish_fetch(ticket, result, Utc::now());
        tracing::debug!(?outcome, force, "Profile fetch finished");
        outcome
    }

    pub async fn refresh_user(&self) -> FetchOutcome {
        self.fetch_user(true).await
    }

    /// React to a session change: sign-in loads the profile, sign-out clears it.
    pub async fn apply_session_event(&self, event: &SessionEvent) -> FetchOutcome {
        match event {
            SessionEvent::SignedIn(session) => {
                {
                    let mut store = self.client.profile_store.write().await;
                    if store.user().is_some_and(|u| u.id != session.user_id) {
                        store.clear_user();
                    }
                }
                self.fetch_user(false).await
            }
            SessionEvent::SignedOut => {
                self.client.profile_store.write().await.clear_user();
                FetchOutcome::Skipped
            }
        }
    }

    // ── Snapshot and derived values ──────────────────────────────────────

    pub async fn snapshot(&self) -> ProfileStore {
        self.client.profile_store.read().await.clone()
    }

    pub async fn user(&self) -> Option<Profile> {
        self.client.profile_store.read().await.user().cloned()
    }

    pub async fn wallet_balance(&self) -> Decimal {
        self.client.profile_store.read().await.wallet_balance()
    }

    pub async fn full_name(&self) -> String {
        self.client.profile_store.read().await.full_name()
    }

    pub async fn primary_address(&self) -> Option<Address> {
        self.client
            .profile_store
            .read()
            .await
            .primary_address()
            .cloned()
    }

    pub async fn is_profile_complete(&self) -> bool {
        self.client.profile_store.read().await.is_profile_complete()
    }

    pub async fn has_kyc(&self) -> bool {
        self.client.profile_store.read().await.has_kyc()
    }

    // ── Optimistic patches ───────────────────────────────────────────────

    pub async fn update_user(&self, patch: ProfilePatch) {
        self.client.profile_store.write().await.update_user(patch);
    }

    pub async fn update_user_address(&self, address: Vec<Address>) {
        self.client
            .profile_store
            .write()
            .await
            .update_user_address(address);
    }

    pub async fn update_user_wallet(&self, wallet: Vec<WalletAccount>) {
        self.client
            .profile_store
            .write()
            .await
            .update_user_wallet(wallet);
    }

    pub async fn update_wallet_balance(&self, balance: Decimal) {
        self.client
            .profile_store
            .write()
            .await
            .update_wallet_balance(balance);
    }

    pub async fn clear_user(&self) {
        self.client.profile_store.write().await.clear_user();
    }

    // ── Forms ────────────────────────────────────────────────────────────

    /// Profile form pre-filled from the cached user.
    pub async fn profile_form(&self) -> Option<ProfileForm> {
        self.client
            .profile_store
            .read()
            .await
            .user()
            .map(ProfileForm::from_profile)
    }

    /// Address form pre-filled from the primary address; blank if none.
    pub async fn address_form(&self) -> AddressForm {
        self.client
            .profile_store
            .read()
            .await
            .user()
            .map(AddressForm::from_profile)
            .unwrap_or_default()
    }

    /// Validate and `PATCH /profile`, then re-fetch. Errors are also written
    /// into `form.errors` so the form can stay open with the entered data.
    pub async fn update_profile(&self, form: &mut ProfileForm) -> Result<(), SdkError> {
        let request = match form.validate(Utc::now().date_naive()) {
            Ok(request) => request,
            Err(errors) => {
                form.errors = errors.clone();
                return Err(errors.into());
            }
        };
        form.errors.clear(GENERAL);

        let url = self.client.http.url("/profile");
        if let Err(e) = self
            .client
            .http
            .patch::<serde_json::Value, _>(&url, &request, RetryPolicy::None)
            .await
        {
            let e = SdkError::from(e);
            form.errors.insert(GENERAL, e.user_message(PROFILE_UPDATE_FAILED));
            return Err(e);
        }

        self.refresh_user().await;
        Ok(())
    }

    /// Validate and save the address: `POST /address` for a new one,
    /// `PATCH /address` with its id otherwise. Re-fetches afterwards.
    pub async fn save_address(&self, form: &mut AddressForm) -> Result<(), SdkError> {
        let request: AddressRequest = match form.validate() {
            Ok(request) => request,
            Err(errors) => {
                form.errors = errors.clone();
                return Err(errors.into());
            }
        };
        form.errors.clear(GENERAL);

        let url = self.client.http.url("/address");
        let result = if request.id.is_some() {
            self.client
                .http
                .patch::<serde_json::Value, _>(&url, &request, RetryPolicy::None)
                .await
        } else {
            self.client
                .http
                .post::<serde_json::Value, _>(&url, &request, RetryPolicy::None)
                .await
        };
        if let Err(e) = result {
            let e = SdkError::from(e);
            form.errors.insert(GENERAL, e.user_message(ADDRESS_SAVE_FAILED));
            return Err(e);
        }

        self.refresh_user().await;
        Ok(())
    }
}
