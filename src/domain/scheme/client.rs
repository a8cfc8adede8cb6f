//! Schemes sub-client — catalog, subscriptions and payment setup.

use crate::client::PortalClient;
use crate::domain::scheme::wire::{SchemeResponse, SelectSchemeRequest, SelectedSchemeResponse};
use crate::domain::scheme::{Scheme, SchemesState, SelectedScheme};
use crate::error::SdkError;
use crate::http::RetryPolicy;
use crate::shared::Envelope;

pub struct SchemesClient<'a> {
    pub(crate) client: &'a PortalClient,
}

impl<'a> SchemesClient<'a> {
    /// `GET /scheme`.
    pub async fn list(&self) -> Result<Vec<Scheme>, SdkError> {
        let url = self.client.http.url("/scheme");
        let envelope: Envelope<Vec<SchemeResponse>> = self
            .client
            .http
            .get(&url, self.client.get_retry.clone())
            .await?;
        Ok(envelope.data.into_iter().map(Scheme::from).collect())
    }

    /// `GET /scheme-selected`.
    pub async fn selected(&self) -> Result<Vec<SelectedScheme>, SdkError> {
        let url = self.client.http.url("/scheme-selected");
        let envelope: Envelope<Vec<SelectedSchemeResponse>> = self
            .client
            .http
            .get(&url, self.client.get_retry.clone())
            .await?;
        Ok(envelope.data.into_iter().map(SelectedScheme::from).collect())
    }

    /// `POST /scheme`. An envelope with `success: false` is an error.
    pub async fn select(&self, request: &SelectSchemeRequest) -> Result<(), SdkError> {
        let url = self.client.http.url("/scheme");
        let envelope: Envelope<serde_json::Value> = self
            .client
            .http
            .post(&url, request, RetryPolicy::None)
            .await?;
        if envelope.is_rejected() {
            return Err(SdkError::Rejected(envelope.message.unwrap_or_default()));
        }
        Ok(())
    }

    pub async fn load_catalog(&self, state: &mut SchemesState) {
        let ticket = state.begin_catalog_load();
        let result = self.list().await.map_err(|e| {
            tracing::warn!(error = %e, view = "catalog", "Scheme catalog fetch failed");
            e.reason()
        });
        state.finish_catalog_load(ticket, result);
    }

    pub async fn load_subscriptions(&self, state: &mut SchemesState) {
        let ticket = state.begin_subscriptions_load();
        let result = self.selected().await.map_err(|e| {
            tracing::warn!(error = %e, view = "subscriptions", "Selected schemes fetch failed");
            e.reason()
        });
        state.finish_subscriptions_load(ticket, result);
    }

    /// Submit the open payment form; on success the subscriptions are
    /// fetched again. Returns `Ok(false)` when nothing was sent.
    pub async fn submit_payment(&self, state: &mut SchemesState) -> Result<bool, SdkError> {
        let Some((ticket, request)) = state.begin_payment() else {
            return Ok(false);
        };

        let result = self.select(&request).await;
        state.finish_payment(ticket, result.as_ref().map(|_| ()));
        match result {
            Ok(()) => {
                tracing::info!(scheme_id = %request.scheme_id, "Scheme payment set up");
                self.load_subscriptions(state).await;
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }
}
