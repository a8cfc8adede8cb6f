//! Profile store — the one cache shared across screens.
//!
//! The app never mutates this directly; the profile sub-client drives it and
//! hands out clones via `snapshot()`.

use super::{Address, Profile, WalletAccount};
use crate::domain::wallet::{BalanceReading, BalanceSource};
use crate::shared::{Epoch, Ticket};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

pub const FETCH_FAILED: &str = "Failed to fetch user data";

/// Partial update applied by [`ProfileStore::update_user`]. `None` leaves the
/// field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub mobile_no: Option<String>,
    pub date_of_birth: Option<Option<NaiveDate>>,
    pub gender: Option<String>,
}

/// What a `fetch_user` call ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Guard tripped: no session, a fetch in flight, or a cached user.
    Skipped,
    Loaded,
    Failed(String),
    /// A newer fetch or a sign-out superseded this one; its result was dropped.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    user: Option<Profile>,
    loading: bool,
    error: Option<String>,
    initialized: bool,
    balance: Option<BalanceReading>,
    epoch: Epoch,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Fetch lifecycle ──────────────────────────────────────────────────

    /// Reentrancy guard. Returns a ticket when a network fetch should start.
    ///
    /// A forced fetch always starts and supersedes any fetch in flight.
    pub fn begin_fetch(&mut self, has_session: bool, force: bool) -> Option<Ticket> {
        if !has_session {
            return None;
        }
        if !force && (self.loading || self.user.is_some()) {
            return None;
        }
        self.epoch.advance();
        self.loading = true;
        self.error = None;
        Some(self.epoch.ticket())
    }

    /// Apply a fetch result. Stale tickets are dropped and reported as such.
    pub fn finish_fetch(
        &mut self,
        ticket: Ticket,
        result: Result<Profile, String>,
        observed_at: DateTime<Utc>,
    ) -> FetchOutcome {
        if !self.epoch.is_current(ticket) {
            return FetchOutcome::Stale;
        }
        self.loading = false;
        self.initialized = true;
        match result {
            Ok(profile) => {
                self.record_balance(BalanceReading {
                    amount: profile.wallet_balance(),
                    observed_at,
                    source: BalanceSource::Profile,
                });
                self.user = Some(profile);
                self.error = None;
                FetchOutcome::Loaded
            }
            Err(message) => {
                self.user = None;
                self.balance = None;
                self.error = Some(message.clone());
                FetchOutcome::Failed(message)
            }
        }
    }

    // ── Optimistic patches ───────────────────────────────────────────────

    /// Merge `patch` into the cached user. No-op without a user.
    pub fn update_user(&mut self, patch: ProfilePatch) {
        let Some(user) = self.user.as_mut() else {
            return;
        };
        if let Some(v) = patch.first_name {
            user.first_name = v;
        }
        if let Some(v) = patch.last_name {
            user.last_name = v;
        }
        if let Some(v) = patch.email {
            user.email = v;
        }
        if let Some(v) = patch.mobile_no {
            user.mobile_no = v;
        }
        if let Some(v) = patch.date_of_birth {
            user.date_of_birth = v;
        }
        if let Some(v) = patch.gender {
            user.gender = v;
        }
    }

    pub fn update_user_address(&mut self, address: Vec<Address>) {
        if let Some(user) = self.user.as_mut() {
            user.address = address;
        }
    }

    pub fn update_user_wallet(&mut self, wallet: Vec<WalletAccount>) {
        if let Some(user) = self.user.as_mut() {
            user.wallet = wallet;
            let amount = user.wallet_balance();
            self.record_balance(BalanceReading::local(amount));
        }
    }

    /// Set the first wallet's balance. No-op without a user or a wallet.
    pub fn update_wallet_balance(&mut self, balance: Decimal) {
        let Some(wallet) = self.user.as_mut().and_then(|u| u.wallet.first_mut()) else {
            return;
        };
        wallet.balance = balance;
        self.record_balance(BalanceReading::local(balance));
    }

    /// Forget everything, including fetches in flight.
    pub fn clear_user(&mut self) {
        self.user = None;
        self.error = None;
        self.loading = false;
        self.initialized = false;
        self.balance = None;
        self.epoch.advance();
    }

    /// Fold in a balance observed elsewhere; the newer reading wins.
    pub fn record_balance(&mut self, reading: BalanceReading) {
        self.balance = Some(BalanceReading::reconcile(self.balance.take(), reading));
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub fn user(&self) -> Option<&Profile> {
        self.user.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn balance_reading(&self) -> Option<&BalanceReading> {
        self.balance.as_ref()
    }

    /// Reconciled wallet balance; falls back to the profile snapshot.
    pub fn wallet_balance(&self) -> Decimal {
        self.balance
            .as_ref()
            .map(|b| b.amount)
            .or_else(|| self.user.as_ref().map(Profile::wallet_balance))
            .unwrap_or(Decimal::ZERO)
    }

    pub fn full_name(&self) -> String {
        self.user.as_ref().map(Profile::full_name).unwrap_or_default()
    }

    pub fn primary_address(&self) -> Option<&Address> {
        self.user.as_ref().and_then(Profile::primary_address)
    }

    pub fn is_profile_complete(&self) -> bool {
        self.user.as_ref().is_some_and(Profile::is_complete)
    }

    pub fn has_kyc(&self) -> bool {
        self.user.as_ref().is_some_and(Profile::has_kyc)
    }
}
