//! Wallet screen state: the timeline plus the deposit modal.

use super::wire::DepositRequest;
use super::{sort_timeline, Transaction, WalletOverview};
use crate::shared::validate::parse_amount;
use crate::shared::{Epoch, Loadable, Ticket};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub const INVALID_AMOUNT: &str = "Please enter a valid amount";
pub const MISSING_TRANSACTION_ID: &str = "Please enter a transaction ID";
pub const DEPOSIT_FAILED: &str = "Failed to deposit money. Please try again.";
pub const DEPOSIT_REQUESTED: &str = "Deposit Request Successful!";
pub const HISTORY_FAILED: &str = "Failed to fetch transaction history";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepositForm {
    pub amount: String,
    pub transaction_id: String,
    pub error: Option<String>,
    pub submitting: bool,
    /// Set after an accepted deposit; the form inputs are cleared.
    pub succeeded: bool,
}

impl DepositForm {
    pub fn validate(&self) -> Result<DepositRequest, String> {
        let amount = parse_amount(&self.amount)
            .filter(|a| *a > Decimal::ZERO)
            .ok_or_else(|| INVALID_AMOUNT.to_string())?;
        let transaction_id = self.transaction_id.trim();
        if transaction_id.is_empty() {
            return Err(MISSING_TRANSACTION_ID.to_string());
        }
        Ok(DepositRequest {
            transaction_id: transaction_id.to_string(),
            amount,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct WalletView {
    epoch: Epoch,
    overview: Loadable<WalletOverview>,
    deposit: Option<DepositForm>,
    /// A refresh failed after the timeline was already shown.
    refresh_error: Option<String>,
}

impl WalletView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overview(&self) -> &Loadable<WalletOverview> {
        &self.overview
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.overview
            .value()
            .map(|o| o.transactions.as_slice())
            .unwrap_or_default()
    }

    pub fn deposit(&self) -> Option<&DepositForm> {
        self.deposit.as_ref()
    }

    pub fn deposit_mut(&mut self) -> Option<&mut DepositForm> {
        self.deposit.as_mut()
    }

    pub fn refresh_error(&self) -> Option<&str> {
        self.refresh_error.as_deref()
    }

    /// Abandon anything in flight (the screen was left).
    pub fn leave(&mut self) {
        self.epoch.advance();
    }

    // ── Timeline ─────────────────────────────────────────────────────────

    /// Start a fetch. A timeline already on screen stays visible meanwhile.
    pub fn begin_load(&mut self) -> Ticket {
        self.epoch.advance();
        if self.overview.value().is_none() {
            self.overview = Loadable::Loading;
        }
        self.epoch.ticket()
    }

    /// Apply a fetch result. A success replaces the timeline, dropping local
    /// entries; a failure after a timeline was shown keeps it, unconfirmed
    /// entries included. Returns `false` for a stale ticket.
    pub fn finish_load(&mut self, ticket: Ticket, result: Result<WalletOverview, String>) -> bool {
        if !self.epoch.is_current(ticket) {
            return false;
        }
        match result {
            Ok(overview) => {
                self.overview = Loadable::Loaded(overview);
                self.refresh_error = None;
            }
            Err(message) if self.overview.value().is_some() => {
                self.refresh_error = Some(message);
            }
            Err(message) => self.overview = Loadable::Failed(message),
        }
        true
    }

    /// Display the reconciled balance instead of the one in the response.
    pub fn set_balance(&mut self, balance: Decimal) {
        if let Some(overview) = self.overview.value_mut() {
            overview.summary.balance = balance;
        }
    }

    // ── Deposit modal ────────────────────────────────────────────────────

    pub fn open_deposit(&mut self) {
        self.deposit = Some(DepositForm::default());
    }

    /// Close the modal, discarding whatever was typed.
    pub fn close_deposit(&mut self) {
        self.deposit = None;
    }

    /// Validate the open form. On success the form is marked submitting and
    /// the request is returned with a ticket for [`finish_deposit`].
    ///
    /// [`finish_deposit`]: Self::finish_deposit
    pub fn begin_deposit(&mut self) -> Option<(Ticket, DepositRequest)> {
        let form = self.deposit.as_mut()?;
        match form.validate() {
            Ok(request) => {
                form.error = None;
                form.submitting = true;
                Some((self.epoch.ticket(), request))
            }
            Err(message) => {
                form.error = Some(message);
                None
            }
        }
    }

    /// Apply the deposit result. An accepted deposit puts a `requested` entry
    /// at the top of the timeline right away.
    pub fn finish_deposit(
        &mut self,
        ticket: Ticket,
        request: &DepositRequest,
        result: Result<(), String>,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.epoch.is_current(ticket) {
            return false;
        }
        let Some(form) = self.deposit.as_mut() else {
            return false;
        };
        form.submitting = false;
        match result {
            Ok(()) => {
                form.succeeded = true;
                form.amount.clear();
                form.transaction_id.clear();
                let entry =
                    Transaction::optimistic_deposit(request.amount, &request.transaction_id, now);
                match self.overview.value_mut() {
                    Some(overview) => {
                        overview.transactions.insert(0, entry);
                        sort_timeline(&mut overview.transactions);
                    }
                    None => {
                        self.overview = Loadable::Loaded(WalletOverview {
                            transactions: vec![entry],
                            ..WalletOverview::default()
                        });
                    }
                }
            }
            Err(message) => form.error = Some(message),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::wallet::{TransactionKind, REQUESTED_STATUS};
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn existing(minutes_ago: i64) -> Transaction {
        Transaction {
            id: "w1".into(),
            kind: TransactionKind::Deposit,
            amount: dec!(500),
            date: Some(Utc::now() - Duration::minutes(minutes_ago)),
            description: "Wallet Deposit".into(),
            status: "approved".into(),
            transaction_id: Some("TXN0".into()),
            unconfirmed: false,
        }
    }

    fn loaded_view() -> WalletView {
        let mut view = WalletView::new();
        let ticket = view.begin_load();
        view.finish_load(
            ticket,
            Ok(WalletOverview {
                transactions: vec![existing(5)],
                ..WalletOverview::default()
            }),
        );
        view
    }

    #[test]
    fn test_deposit_validation_messages() {
        let mut form = DepositForm::default();
        assert_eq!(form.validate().unwrap_err(), INVALID_AMOUNT);
        form.amount = "-5".into();
        assert_eq!(form.validate().unwrap_err(), INVALID_AMOUNT);
        form.amount = "100.00".into();
        assert_eq!(form.validate().unwrap_err(), MISSING_TRANSACTION_ID);
        form.transaction_id = "  TXN123 ".into();
        let req = form.validate().unwrap();
        assert_eq!(req.transaction_id, "TXN123");
        assert_eq!(req.amount, dec!(100.00));
    }

    #[test]
    fn test_accepted_deposit_goes_on_top_before_refetch() {
        let mut view = loaded_view();
        view.open_deposit();
        let form = view.deposit_mut().unwrap();
        form.amount = "100.00".into();
        form.transaction_id = "TXN123".into();

        let (ticket, request) = view.begin_deposit().unwrap();
        assert!(view.deposit().unwrap().submitting);
        assert!(view.finish_deposit(ticket, &request, Ok(()), Utc::now()));

        let top = &view.transactions()[0];
        assert_eq!(top.status, REQUESTED_STATUS);
        assert_eq!(top.amount, dec!(100.00));
        assert_eq!(top.transaction_id.as_deref(), Some("TXN123"));
        assert!(top.unconfirmed);
        assert_eq!(view.transactions().len(), 2);
        assert!(view.deposit().unwrap().succeeded);
        assert!(view.deposit().unwrap().amount.is_empty());
    }

    #[test]
    fn test_failed_refetch_keeps_unconfirmed_entry() {
        let mut view = loaded_view();
        view.open_deposit();
        let form = view.deposit_mut().unwrap();
        form.amount = "20".into();
        form.transaction_id = "TXN9".into();
        let (ticket, request) = view.begin_deposit().unwrap();
        view.finish_deposit(ticket, &request, Ok(()), Utc::now());

        let ticket = view.begin_load();
        view.finish_load(ticket, Err(HISTORY_FAILED.into()));
        assert_eq!(view.refresh_error(), Some(HISTORY_FAILED));
        assert_eq!(view.overview().value().unwrap().unconfirmed().count(), 1);

        let ticket = view.begin_load();
        view.finish_load(ticket, Ok(WalletOverview::default()));
        assert!(view.transactions().is_empty());
        assert!(view.refresh_error().is_none());
    }

    #[test]
    fn test_rejected_deposit_keeps_input() {
        let mut view = loaded_view();
        view.open_deposit();
        let form = view.deposit_mut().unwrap();
        form.amount = "20".into();
        form.transaction_id = "TXN9".into();
        let (ticket, request) = view.begin_deposit().unwrap();
        view.finish_deposit(ticket, &request, Err(DEPOSIT_FAILED.into()), Utc::now());
        let form = view.deposit().unwrap();
        assert_eq!(form.error.as_deref(), Some(DEPOSIT_FAILED));
        assert_eq!(form.amount, "20");
        assert_eq!(view.transactions().len(), 1);
    }

    #[test]
    fn test_initial_failure_is_terminal_and_stale_results_dropped() {
        let mut view = WalletView::new();
        let stale = view.begin_load();
        let current = view.begin_load();
        assert!(!view.finish_load(stale, Ok(WalletOverview::default())));
        assert!(view.overview().is_loading());
        view.finish_load(current, Err(HISTORY_FAILED.into()));
        assert_eq!(view.overview().error(), Some(HISTORY_FAILED));

        let ticket = view.begin_load();
        view.leave();
        assert!(!view.finish_load(ticket, Ok(WalletOverview::default())));
    }
}
