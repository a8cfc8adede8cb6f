//! Wallet domain — balance, deposits and the merged transaction timeline.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod state;
pub mod wire;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::{DepositForm, WalletView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    SchemePayment,
    AimPayment,
}

impl TransactionKind {
    /// Money leaving the wallet.
    pub fn is_debit(&self) -> bool {
        !matches!(self, TransactionKind::Deposit)
    }
}

/// One row of the merged wallet timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Backend id, or `temp-<uuid>` for a locally created entry.
    pub id: String,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub date: Option<DateTime<Utc>>,
    pub description: String,
    pub status: String,
    pub transaction_id: Option<String>,
    /// Created locally after a deposit and not yet seen in a fetch.
    pub unconfirmed: bool,
}

pub const DEPOSIT_DESCRIPTION: &str = "Wallet Deposit";
pub const AIM_PAYMENT_DESCRIPTION: &str = "AIM Payment";
pub const REQUESTED_STATUS: &str = "requested";
const TEMP_ID_PREFIX: &str = "temp-";

impl Transaction {
    /// Locally created deposit shown until the next successful fetch.
    pub fn optimistic_deposit(amount: Decimal, transaction_id: &str, at: DateTime<Utc>) -> Self {
        Self {
            id: format!("{}{}", TEMP_ID_PREFIX, uuid::Uuid::new_v4()),
            kind: TransactionKind::Deposit,
            amount,
            date: Some(at),
            description: DEPOSIT_DESCRIPTION.to_string(),
            status: REQUESTED_STATUS.to_string(),
            transaction_id: Some(transaction_id.to_string()),
            unconfirmed: true,
        }
    }

    pub fn is_temporary(&self) -> bool {
        self.id.starts_with(TEMP_ID_PREFIX)
    }
}

/// Sort newest first. Undated entries go last; ties keep their order.
pub fn sort_timeline(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletSummary {
    pub balance: Decimal,
    pub credit: Decimal,
    pub debit: Decimal,
}

/// Everything `GET /transaction` yields, already merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalletOverview {
    pub summary: WalletSummary,
    pub transactions: Vec<Transaction>,
}

impl WalletOverview {
    pub fn unconfirmed(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| t.unconfirmed)
    }
}

// ─── Balance reconciliation ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BalanceSource {
    /// `wallet[0].balance` of the profile.
    Profile,
    /// `wallet[0].balance` of the transaction history.
    Transactions,
    /// An optimistic local patch.
    Local,
}

/// A balance value and when it was observed.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceReading {
    pub amount: Decimal,
    pub observed_at: DateTime<Utc>,
    pub source: BalanceSource,
}

impl BalanceReading {
    pub fn local(amount: Decimal) -> Self {
        Self {
            amount,
            observed_at: Utc::now(),
            source: BalanceSource::Local,
        }
    }

    /// Last write wins by observation time; on a tie the incoming reading wins.
    pub fn reconcile(current: Option<BalanceReading>, incoming: BalanceReading) -> BalanceReading {
        match current {
            Some(current) if current.observed_at > incoming.observed_at => current,
            _ => incoming,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn tx(id: &str, minutes_ago: Option<i64>) -> Transaction {
        Transaction {
            id: id.into(),
            kind: TransactionKind::Deposit,
            amount: dec!(1),
            date: minutes_ago.map(|m| Utc::now() - Duration::minutes(m)),
            description: DEPOSIT_DESCRIPTION.into(),
            status: "approved".into(),
            transaction_id: None,
            unconfirmed: false,
        }
    }

    #[test]
    fn test_sort_newest_first_undated_last() {
        let mut list = vec![tx("old", Some(60)), tx("none", None), tx("new", Some(1))];
        sort_timeline(&mut list);
        let ids: Vec<_> = list.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["new", "old", "none"]);
    }

    #[test]
    fn test_optimistic_deposit_shape() {
        let t = Transaction::optimistic_deposit(dec!(100.00), "TXN123", Utc::now());
        assert!(t.is_temporary());
        assert!(t.unconfirmed);
        assert_eq!(t.status, REQUESTED_STATUS);
        assert_eq!(t.transaction_id.as_deref(), Some("TXN123"));
        assert!(!t.kind.is_debit());
    }

    #[test]
    fn test_reconcile_tie_prefers_incoming() {
        let at = Utc::now();
        let a = BalanceReading {
            amount: dec!(1),
            observed_at: at,
            source: BalanceSource::Profile,
        };
        let b = BalanceReading {
            amount: dec!(2),
            observed_at: at,
            source: BalanceSource::Transactions,
        };
        assert_eq!(BalanceReading::reconcile(Some(a.clone()), b.clone()), b);
        let older = BalanceReading {
            observed_at: at - Duration::seconds(1),
            ..b
        };
        assert_eq!(BalanceReading::reconcile(Some(a.clone()), older), a);
    }
}
