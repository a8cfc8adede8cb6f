//! Scheme domain — the savings catalog and the user's subscriptions.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod state;
pub mod wire;

use crate::shared::{progress_percent, RecordId};
use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::{PaymentForm, SchemesState, SchemesView};

/// A fixed-term savings product offered by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    pub id: RecordId,
    pub name: String,
    /// Target amount, bonus included.
    pub amount: Decimal,
    pub monthly_pay: Decimal,
    pub months: u32,
    pub bonus: Decimal,
}

impl Scheme {
    /// Bonus relative to the contributed amount, in percent.
    pub fn bonus_rate(&self) -> Decimal {
        let contributed = self.amount - self.bonus;
        if contributed <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.bonus / contributed * Decimal::ONE_HUNDRED
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemePayment {
    pub id: Option<RecordId>,
    pub amount: Decimal,
    pub paid_at: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

/// The user's subscription to a scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedScheme {
    pub id: RecordId,
    pub scheme: Scheme,
    /// Amount still to be paid.
    pub balance_payout: Decimal,
    /// Day of month the instalment is due (1–31).
    pub payment_date: u32,
    pub payment_history: Vec<SchemePayment>,
    pub selected_at: Option<DateTime<Utc>>,
}

impl SelectedScheme {
    pub fn paid_amount(&self) -> Decimal {
        self.scheme.amount - self.balance_payout
    }

    pub fn progress(&self) -> Decimal {
        progress_percent(self.paid_amount(), self.scheme.amount)
    }

    pub fn payments_made(&self) -> u32 {
        self.payment_history.len() as u32
    }

    pub fn payments_remaining(&self) -> u32 {
        self.scheme.months.saturating_sub(self.payments_made())
    }

    pub fn is_completed(&self) -> bool {
        self.payments_remaining() == 0
    }

    pub fn total_paid(&self) -> Decimal {
        self.payment_history.iter().map(|p| p.amount).sum()
    }

    pub fn average_payment(&self) -> Option<Decimal> {
        if self.payment_history.is_empty() {
            return None;
        }
        Some(self.total_paid() / Decimal::from(self.payment_history.len()))
    }

    /// Payment history, newest first.
    pub fn history_newest_first(&self) -> Vec<&SchemePayment> {
        let mut history: Vec<_> = self.payment_history.iter().collect();
        history.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));
        history
    }

    /// Next due date strictly after `today`. Days past the end of a short
    /// month fall on its last day.
    pub fn next_payment_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        let this_month = due_in_month(today.year(), today.month(), self.payment_date)?;
        if this_month > today {
            return Some(this_month);
        }
        let next = today.with_day(1)?.checked_add_months(Months::new(1))?;
        due_in_month(next.year(), next.month(), self.payment_date)
    }

    /// First payment, else the subscription time, else `now`.
    pub fn start_date(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.payment_history
            .iter()
            .filter_map(|p| p.paid_at)
            .min()
            .or(self.selected_at)
            .unwrap_or(now)
    }

    pub fn expected_end_date(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.start_date(now)
            .checked_add_months(Months::new(self.scheme.months))
    }
}

fn due_in_month(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first
        .checked_add_months(Months::new(1))?
        .pred_opt()?
        .day();
    first.with_day(day.clamp(1, last))
}

/// Totals across all subscriptions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub schemes: usize,
    pub invested: Decimal,
    pub pending_balance: Decimal,
    pub bonus: Decimal,
}

impl Portfolio {
    pub fn of(subscriptions: &[SelectedScheme]) -> Self {
        subscriptions.iter().fold(
            Portfolio {
                schemes: subscriptions.len(),
                ..Portfolio::default()
            },
            |mut acc, s| {
                acc.invested += s.paid_amount();
                acc.pending_balance += s.balance_payout;
                acc.bonus += s.scheme.bonus;
                acc
            },
        )
    }
}
