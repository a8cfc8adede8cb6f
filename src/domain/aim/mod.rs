//! Aim domain — user-defined savings goals with a backend-computed plan.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod state;
pub mod wire;

use crate::shared::{progress_percent, RecordId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use state::{AimForm, AimsState, AimsView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentCycle {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl PaymentCycle {
    pub const ALL: [PaymentCycle; 3] = [PaymentCycle::Daily, PaymentCycle::Weekly, PaymentCycle::Monthly];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentCycle::Daily => "daily",
            PaymentCycle::Weekly => "weekly",
            PaymentCycle::Monthly => "monthly",
        }
    }

    /// Unit shown after an instalment ("per day").
    pub fn unit(&self) -> &'static str {
        match self {
            PaymentCycle::Daily => "day",
            PaymentCycle::Weekly => "week",
            PaymentCycle::Monthly => "month",
        }
    }
}

impl fmt::Display for PaymentCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentCycle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(PaymentCycle::Daily),
            "weekly" => Ok(PaymentCycle::Weekly),
            "monthly" => Ok(PaymentCycle::Monthly),
            other => Err(format!("Unknown payment cycle: {}", other)),
        }
    }
}

/// A savings goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aim {
    pub id: RecordId,
    pub name: String,
    pub amount: Decimal,
    pub months: u32,
    pub payment_cycle: PaymentCycle,
    pub calculated_emi: Decimal,
    pub current_saved: Decimal,
    pub next_payment_date: Option<DateTime<Utc>>,
}

/// Where an aim stands relative to its next instalment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AimStatus {
    Completed,
    Overdue,
    /// Due within a week; carries the days left.
    DueSoon(i64),
    Active(i64),
}

impl AimStatus {
    pub fn label(&self) -> String {
        match self {
            AimStatus::Completed => "Completed".to_string(),
            AimStatus::Overdue => "Payment Overdue".to_string(),
            AimStatus::DueSoon(days) => format!("Payment due in {} days", days),
            AimStatus::Active(days) => format!("Next payment: {} days", days),
        }
    }
}

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const DUE_SOON_DAYS: i64 = 7;

impl Aim {
    pub fn progress(&self) -> Decimal {
        progress_percent(self.current_saved, self.amount)
    }

    /// Whole days until the next instalment, rounded up. An aim without a
    /// scheduled instalment is due now.
    pub fn days_until_payment(&self, now: DateTime<Utc>) -> i64 {
        let next = self.next_payment_date.unwrap_or(now);
        let seconds = (next - now).num_seconds();
        seconds.div_euclid(SECONDS_PER_DAY) + i64::from(seconds.rem_euclid(SECONDS_PER_DAY) > 0)
    }

    pub fn status(&self, now: DateTime<Utc>) -> AimStatus {
        if self.amount > Decimal::ZERO && self.current_saved >= self.amount {
            return AimStatus::Completed;
        }
        match self.days_until_payment(now) {
            days if days < 0 => AimStatus::Overdue,
            days if days <= DUE_SOON_DAYS => AimStatus::DueSoon(days),
            days => AimStatus::Active(days),
        }
    }
}

/// Result of `POST /aim-calculation`. Held only by the form it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AimCalculation {
    pub calculated_emi: Decimal,
    pub total_payments: u32,
    pub total_amount: Decimal,
    /// As formatted by the backend.
    pub end_date: Option<String>,
}

/// An instalment paid towards an aim (`GET /aim/payment`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AimPayment {
    pub id: Option<RecordId>,
    pub amount: Decimal,
    pub created_at: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub transaction_id: Option<String>,
}


#[cfg(test)]
mod tests {
    use super::fixtures::aim;
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_buckets() {
        let now = Utc::now();
        assert_eq!(aim(dec!(2000), None).status(now), AimStatus::Completed);
        assert_eq!(
            aim(dec!(0), Some(now - Duration::days(2))).status(now),
            AimStatus::Overdue
        );
        assert_eq!(
            aim(dec!(0), Some(now + Duration::hours(30))).status(now),
            AimStatus::DueSoon(2)
        );
        assert_eq!(
            aim(dec!(0), Some(now + Duration::days(7))).status(now),
            AimStatus::DueSoon(7)
        );
        assert_eq!(
            aim(dec!(0), Some(now + Duration::days(10))).status(now),
            AimStatus::Active(10)
        );
        assert_eq!(aim(dec!(0), None).status(now), AimStatus::DueSoon(0));
    }

    #[test]
    fn test_progress_and_labels() {
        assert_eq!(aim(dec!(500), None).progress(), dec!(25));
        assert_eq!(AimStatus::DueSoon(3).label(), "Payment due in 3 days");
        assert_eq!(AimStatus::Overdue.label(), "Payment Overdue");
    }

    #[test]
    fn test_payment_cycle_parse() {
        assert_eq!("Weekly".parse::<PaymentCycle>(), Ok(PaymentCycle::Weekly));
        assert!("yearly".parse::<PaymentCycle>().is_err());
        assert_eq!(
            serde_json::to_string(&PaymentCycle::Monthly).unwrap(),
            "\"monthly\""
        );
    }
}
