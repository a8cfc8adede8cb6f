//! Conversions from wire types to scheme domain types.

use super::wire::{SchemeRefResponse, SchemeResponse, SelectedSchemeResponse};
use super::{Scheme, SchemePayment, SelectedScheme};
use crate::domain::wallet::wire::PaymentRecordResponse;
use rust_decimal::Decimal;

impl From<SchemeResponse> for Scheme {
    fn from(s: SchemeResponse) -> Self {
        Self {
            id: s.id,
            name: s.name,
            amount: s.amount,
            monthly_pay: s.monthly_pay,
            months: s.months,
            bonus: s.bonus,
        }
    }
}

impl From<SchemeRefResponse> for Scheme {
    fn from(r: SchemeRefResponse) -> Self {
        match r {
            SchemeRefResponse::Populated(s) => s.into(),
            SchemeRefResponse::Id(id) => Self {
                id,
                name: String::new(),
                amount: Decimal::ZERO,
                monthly_pay: Decimal::ZERO,
                months: 0,
                bonus: Decimal::ZERO,
            },
        }
    }
}

impl From<PaymentRecordResponse> for SchemePayment {
    fn from(p: PaymentRecordResponse) -> Self {
        Self {
            id: p.id,
            amount: p.paid_amount,
            paid_at: p.paid_at,
            status: p.status,
        }
    }
}

impl From<SelectedSchemeResponse> for SelectedScheme {
    fn from(s: SelectedSchemeResponse) -> Self {
        Self {
            id: s.id,
            scheme: s.scheme_id.into(),
            balance_payout: s.balance_payout,
            payment_date: s.payment_date,
            payment_history: s.payment_history.into_iter().map(Into::into).collect(),
            selected_at: s.selected_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_selected_scheme_populated() {
        let json = r#"{
            "_id": "sel1",
            "scheme_id": {"_id": "s1", "name": "Gold Saver", "amount": 1200, "monthly_pay": "100", "months": 12, "bonus": 100},
            "balance_payout": 900,
            "payment_date": 5,
            "payment_history": [{"_id": "p1", "paid_amount": 300, "paidAt": "2026-01-05T10:00:00Z"}],
            "selectedAt": "2026-01-01T00:00:00Z"
        }"#;
        let resp: SelectedSchemeResponse = serde_json::from_str(json).unwrap();
        let s = SelectedScheme::from(resp);
        assert_eq!(s.scheme.name, "Gold Saver");
        assert_eq!(s.scheme.monthly_pay, dec!(100));
        assert_eq!(s.paid_amount(), dec!(300));
        assert_eq!(s.payment_history[0].amount, dec!(300));
        assert!(s.selected_at.is_some());
    }

    #[test]
    fn test_selected_scheme_bare_id() {
        let json = r#"{"_id": "sel2", "scheme_id": "s9", "balance_payout": 0, "payment_date": 1}"#;
        let s = SelectedScheme::from(serde_json::from_str::<SelectedSchemeResponse>(json).unwrap());
        assert_eq!(s.scheme.id.as_str(), "s9");
        assert!(s.payment_history.is_empty());
    }
}
