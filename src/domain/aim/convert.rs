//! Conversions from wire types to aim domain types.

use super::wire::{AimCalculationResponse, AimResponse};
use super::{Aim, AimCalculation, AimPayment};
use crate::domain::wallet::wire::AimPaymentResponse;

impl From<AimResponse> for Aim {
    fn from(a: AimResponse) -> Self {
        Self {
            id: a.id,
            name: a.name,
            amount: a.amount,
            months: a.months,
            payment_cycle: a
                .payment_cycle
                .and_then(|c| c.parse().ok())
                .unwrap_or_default(),
            calculated_emi: a.calculated_emi,
            current_saved: a.current_saved,
            next_payment_date: a.next_payment_date,
        }
    }
}

impl From<AimCalculationResponse> for AimCalculation {
    fn from(c: AimCalculationResponse) -> Self {
        Self {
            calculated_emi: c.calculated_emi,
            total_payments: c.total_payments,
            total_amount: c.total_amount,
            end_date: c.end_date.filter(|d| !d.trim().is_empty()),
        }
    }
}

impl From<AimPaymentResponse> for AimPayment {
    fn from(p: AimPaymentResponse) -> Self {
        Self {
            id: p.id,
            amount: p.amount,
            created_at: p.created_at,
            status: p.status,
            transaction_id: p.transaction_id,
        }
    }
}
