//! Wire types for `/aim`, `/aim-calculation` and `/aim/payment`.

use super::PaymentCycle;
use crate::shared::serde_util::{lenient_datetime, lenient_decimal};
use crate::shared::RecordId;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One element of `GET /aim` → `data[]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AimResponse {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "lenient_decimal")]
    pub amount: Decimal,
    #[serde(default)]
    pub months: u32,
    #[serde(default)]
    pub payment_cycle: Option<String>,
    #[serde(default, with = "lenient_decimal")]
    pub calculated_emi: Decimal,
    #[serde(default, with = "lenient_decimal")]
    pub current_saved: Decimal,
    #[serde(default, with = "lenient_datetime")]
    pub next_payment_date: Option<DateTime<Utc>>,
}

/// Body of `POST /aim-calculation`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AimCalculationRequest {
    pub months: u32,
    pub amount: Decimal,
    pub payment_cycle: PaymentCycle,
}

/// `POST /aim-calculation` → `data`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AimCalculationResponse {
    #[serde(rename = "calculatedEmi", alias = "calculated_emi", with = "lenient_decimal")]
    pub calculated_emi: Decimal,
    #[serde(default, rename = "totalPayments", alias = "total_payments")]
    pub total_payments: u32,
    #[serde(
        default,
        rename = "totalAmount",
        alias = "total_amount",
        with = "lenient_decimal"
    )]
    pub total_amount: Decimal,
    #[serde(default, rename = "endDate", alias = "end_date")]
    pub end_date: Option<String>,
}

/// Body of `POST /aim`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddAimRequest {
    pub name: String,
    pub months: u32,
    pub amount: Decimal,
    pub payment_cycle: PaymentCycle,
    pub calculated_emi: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
}
