//! Wire types for `/scheme` and `/scheme-selected`.

use crate::domain::wallet::wire::PaymentRecordResponse;
use crate::shared::serde_util::{lenient_datetime, lenient_decimal};
use crate::shared::RecordId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One element of `GET /scheme` → `data[]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemeResponse {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "lenient_decimal")]
    pub amount: Decimal,
    #[serde(default, with = "lenient_decimal")]
    pub monthly_pay: Decimal,
    #[serde(default)]
    pub months: u32,
    #[serde(default, with = "lenient_decimal")]
    pub bonus: Decimal,
}

/// `scheme_id` is populated on `GET /scheme-selected`, but older records may
/// carry the bare id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SchemeRefResponse {
    Populated(SchemeResponse),
    Id(RecordId),
}

/// One element of `GET /scheme-selected` → `data[]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedSchemeResponse {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub scheme_id: SchemeRefResponse,
    #[serde(default, with = "lenient_decimal")]
    pub balance_payout: Decimal,
    #[serde(default)]
    pub payment_date: u32,
    #[serde(default)]
    pub payment_history: Vec<PaymentRecordResponse>,
    #[serde(default, rename = "selectedAt", with = "lenient_datetime")]
    pub selected_at: Option<DateTime<Utc>>,
}

/// Body of `POST /scheme`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectSchemeRequest {
    pub scheme_id: RecordId,
    pub pay_amount: Decimal,
    pub payment_date: u32,
}
