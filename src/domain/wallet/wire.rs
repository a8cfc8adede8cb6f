//! Wire types for `GET /transaction` and `POST /wallet/payment`.

use crate::shared::serde_util::{lenient_datetime, lenient_decimal};
use crate::shared::RecordId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One element of `GET /transaction` → `data[]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransactionHistoryResponse {
    #[serde(default)]
    pub wallet: Vec<WalletHistoryResponse>,
    #[serde(default, rename = "selectedSchemes")]
    pub selected_schemes: Vec<SchemeHistoryResponse>,
    #[serde(default, rename = "aimPayments")]
    pub aim_payments: Vec<AimPaymentResponse>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WalletHistoryResponse {
    #[serde(default, with = "lenient_decimal")]
    pub balance: Decimal,
    #[serde(default, with = "lenient_decimal")]
    pub credit: Decimal,
    #[serde(default, with = "lenient_decimal")]
    pub debit: Decimal,
    #[serde(default, rename = "paymentHistory")]
    pub payment_history: Vec<PaymentRecordResponse>,
}

/// A deposit or scheme instalment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRecordResponse {
    #[serde(default, rename = "_id")]
    pub id: Option<RecordId>,
    #[serde(default, with = "lenient_decimal")]
    pub paid_amount: Decimal,
    #[serde(default, rename = "paidAt", with = "lenient_datetime")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemeHistoryResponse {
    #[serde(default, rename = "schemeDetails")]
    pub scheme_details: Option<SchemeNameResponse>,
    #[serde(default, rename = "paymentHistory")]
    pub payment_history: Vec<PaymentRecordResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemeNameResponse {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AimPaymentResponse {
    #[serde(default, rename = "_id")]
    pub id: Option<RecordId>,
    #[serde(default, with = "lenient_decimal")]
    pub amount: Decimal,
    #[serde(default, rename = "createdAt", with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// Body of `POST /wallet/payment`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepositRequest {
    pub transaction_id: String,
    pub amount: Decimal,
}
