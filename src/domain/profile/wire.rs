//! Wire types for profile and address endpoints.

use crate::shared::serde_util::{empty_as_none, lenient_datetime, lenient_decimal};
use crate::shared::RecordId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One element of `GET /profile` → `data[]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileResponse {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile_no: Option<String>,
    #[serde(default, with = "lenient_datetime")]
    pub date_of_birth: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "empty_as_none::deserialize")]
    pub gender: Option<String>,
    #[serde(default, rename = "createdAt", with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub address: Vec<AddressResponse>,
    #[serde(default)]
    pub wallet: Vec<WalletResponse>,
    #[serde(default)]
    pub kyc: Vec<KycRefResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddressResponse {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default, rename = "isPrimary")]
    pub is_primary: bool,
    #[serde(default)]
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalletResponse {
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, with = "lenient_decimal")]
    pub balance: Decimal,
    #[serde(default, with = "lenient_decimal")]
    pub credit: Decimal,
    #[serde(default, with = "lenient_decimal")]
    pub debit: Decimal,
}

/// The profile embeds KYC records; only their presence and status matter here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KycRefResponse {
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Body of `PATCH /profile`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_no: String,
    /// `YYYY-MM-DD`, or empty when not provided.
    pub date_of_birth: String,
    pub gender: String,
}

/// Body of `POST /address` (no `id`) and `PATCH /address` (with `id`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddressRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub street: String,
    pub city: String,
    pub district: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}
