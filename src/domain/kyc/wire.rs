//! Wire types for `/kyc`. Submissions are multipart, see `KycForm`.

use crate::shared::serde_util::{empty_as_none, lenient_datetime};
use crate::shared::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /kyc` → `data`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KycResponse {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub emirates_id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none::deserialize")]
    pub passport_no: Option<String>,
    #[serde(default)]
    pub source_of_funds: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none::deserialize")]
    pub emirates_id_front_img: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none::deserialize")]
    pub emirates_id_back_img: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none::deserialize")]
    pub visa_copy: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none::deserialize")]
    pub reason: Option<String>,
    #[serde(default, rename = "createdAt", with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}
