//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize
//! identically to the raw format the backend sends, so they can be used
//! directly in wire types.

pub mod fmt;
pub mod serde_util;
pub mod validate;
pub mod view;

pub use view::{progress_percent, Epoch, Loadable, Ticket, Toast, ToastKind};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── RecordId ────────────────────────────────────────────────────────────────

/// Backend document identifier (e.g. `"68b7e7882a5cc44cff26cae7"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RecordId(s.to_string()))
    }
}

impl Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Ids occasionally arrive as numbers from older endpoints.
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(RecordId(s)),
            serde_json::Value::Number(n) => Ok(RecordId(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "Invalid record id: {}",
                other
            ))),
        }
    }
}

// ─── Envelope ────────────────────────────────────────────────────────────────

/// The backend's response wrapper: `{ success?, message?, data }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> Envelope<T> {
    /// An explicit `success: false` from the backend.
    pub fn is_rejected(&self) -> bool {
        self.success == Some(false)
    }
}

/// Envelope for endpoints whose `data` may be absent or `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionalEnvelope<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_accepts_numbers() {
        let id: RecordId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");
        let id: RecordId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(id, RecordId::from("abc"));
        assert!(serde_json::from_str::<RecordId>("null").is_err());
    }

    #[test]
    fn test_envelope_rejected_flag() {
        let env: Envelope<Vec<u8>> =
            serde_json::from_str(r#"{"success":false,"message":"nope","data":[]}"#).unwrap();
        assert!(env.is_rejected());
        let env: Envelope<Vec<u8>> = serde_json::from_str(r#"{"data":[1]}"#).unwrap();
        assert!(!env.is_rejected());
    }

    #[test]
    fn test_optional_envelope_null_data() {
        let env: OptionalEnvelope<u8> = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert!(env.data.is_none());
        let env: OptionalEnvelope<u8> = serde_json::from_str(r#"{"message":"none"}"#).unwrap();
        assert!(env.data.is_none());
    }
}
