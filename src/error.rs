//! Unified SDK error types and the typed classification of backend failures.

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] FormErrors),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// 2xx response whose envelope says `success: false`.
    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("{0}")]
    Other(String),
}

impl SdkError {
    /// Classified kind of the failure, if it came from the backend boundary.
    pub fn kind(&self) -> Option<ApiErrorKind> {
        match self {
            SdkError::Http(e) => Some(e.kind()),
            SdkError::Auth(AuthError::NotAuthenticated) => Some(ApiErrorKind::Unauthorized),
            SdkError::Rejected(_) => Some(ApiErrorKind::Rejected),
            _ => None,
        }
    }

    /// Whether this failure should route the user to KYC verification.
    pub fn requires_kyc(&self) -> bool {
        self.kind() == Some(ApiErrorKind::KycRequired)
    }

    /// Server-provided message, when the backend sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            SdkError::Http(e) => e.body().and_then(|b| b.message.as_deref()),
            SdkError::Rejected(m) if !m.trim().is_empty() => Some(m.as_str()),
            _ => None,
        }
    }

    /// Short description for "Error fetching ...: <reason>" panels.
    pub fn reason(&self) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| self.to_string())
    }

    /// Like [`user_message`](Self::user_message), but shows the backend's own
    /// text for generic failures when it sent one.
    pub fn message_or(&self, fallback: &str) -> String {
        match self.kind() {
            Some(ApiErrorKind::Network)
            | Some(ApiErrorKind::Unauthorized)
            | Some(ApiErrorKind::AddressMissing) => self.user_message(fallback),
            _ => self
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| self.user_message(fallback)),
        }
    }

    /// User-facing text for this failure. `fallback` covers the generic
    /// "action failed" case and differs per screen.
    pub fn user_message(&self, fallback: &str) -> String {
        match self.kind() {
            Some(ApiErrorKind::Network) => NETWORK_MESSAGE.to_string(),
            Some(ApiErrorKind::Unauthorized) => AUTH_FAILED_MESSAGE.to_string(),
            Some(ApiErrorKind::AddressMissing) => ADDRESS_MISSING_MESSAGE.to_string(),
            Some(ApiErrorKind::KycRequired) => KYC_REQUIRED_MESSAGE.to_string(),
            _ => match self {
                SdkError::Validation(errors) => errors
                    .first()
                    .map(str::to_string)
                    .unwrap_or_else(|| fallback.to_string()),
                _ => fallback.to_string(),
            },
        }
    }
}

pub const NETWORK_MESSAGE: &str = "Network error. Please check your internet connection.";
pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed. Please log in again.";
pub const ADDRESS_MISSING_MESSAGE: &str =
    "Address details not found. Please update your address in your profile before submitting KYC.";
pub const KYC_REQUIRED_MESSAGE: &str =
    "KYC verification is required before you can continue.";

// ─── HTTP ────────────────────────────────────────────────────────────────────

/// HTTP-layer errors. Every non-success status carries the parsed body.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: ErrorBody },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Unauthorized: {0}")]
    Unauthorized(ErrorBody),

    #[error("Forbidden: {0}")]
    Forbidden(ErrorBody),

    #[error("Not found: {0}")]
    NotFound(ErrorBody),

    #[error("Bad request ({status}): {body}")]
    BadRequest { status: u16, body: ErrorBody },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Timeout")]
    Timeout,

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

impl HttpError {
    /// Build the error for a non-success status from the raw response body.
    pub fn from_status(status: u16, raw: String) -> Self {
        let body = ErrorBody::parse(raw);
        match status {
            401 => HttpError::Unauthorized(body),
            403 => HttpError::Forbidden(body),
            404 => HttpError::NotFound(body),
            429 => HttpError::RateLimited {
                retry_after_ms: None,
            },
            400..=499 => HttpError::BadRequest { status, body },
            _ => HttpError::ServerError { status, body },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::ServerError { status, .. } | HttpError::BadRequest { status, .. } => {
                Some(*status)
            }
            HttpError::Unauthorized(_) => Some(401),
            HttpError::Forbidden(_) => Some(403),
            HttpError::NotFound(_) => Some(404),
            HttpError::RateLimited { .. } => Some(429),
            #[cfg(feature = "http")]
            HttpError::Reqwest(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            HttpError::ServerError { body, .. }
            | HttpError::BadRequest { body, .. }
            | HttpError::Unauthorized(body)
            | HttpError::Forbidden(body)
            | HttpError::NotFound(body) => Some(body),
            _ => None,
        }
    }

    /// Whether the backend answered at all (as opposed to a transport failure).
    pub fn has_response(&self) -> bool {
        self.status().is_some() || matches!(self, HttpError::Decode(_))
    }

    /// Map this failure onto the closed set of kinds the views act on.
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            HttpError::Unauthorized(_) => ApiErrorKind::Unauthorized,
            HttpError::Forbidden(body) => {
                if body.mentions_kyc() {
                    ApiErrorKind::KycRequired
                } else {
                    ApiErrorKind::Forbidden
                }
            }
            HttpError::NotFound(body) => {
                if body.mentions_missing_address() {
                    ApiErrorKind::AddressMissing
                } else {
                    ApiErrorKind::NotFound
                }
            }
            HttpError::BadRequest { body, .. } if body.kyc_flagged() => ApiErrorKind::KycRequired,
            HttpError::BadRequest { .. } => ApiErrorKind::Rejected,
            HttpError::RateLimited { .. } => ApiErrorKind::RateLimited,
            HttpError::ServerError { body, .. } if body.kyc_flagged() => ApiErrorKind::KycRequired,
            HttpError::ServerError { .. } => ApiErrorKind::Server,
            HttpError::Decode(_) => ApiErrorKind::Decode,
            HttpError::Timeout | HttpError::MaxRetriesExceeded { .. } => ApiErrorKind::Network,
            #[cfg(feature = "http")]
            HttpError::Reqwest(e) => {
                if e.is_decode() {
                    ApiErrorKind::Decode
                } else {
                    ApiErrorKind::Network
                }
            }
        }
    }
}

/// Closed set of failure kinds. Classification happens once, in the HTTP
/// layer; views branch on this instead of inspecting bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// No response: connection, timeout, retries exhausted on transport errors.
    Network,
    /// 401.
    Unauthorized,
    /// 403 whose payload mentions KYC, or a KYC flag or message on any
    /// other rejection.
    KycRequired,
    /// 404 diagnosing a missing address.
    AddressMissing,
    /// Any other 403.
    Forbidden,
    /// Any other 404.
    NotFound,
    /// Other 4xx.
    Rejected,
    RateLimited,
    /// 5xx.
    Server,
    /// The response could not be decoded into the expected shape.
    Decode,
}

/// Parsed error payload. JSON bodies yield `message` / `error` /
/// `requiresKYC`; HTML bodies yield the first line of their `<pre>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub code: Option<String>,
    pub requires_kyc: bool,
    pub raw: String,
}

#[derive(Deserialize)]
struct JsonErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default, rename = "requiresKYC")]
    requires_kyc: Option<bool>,
}

impl ErrorBody {
    pub fn parse(raw: String) -> Self {
        if let Ok(json) = serde_json::from_str::<JsonErrorBody>(&raw) {
            let code = match json.error {
                Some(serde_json::Value::String(s)) => Some(s),
                _ => None,
            };
            return Self {
                message: json.message.filter(|m| !m.trim().is_empty()),
                code,
                requires_kyc: json.requires_kyc.unwrap_or(false),
                raw,
            };
        }
        Self {
            message: extract_html_error(&raw),
            code: None,
            requires_kyc: false,
            raw,
        }
    }

    fn kyc_flagged(&self) -> bool {
        self.requires_kyc
            || self.code.as_deref() == Some("KYC_NOT_VERIFIED")
            || self
                .message
                .as_deref()
                .is_some_and(|m| m.to_lowercase().contains("kyc"))
    }

    fn mentions_kyc(&self) -> bool {
        self.kyc_flagged() || self.raw.to_lowercase().contains("kyc")
    }

    fn mentions_missing_address(&self) -> bool {
        let hay = self.message.as_deref().unwrap_or(&self.raw).to_lowercase();
        hay.contains("address details not found")
    }
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(m) => write!(f, "{}", m),
            None if self.raw.is_empty() => write!(f, "<empty body>"),
            None => write!(f, "{}", self.raw),
        }
    }
}

/// First line of an HTML `<pre>` error block with a leading `Error:` removed.
fn extract_html_error(raw: &str) -> Option<String> {
    let lower = raw.to_ascii_lowercase();
    let start = lower.find("<pre>")? + "<pre>".len();
    let end = lower[start..]
        .find("</pre>")
        .map(|i| start + i)
        .unwrap_or(raw.len());
    let text = &raw[start..end];
    let first = text
        .split('\n')
        .next()
        .unwrap_or_default()
        .split("<br>")
        .next()
        .unwrap_or_default();
    let first = decode_entities(first);
    let first = first.trim();
    let first = first.strip_prefix("Error:").unwrap_or(first).trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

// ─── Auth / storage ──────────────────────────────────────────────────────────

/// Authentication errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Login failed: {0}")]
    LoginFailed(String),
}

/// Session persistence errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Field-level validation failures, keyed by field name. Resolved locally and
/// never sent to the network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<String, String>,
    order: Vec<String>,
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary())
    }
}

impl std::error::Error for FormErrors {}

/// Key used for errors not tied to a single field.
pub const GENERAL: &str = "general";

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        if self.fields.insert(field.to_string(), message.into()).is_none() {
            self.order.push(field.to_string());
        }
    }

    /// Clear one field's error, e.g. when the user edits that input.
    pub fn clear(&mut self, field: &str) {
        if self.fields.remove(field).is_some() {
            self.order.retain(|f| f != field);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn general(&self) -> Option<&str> {
        self.get(GENERAL)
    }

    /// The first error in insertion order.
    pub fn first(&self) -> Option<&str> {
        self.order.first().and_then(|f| self.get(f))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Merge `other` into `self`; fields in `other` win.
    pub fn extend(&mut self, other: FormErrors) {
        for field in other.order {
            if let Some(msg) = other.fields.get(&field) {
                self.insert(&field, msg.clone());
            }
        }
    }

    /// `Ok(())` when empty, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    fn summary(&self) -> String {
        self.order
            .iter()
            .filter_map(|f| self.fields.get(f).map(|m| format!("{f}: {m}")))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_with_kyc_text_is_kyc_required() {
        let err = HttpError::from_status(403, "User KYC not verified".to_string());
        assert_eq!(err.kind(), ApiErrorKind::KycRequired);

        let err = HttpError::from_status(403, r#"{"message":"Please complete kyc"}"#.into());
        assert_eq!(err.kind(), ApiErrorKind::KycRequired);
    }

    #[test]
    fn test_forbidden_without_kyc_is_generic() {
        let err = HttpError::from_status(403, r#"{"message":"Not allowed"}"#.into());
        assert_eq!(err.kind(), ApiErrorKind::Forbidden);
    }

    #[test]
    fn test_kyc_error_code_on_bad_request() {
        let err = HttpError::from_status(400, r#"{"error":"KYC_NOT_VERIFIED"}"#.into());
        assert_eq!(err.kind(), ApiErrorKind::KycRequired);
        let err = HttpError::from_status(422, r#"{"requiresKYC":true}"#.into());
        assert_eq!(err.kind(), ApiErrorKind::KycRequired);
    }

    #[test]
    fn test_kyc_message_on_any_status_is_kyc_required() {
        let err = HttpError::from_status(400, r#"{"message":"User kyc not verified"}"#.into());
        assert_eq!(err.kind(), ApiErrorKind::KycRequired);
        let err = HttpError::from_status(500, r#"{"message":"KYC pending approval"}"#.into());
        assert_eq!(err.kind(), ApiErrorKind::KycRequired);

        let err = HttpError::from_status(400, r#"{"message":"Amount too low"}"#.into());
        assert_eq!(err.kind(), ApiErrorKind::Rejected);
        let err = HttpError::from_status(503, r#"{"message":"maintenance"}"#.into());
        assert_eq!(err.kind(), ApiErrorKind::Server);
    }

    #[test]
    fn test_html_not_found_address_missing() {
        let html = "<!DOCTYPE html><html><body><pre>Error: Address details not found<br> &nbsp; &nbsp;at controller (/app/kyc.js:10:5)</pre></body></html>";
        let err = HttpError::from_status(404, html.to_string());
        assert_eq!(err.kind(), ApiErrorKind::AddressMissing);
        assert_eq!(
            err.body().and_then(|b| b.message.as_deref()),
            Some("Address details not found")
        );
    }

    #[test]
    fn test_plain_not_found() {
        let err = HttpError::from_status(404, "<pre>Error: Route missing</pre>".into());
        assert_eq!(err.kind(), ApiErrorKind::NotFound);
    }

    #[test]
    fn test_unauthorized_keeps_server_message() {
        let err = SdkError::from(HttpError::from_status(
            401,
            r#"{"message":"Invalid credentials"}"#.into(),
        ));
        assert_eq!(err.kind(), Some(ApiErrorKind::Unauthorized));
        assert_eq!(err.server_message(), Some("Invalid credentials"));
        assert_eq!(err.user_message("x"), AUTH_FAILED_MESSAGE);
    }

    #[test]
    fn test_message_or_prefers_server_text_for_generic_failures() {
        let err = SdkError::from(HttpError::from_status(
            400,
            r#"{"message":"Duplicate transaction id"}"#.into(),
        ));
        assert_eq!(err.message_or("fallback"), "Duplicate transaction id");

        let err = SdkError::from(HttpError::from_status(500, String::new()));
        assert_eq!(err.message_or("fallback"), "fallback");

        let err = SdkError::Rejected("Scheme closed".into());
        assert_eq!(err.kind(), Some(ApiErrorKind::Rejected));
        assert_eq!(err.message_or("fallback"), "Scheme closed");

        assert_eq!(
            SdkError::from(HttpError::Timeout).message_or("fallback"),
            NETWORK_MESSAGE
        );
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            HttpError::from_status(429, String::new()),
            HttpError::RateLimited { .. }
        ));
        assert!(matches!(
            HttpError::from_status(409, String::new()),
            HttpError::BadRequest { status: 409, .. }
        ));
        assert_eq!(
            HttpError::from_status(503, String::new()).kind(),
            ApiErrorKind::Server
        );
        assert_eq!(HttpError::Timeout.kind(), ApiErrorKind::Network);
    }

    #[test]
    fn test_form_errors_order_and_clear() {
        let mut errors = FormErrors::new();
        errors.insert("amount", "Amount must be greater than 0");
        errors.insert("months", "Months must be greater than 0");
        assert_eq!(errors.first(), Some("Amount must be greater than 0"));
        errors.clear("amount");
        assert_eq!(errors.first(), Some("Months must be greater than 0"));
        assert_eq!(errors.len(), 1);
        assert!(errors.clone().into_result().is_err());
        errors.clear("months");
        assert!(errors.into_result().is_ok());
    }
}
