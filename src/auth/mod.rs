//! Authentication — session types, durable session storage, login/logout.
//!
//! ## Session model
//!
//! - The session (`token`, `userId`, `email`, display name) is persisted in a
//!   [`SessionStorage`] backend and mirrored in memory by [`SessionStore`].
//! - The store is the single token source: `PortalHttp` asks it for the bearer
//!   token on every request. Nothing else reads storage directly.
//! - `logout()` clears storage and memory unconditionally; no server call.
//! - Observers subscribe with [`SessionStore::on_session_change`].

#[cfg(feature = "http")]
pub mod client;
pub mod forms;
pub mod session;
pub mod storage;

pub use session::{AuthState, ListenerId, SessionEvent, SessionStore};
pub use storage::{MemoryStorage, SessionStorage};
#[cfg(feature = "file-storage")]
pub use storage::FileStorage;

use serde::{Deserialize, Serialize};

use crate::shared::RecordId;

// ============================================================================
// Session types
// ============================================================================

/// Bearer token. `Debug` is redacted; the raw value is only reachable through
/// [`SecretToken::expose`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretToken(String);

impl SecretToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretToken(***)")
    }
}

/// An authenticated session, as persisted in durable storage.
///
/// Field names match the keys the web client has always stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: SecretToken,
    #[serde(rename = "userId")]
    pub user_id: RecordId,
    pub email: String,
    #[serde(rename = "user")]
    pub display_name: String,
}

// ============================================================================
// Wire types
// ============================================================================

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// User block of the login response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginUser {
    #[serde(alias = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// `data` of the login response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

impl LoginResponse {
    pub(crate) fn to_session(&self, fallback_email: &str) -> Session {
        let email = if self.user.email.is_empty() {
            fallback_email.to_string()
        } else {
            self.user.email.clone()
        };
        Session {
            token: SecretToken::new(self.token.clone()),
            user_id: self.user.id.clone(),
            email,
            display_name: self.user.name.clone(),
        }
    }
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_no: String,
    pub password: String,
}
