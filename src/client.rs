//! High-level client — `PortalClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, the shared session and profile stores, and
//! the accessor methods.

use crate::auth::client::Auth;
use crate::auth::{MemoryStorage, SessionStorage, SessionStore};
use crate::config::ClientConfig;
use crate::domain::aim::client::AimsClient;
use crate::domain::kyc::client::KycClient;
use crate::domain::profile::client::ProfileClient;
use crate::domain::profile::ProfileStore;
use crate::domain::scheme::client::SchemesClient;
use crate::domain::wallet::client::WalletClient;
use crate::error::SdkError;
use crate::http::{PortalHttp, RetryPolicy, DEFAULT_TIMEOUT};

use async_lock::RwLock;
use std::sync::Arc;
use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::auth::client::Auth as AuthClient;
pub use crate::domain::aim::client::AimsClient as AimsSubClient;
pub use crate::domain::kyc::client::KycClient as KycSubClient;
pub use crate::domain::profile::client::ProfileClient as ProfileSubClient;
pub use crate::domain::scheme::client::SchemesClient as SchemesSubClient;
pub use crate::domain::wallet::client::WalletClient as WalletSubClient;

/// The primary entry point for the portal SDK.
///
/// Provides nested sub-client accessors for each domain:
/// `client.schemes()`, `client.wallet()`, etc. Clones share the same session
/// and profile stores.
pub struct PortalClient {
    pub(crate) http: PortalHttp,
    /// Single token source for every request.
    pub(crate) session: Arc<SessionStore>,
    /// Process-wide user snapshot and balance.
    pub(crate) profile_store: Arc<RwLock<ProfileStore>>,
    /// Retry policy for GET endpoints. Mutations never retry.
    pub(crate) get_retry: RetryPolicy,
}

impl PortalClient {
    pub fn builder() -> PortalClientBuilder {
        PortalClientBuilder::default()
    }

    /// Build from `PORTAL_*` environment variables.
    pub fn from_env() -> Result<Self, SdkError> {
        ClientConfig::from_env()?.into_builder().build()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn auth(&self) -> Auth<'_> {
        Auth { client: self }
    }

    pub fn profile(&self) -> ProfileClient<'_> {
        ProfileClient { client: self }
    }

    pub fn schemes(&self) -> SchemesClient<'_> {
        SchemesClient { client: self }
    }

    pub fn aims(&self) -> AimsClient<'_> {
        AimsClient { client: self }
    }

    pub fn wallet(&self) -> WalletClient<'_> {
        WalletClient { client: self }
    }

    pub fn kyc(&self) -> KycClient<'_> {
        KycClient { client: self }
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    pub fn session_store(&self) -> &Arc<SessionStore> {
        &self.session
    }
}

impl Clone for PortalClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            session: self.session.clone(),
            profile_store: self.profile_store.clone(),
            get_retry: self.get_retry.clone(),
        }
    }
}

impl std::fmt::Debug for PortalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalClient")
            .field("base_url", &self.http.base_url())
            .field("get_retry", &self.get_retry)
            .finish_non_exhaustive()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct PortalClientBuilder {
    base_url: String,
    timeout: Duration,
    storage: Option<Arc<dyn SessionStorage>>,
    get_retry: RetryPolicy,
}

impl Default for PortalClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            storage: None,
            get_retry: RetryPolicy::Idempotent,
        }
    }
}

impl PortalClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Durable session backend. Defaults to in-memory storage.
    pub fn storage(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Retry policy for reads.
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.get_retry = policy;
        self
    }

    /// Restores any persisted session before returning.
    pub fn build(self) -> Result<PortalClient, SdkError> {
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStorage::new()));
        let session = Arc::new(SessionStore::restore(storage)?);
        Ok(PortalClient {
            http: PortalHttp::new(&self.base_url, self.timeout, session.clone())?,
            session,
            profile_store: Arc::new(RwLock::new(ProfileStore::new())),
            get_retry: self.get_retry,
        })
    }
}
