//! # Savings Portal SDK
//!
//! A headless Rust client for the savings portal: session, profile, savings
//! schemes, aims, wallet and KYC, with the view-state machines the portal
//! screens are driven by.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Shared types, domain models, view-state machines (no I/O)
//! 2. **Auth** — Session store, durable session storage, login/register forms
//! 3. **HTTP API** — `PortalHttp` with bearer injection and per-endpoint retry policies
//! 4. **High-Level Client** — `PortalClient` with nested sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use savings_portal_sdk::prelude::*;
//!
//! let client = PortalClient::builder()
//!     .base_url("http://localhost:8000")
//!     .build()?;
//!
//! client.auth().login("ada@example.com", "secret").await?;
//! client.profile().fetch_user(false).await;
//!
//! let mut schemes = SchemesState::default();
//! client.schemes().load_catalog(&mut schemes).await;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes, response envelopes, view helpers and formatting.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

/// Environment-driven configuration.
pub mod config;

/// Route table and auth guard.
pub mod router;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Authentication: session store, storage backends, login/logout.
pub mod auth;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `PortalClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared types
    pub use crate::shared::{Loadable, RecordId, Ticket, Toast, ToastKind};

    // Domain types — profile
    pub use crate::domain::profile::{
        Address, AddressForm, Completion, FetchOutcome, Profile, ProfileForm, ProfilePatch,
        ProfileStore, WalletAccount,
    };

    // Domain types — schemes
    pub use crate::domain::scheme::{
        PaymentForm, Portfolio, Scheme, SchemePayment, SchemesState, SchemesView, SelectedScheme,
    };

    // Domain types — aims
    pub use crate::domain::aim::{
        Aim, AimCalculation, AimForm, AimPayment, AimStatus, AimsState, AimsView, PaymentCycle,
    };

    // Domain types — wallet
    pub use crate::domain::wallet::{
        BalanceReading, BalanceSource, DepositForm, Transaction, TransactionKind, WalletOverview,
        WalletSummary, WalletView,
    };

    // Domain types — KYC
    pub use crate::domain::kyc::{
        DocumentError, DocumentKind, DocumentSlot, DocumentUpload, KycForm, KycRecord, KycState,
        KycStatus, KycView,
    };

    // Errors
    pub use crate::error::{ApiErrorKind, FormErrors, SdkError};

    // Network + config
    pub use crate::config::ClientConfig;
    pub use crate::network::DEFAULT_API_URL;

    // Auth + session types
    pub use crate::auth::forms::{LoginForm, RegisterForm};
    pub use crate::auth::{
        AuthState, MemoryStorage, SecretToken, Session, SessionEvent, SessionStorage, SessionStore,
    };
    #[cfg(feature = "file-storage")]
    pub use crate::auth::FileStorage;

    // Routing
    pub use crate::router::{Resolution, Route, Router};

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        AimsSubClient, AuthClient, KycSubClient, PortalClient, PortalClientBuilder,
        ProfileSubClient, SchemesSubClient, WalletSubClient,
    };
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};
}
