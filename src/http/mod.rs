//! HTTP client layer — `PortalHttp` with per-endpoint retry policies.

pub mod client;
pub mod retry;

pub use client::{MultipartBody, PortalHttp, DEFAULT_TIMEOUT};
pub use retry::{RetryConfig, RetryPolicy};
