//! Network URL constants for the portal SDK.

/// Default REST API base URL (local backend).
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
