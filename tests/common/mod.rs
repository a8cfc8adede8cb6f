//! Shared fixtures for the mock-server integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use httpmock::MockServer;
use serde_json::{json, Value};

use savings_portal_sdk::auth::{MemoryStorage, SecretToken, Session};
use savings_portal_sdk::client::PortalClient;
use savings_portal_sdk::http::RetryPolicy;

pub const TOKEN: &str = "tok-ada";
pub const USER_ID: &str = "u1";

pub fn session() -> Session {
    Session {
        token: SecretToken::new(TOKEN),
        user_id: USER_ID.into(),
        email: "ada@example.com".into(),
        display_name: "Ada".into(),
    }
}

/// Client against `server` with no stored session.
pub fn anonymous_client(server: &MockServer) -> PortalClient {
    PortalClient::builder()
        .base_url(&server.base_url())
        .retry(RetryPolicy::None)
        .build()
        .expect("client should build")
}

/// Client against `server` that starts signed in.
pub fn signed_in_client(server: &MockServer) -> PortalClient {
    PortalClient::builder()
        .base_url(&server.base_url())
        .storage(Arc::new(MemoryStorage::with_session(session())))
        .retry(RetryPolicy::None)
        .build()
        .expect("client should build")
}

pub fn bearer() -> String {
    format!("Bearer {}", TOKEN)
}

/// A `GET /profile` body, optionally with one address.
pub fn profile_body(address: Option<Value>) -> Value {
    json!({
        "success": true,
        "data": [{
            "_id": USER_ID,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "mobile_no": "0501234567",
            "date_of_birth": "1990-12-10T00:00:00.000Z",
            "gender": "female",
            "createdAt": "2026-01-01T00:00:00.000Z",
            "address": address.map(|a| vec![a]).unwrap_or_default(),
            "wallet": [{"balance": 500, "credit": 700, "debit": 200}],
            "kyc": []
        }]
    })
}

pub fn scheme_body() -> Value {
    json!({
        "_id": "s1",
        "name": "Gold Saver",
        "amount": 1200,
        "monthly_pay": 100,
        "months": 12,
        "bonus": 100
    })
}
