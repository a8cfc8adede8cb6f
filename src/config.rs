//! Environment-driven client configuration.
//!
//! | Variable              | Meaning                                   |
//! |-----------------------|-------------------------------------------|
//! | `PORTAL_API_URL`      | REST base URL (default [`DEFAULT_API_URL`]) |
//! | `PORTAL_TIMEOUT_SECS` | Request timeout in whole seconds          |
//! | `PORTAL_SESSION_FILE` | JSON file to persist the session in       |

use crate::error::SdkError;
use crate::network::DEFAULT_API_URL;

use std::path::PathBuf;
use std::time::Duration;

pub const API_URL_VAR: &str = "PORTAL_API_URL";
pub const TIMEOUT_VAR: &str = "PORTAL_TIMEOUT_SECS";
pub const SESSION_FILE_VAR: &str = "PORTAL_SESSION_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout: Option<Duration>,
    /// Without one the session lives in memory only.
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: None,
            session_file: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, SdkError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SdkError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let timeout = match get(TIMEOUT_VAR) {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    SdkError::Other(format!("{} must be a whole number, got {:?}", TIMEOUT_VAR, raw))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            api_url: get(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            timeout,
            session_file: get(SESSION_FILE_VAR).map(PathBuf::from),
        })
    }

    #[cfg(feature = "http")]
    pub fn into_builder(self) -> crate::client::PortalClientBuilder {
        let mut builder = crate::client::PortalClient::builder().base_url(&self.api_url);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        #[cfg(feature = "file-storage")]
        if let Some(path) = self.session_file {
            builder = builder.storage(std::sync::Arc::new(crate::auth::FileStorage::new(path)));
        }
        #[cfg(not(feature = "file-storage"))]
        if self.session_file.is_some() {
            tracing::warn!("{} ignored: built without file-storage", SESSION_FILE_VAR);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_url, "http://localhost:8000");
    }

    #[test]
    fn test_reads_all_vars() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_URL_VAR, "https://api.example.com"),
            (TIMEOUT_VAR, " 12 "),
            (SESSION_FILE_VAR, "/tmp/session.json"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.timeout, Some(Duration::from_secs(12)));
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/session.json")));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = ClientConfig::from_lookup(lookup(&[(API_URL_VAR, "  ")])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_bad_timeout_is_an_error() {
        let err = ClientConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "soon")])).unwrap_err();
        assert!(err.to_string().contains(TIMEOUT_VAR));
    }

    #[cfg(feature = "file-storage")]
    #[tokio::test]
    async fn test_session_file_backs_the_client() {
        use crate::auth::{SecretToken, Session, SessionStorage};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        crate::auth::FileStorage::new(&path)
            .save(&Session {
                token: SecretToken::new("tok"),
                user_id: "u1".into(),
                email: "a@b.co".into(),
                display_name: "Ada".into(),
            })
            .unwrap();

        let client = ClientConfig {
            session_file: Some(path),
            ..ClientConfig::default()
        }
        .into_builder()
        .build()
        .unwrap();
        assert!(client.auth().is_authenticated().await);
    }
}
