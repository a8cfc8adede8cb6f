//! Low-level HTTP client — `PortalHttp`.
//!
//! Generic JSON / multipart verbs with bearer-token injection and per-endpoint
//! retry policies. Non-success responses are classified once here (see
//! [`HttpError::from_status`]); sub-clients in `domain/<name>/client.rs` only
//! deal with typed results.

use crate::auth::SessionStore;
use crate::error::HttpError;
use crate::http::retry::{RetryConfig, RetryPolicy};

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing;

/// Default request timeout on native targets.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Low-level HTTP client for the portal REST API.
pub struct PortalHttp {
    base_url: String,
    client: Client,
    /// Token source. The token itself is never cached here.
    session: Arc<SessionStore>,
}

/// One part of a multipart form. Kept as owned data so a form can be rebuilt
/// for each attempt.
#[derive(Debug, Clone)]
pub enum FormPart {
    Text(String),
    File {
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

/// An ordered multipart payload.
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    parts: Vec<(String, FormPart)>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts.push((name.to_string(), FormPart::Text(value.into())));
        self
    }

    pub fn file(
        mut self,
        name: &str,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push((
            name.to_string(),
            FormPart::File {
                file_name: file_name.to_string(),
                content_type: content_type.to_string(),
                bytes,
            },
        ));
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(name, _)| name.as_str())
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(n, part)| match part {
            FormPart::Text(value) if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    fn to_form(&self) -> Result<reqwest::multipart::Form, HttpError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, part) in &self.parts {
            form = match part {
                FormPart::Text(value) => form.text(name.clone(), value.clone()),
                FormPart::File {
                    file_name,
                    content_type,
                    bytes,
                } => {
                    let part = reqwest::multipart::Part::bytes(bytes.clone())
                        .file_name(file_name.clone())
                        .mime_str(content_type)?;
                    form.part(name.clone(), part)
                }
            };
        }
        Ok(form)
    }
}

enum Payload<'a, B> {
    None,
    Json(&'a B),
    Multipart(&'a MultipartBody),
}

impl PortalHttp {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        session: Arc<SessionStore>,
    ) -> Result<Self, HttpError> {
        #[allow(unused_mut)]
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder.timeout(timeout).pool_max_idle_per_host(10);
        }
        #[cfg(target_arch = "wasm32")]
        let _ = timeout;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path (`"/scheme"` → `"<base>/scheme"`).
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    // ── Verbs ────────────────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::GET, url, Payload::<()>::None, retry)
            .await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::POST, url, Payload::Json(body), retry)
            .await
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::PATCH, url, Payload::Json(body), retry)
            .await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &MultipartBody,
    ) -> Result<T, HttpError> {
        self.request_with_retry(
            reqwest::Method::POST,
            url,
            Payload::<()>::Multipart(body),
            RetryPolicy::None,
        )
        .await
    }

    pub(crate) async fn patch_multipart<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &MultipartBody,
    ) -> Result<T, HttpError> {
        self.request_with_retry(
            reqwest::Method::PATCH,
            url,
            Payload::<()>::Multipart(body),
            RetryPolicy::None,
        )
        .await
    }

    /// Authenticated raw download (document previews).
    pub(crate) async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let resp = self.send(&reqwest::Method::GET, url, &Payload::<()>::None).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    // ── Internal ─────────────────────────────────────────────────────────

    async fn request_with_retry<T: DeserializeOwned, B: Serialize>(
        &self,
        method: reqwest::Method,
        url: &str,
        payload: Payload<'_, B>,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let config = match &retry {
            RetryPolicy::None => {
                return self.do_request(&method, url, &payload).await;
            }
            RetryPolicy::Idempotent => RetryConfig::idempotent(),
            RetryPolicy::Custom(c) => c.clone(),
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request::<T, B>(&method, url, &payload).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    let should_retry = match &e {
                        HttpError::ServerError { status, .. } => {
                            config.is_retryable_status(*status)
                        }
                        HttpError::RateLimited { retry_after_ms } => {
                            if let Some(ms) = retry_after_ms {
                                futures_timer::Delay::new(Duration::from_millis(*ms)).await;
                            }
                            config.is_retryable_status(429)
                        }
                        HttpError::Timeout => true,
                        HttpError::Reqwest(re) => {
                            #[cfg(not(target_arch = "wasm32"))]
                            let retryable = re.is_connect() || re.is_timeout();
                            #[cfg(target_arch = "wasm32")]
                            let retryable = re.is_timeout();
                            retryable
                        }
                        _ => false,
                    };

                    if should_retry && attempt < config.max_retries {
                        let delay = config.delay_for_attempt(attempt);
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying request to {}",
                            url
                        );
                        futures_timer::Delay::new(delay).await;
                        last_error = Some(e);
                    } else if should_retry && attempt > 0 && e.status().is_none() {
                        return Err(HttpError::MaxRetriesExceeded {
                            attempts: attempt + 1,
                            last_error: e.to_string(),
                        });
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: &reqwest::Method,
        url: &str,
        payload: &Payload<'_, B>,
    ) -> Result<T, HttpError> {
        let resp = self.send(method, url, payload).await?;
        let text = resp.text().await?;
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str::<T>(text).map_err(|e| {
            tracing::warn!(%method, url, error = %e, "Unexpected response shape");
            HttpError::Decode(e.to_string())
        })
    }

    /// Send one request and turn non-success statuses into classified errors.
    async fn send<B: Serialize>(
        &self,
        method: &reqwest::Method,
        url: &str,
        payload: &Payload<'_, B>,
    ) -> Result<reqwest::Response, HttpError> {
        let mut req = self.client.request(method.clone(), url);

        if let Some(token) = self.session.token().await {
            req = req.bearer_auth(token.expose());
        }

        req = match payload {
            Payload::None => req,
            Payload::Json(b) => req.json(b),
            Payload::Multipart(m) => req.multipart(m.to_form()?),
        };

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::Reqwest(e)
            }
        })?;
        let status = resp.status();

        if status.is_success() {
            return Ok(resp);
        }

        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();
        tracing::debug!(%method, url, status = status_code, "Request rejected");
        Err(HttpError::from_status(status_code, body_text))
    }
}

impl Clone for PortalHttp {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: self.client.clone(),
            session: self.session.clone(),
        }
    }
}
