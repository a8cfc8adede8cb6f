//! Auth sub-client — login, register, logout, storage sync.

use crate::auth::{
    AuthState, ListenerId, LoginCredentials, LoginResponse, RegisterRequest, Session,
    SessionEvent,
};
use crate::client::PortalClient;
use crate::error::SdkError;
use crate::http::RetryPolicy;
use crate::shared::Envelope;

/// Sub-client for authentication operations.
pub struct Auth<'a> {
    pub(crate) client: &'a PortalClient,
}

impl<'a> Auth<'a> {
    /// Login with email and password.
    ///
    /// On success the session is persisted and broadcast, and the raw
    /// response payload is returned. On failure the error is returned
    /// unclassified so the caller decides what to show.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, SdkError> {
        let request = LoginCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let url = self.client.http.url("/auth/login");
        let session = &self.client.session;

        session.begin_login().await;
        let envelope: Envelope<LoginResponse> = match self
            .client
            .http
            .post(&url, &request, RetryPolicy::None)
            .await
        {
            Ok(envelope) => envelope,
            Err(e) => {
                session.fail_login().await;
                tracing::debug!(error = %e, "Login rejected");
                return Err(e.into());
            }
        };

        session
            .complete_login(envelope.data.to_session(email))
            .await?;
        Ok(envelope.data)
    }

    /// Create an account. Does not sign in; route the user to login afterwards.
    pub async fn register(&self, request: &RegisterRequest) -> Result<serde_json::Value, SdkError> {
        let url = self.client.http.url("/auth/register");
        Ok(self
            .client
            .http
            .post(&url, request, RetryPolicy::None)
            .await?)
    }

    /// Clear the local session and cached profile. No server call.
    pub async fn logout(&self) -> Result<(), SdkError> {
        let result = self.client.session.logout().await;
        self.client.profile_store.write().await.clear_user();
        result.map_err(Into::into)
    }

    /// Tell the backend to end the session (`POST /auth/logout/:id`).
    ///
    /// Optional and independent of [`logout`](Self::logout), which never
    /// talks to the server.
    pub async fn end_server_session(&self) -> Result<(), SdkError> {
        let user_id = self
            .client
            .session
            .user_id()
            .await
            .ok_or(crate::error::AuthError::NotAuthenticated)?;
        let url = self.client.http.url(&format!(
            "/auth/logout/{}",
            urlencoding::encode(user_id.as_str())
        ));
        let _: serde_json::Value = self
            .client
            .http
            .post(&url, &serde_json::json!({}), RetryPolicy::None)
            .await?;
        Ok(())
    }

    /// Adopt a session written or removed by another process, and bring the
    /// cached profile in line with it.
    pub async fn sync_from_storage(&self) -> Result<Option<SessionEvent>, SdkError> {
        let event = self.client.session.sync_from_storage().await?;
        if let Some(event) = &event {
            self.client.profile().apply_session_event(event).await;
        }
        Ok(event)
    }

    pub async fn state(&self) -> AuthState {
        self.client.session.state().await
    }

    pub async fn session(&self) -> Option<Session> {
        self.client.session.session().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.client.session.is_authenticated().await
    }

    pub async fn on_session_change<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        self.client.session.on_session_change(listener).await
    }

    pub async fn remove_listener(&self, id: ListenerId) -> bool {
        self.client.session.remove_listener(id).await
    }
}
