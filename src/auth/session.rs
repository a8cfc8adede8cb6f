//! In-memory session state mirrored from durable storage.

use super::{SecretToken, Session, SessionStorage};
use crate::error::StorageError;
use crate::shared::RecordId;

use async_lock::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Authentication lifecycle. Logout returns to `Anonymous`; there is no
/// terminal state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthState {
    #[default]
    Uninitialized,
    Loading,
    Authenticated(Session),
    Anonymous,
}

impl AuthState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    /// `true` once the state is known to be signed in or signed out.
    pub fn is_resolved(&self) -> bool {
        matches!(self, AuthState::Authenticated(_) | AuthState::Anonymous)
    }
}

/// Emitted to listeners whenever the signed-in identity changes.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SignedIn(Session),
    SignedOut,
}

/// Handle returned by [`SessionStore::on_session_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

/// The one place the session lives. Injected into the HTTP layer as the
/// bearer-token source and shared by every sub-client.
pub struct SessionStore {
    state: RwLock<AuthState>,
    storage: Arc<dyn SessionStorage>,
    listeners: RwLock<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
}

impl SessionStore {
    /// A store that has not looked at storage yet. The first
    /// [`sync_from_storage`](Self::sync_from_storage) resolves it.
    pub fn uninitialized(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            state: RwLock::new(AuthState::Uninitialized),
            storage,
            listeners: RwLock::new(Vec::new()),
            next_listener: AtomicU64::new(0),
        }
    }

    /// Resolve the initial state synchronously from storage.
    ///
    /// A corrupt stored session is discarded and the store starts anonymous.
    pub fn restore(storage: Arc<dyn SessionStorage>) -> Result<Self, StorageError> {
        let initial = match load_or_discard(storage.as_ref())? {
            Some(session) => {
                tracing::debug!(user_id = %session.user_id, "Session restored");
                AuthState::Authenticated(session)
            }
            None => AuthState::Anonymous,
        };
        Ok(Self {
            state: RwLock::new(initial),
            storage,
            listeners: RwLock::new(Vec::new()),
            next_listener: AtomicU64::new(0),
        })
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn session(&self) -> Option<Session> {
        self.state.read().await.session().cloned()
    }

    pub async fn token(&self) -> Option<SecretToken> {
        self.state.read().await.session().map(|s| s.token.clone())
    }

    pub async fn user_id(&self) -> Option<RecordId> {
        self.state.read().await.session().map(|s| s.user_id.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    // ── Listeners ────────────────────────────────────────────────────────

    pub async fn on_session_change<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().await.push((id, Arc::new(listener)));
        id
    }

    /// Returns `false` if the listener was already removed.
    pub async fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write().await;
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    async fn notify(&self, event: &SessionEvent) {
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .await
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    // ── Transitions ──────────────────────────────────────────────────────

    pub(crate) async fn begin_login(&self) {
        *self.state.write().await = AuthState::Loading;
    }

    pub(crate) async fn complete_login(&self, session: Session) -> Result<(), StorageError> {
        if let Err(e) = self.storage.save(&session) {
            *self.state.write().await = AuthState::Anonymous;
            return Err(e);
        }
        tracing::info!(user_id = %session.user_id, "Signed in");
        *self.state.write().await = AuthState::Authenticated(session.clone());
        self.notify(&SessionEvent::SignedIn(session)).await;
        Ok(())
    }

    pub(crate) async fn fail_login(&self) {
        *self.state.write().await = AuthState::Anonymous;
    }

    /// Clear storage and memory. Memory is cleared and listeners are told
    /// even when the storage backend fails; that failure is still returned.
    pub async fn logout(&self) -> Result<(), StorageError> {
        let cleared = self.storage.clear();
        let was_signed_in = {
            let mut state = self.state.write().await;
            let was = state.is_authenticated();
            *state = AuthState::Anonymous;
            was
        };
        if was_signed_in {
            tracing::info!("Signed out");
        }
        self.notify(&SessionEvent::SignedOut).await;
        cleared
    }

    /// Re-read durable storage and adopt whatever another process left there.
    ///
    /// Returns the event that was broadcast, if the identity changed.
    pub async fn sync_from_storage(&self) -> Result<Option<SessionEvent>, StorageError> {
        let stored = load_or_discard(self.storage.as_ref())?;
        let event = {
            let mut state = self.state.write().await;
            let current = state.session().cloned();
            match (current, stored) {
                (None, Some(session)) => {
                    *state = AuthState::Authenticated(session.clone());
                    Some(SessionEvent::SignedIn(session))
                }
                (Some(current), Some(session)) if current != session => {
                    *state = AuthState::Authenticated(session.clone());
                    Some(SessionEvent::SignedIn(session))
                }
                (Some(_), None) => {
                    *state = AuthState::Anonymous;
                    Some(SessionEvent::SignedOut)
                }
                (None, None) => {
                    if !state.is_resolved() && *state != AuthState::Loading {
                        *state = AuthState::Anonymous;
                    }
                    None
                }
                (Some(_), Some(_)) => None,
            }
        };
        if let Some(event) = &event {
            tracing::debug!(?event, "Session changed in storage");
            self.notify(event).await;
        }
        Ok(event)
    }
}

fn load_or_discard(storage: &dyn SessionStorage) -> Result<Option<Session>, StorageError> {
    match storage.load() {
        Ok(session) => Ok(session),
        Err(StorageError::Corrupt(e)) => {
            tracing::warn!(error = %e, "Discarding unreadable stored session");
            storage.clear()?;
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}
