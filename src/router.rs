//! Top-level route gating.
//!
//! Sub-views (scheme detail, add-aim, KYC editing) live in the feature view
//! machines, not in the path; any path below a top-level route resolves to it.

use crate::auth::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Schemes,
    Aims,
    Wallet,
    Profile,
    Kyc,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Login,
        Route::Register,
        Route::Schemes,
        Route::Aims,
        Route::Wallet,
        Route::Profile,
        Route::Kyc,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Schemes => "/schemes",
            Route::Aims => "/aims",
            Route::Wallet => "/wallet",
            Route::Profile => "/profile",
            Route::Kyc => "/kyc",
        }
    }

    /// Reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }

    /// Match on the first path segment; query and fragment are ignored.
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let first = path.trim_start_matches('/').split('/').next()?;
        Route::ALL
            .into_iter()
            .find(|r| r.path().trim_start_matches('/') == first)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of resolving a path against the current auth state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    /// Replace the current location with this route.
    Redirect(Route),
    /// Auth state not resolved yet; show a loading placeholder.
    Pending,
}

pub struct Router;

impl Router {
    pub const HOME: Route = Route::Schemes;

    pub fn resolve(path: &str, auth: &AuthState) -> Resolution {
        let route = Route::from_path(path);
        match auth {
            AuthState::Uninitialized | AuthState::Loading => Resolution::Pending,
            AuthState::Anonymous => match route {
                Some(r) if r.is_public() => Resolution::Render(r),
                _ => Resolution::Redirect(Route::Login),
            },
            AuthState::Authenticated(_) => match route {
                Some(r) if !r.is_public() => Resolution::Render(r),
                _ => Resolution::Redirect(Self::HOME),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{SecretToken, Session};
    use crate::shared::RecordId;

    fn signed_in() -> AuthState {
        AuthState::Authenticated(Session {
            token: SecretToken::new("t"),
            user_id: RecordId::from("u1"),
            email: "a@b.com".into(),
            display_name: "A".into(),
        })
    }

    #[test]
    fn test_from_path_matches_first_segment() {
        assert_eq!(Route::from_path("/schemes/selected/view"), Some(Route::Schemes));
        assert_eq!(Route::from_path("/aims/add?x=1"), Some(Route::Aims));
        assert_eq!(Route::from_path("kyc"), Some(Route::Kyc));
        assert_eq!(Route::from_path("/"), None);
        assert_eq!(Route::from_path("/admin"), None);
    }

    #[test]
    fn test_anonymous_only_reaches_public_routes() {
        let anon = AuthState::Anonymous;
        assert_eq!(Router::resolve("/login", &anon), Resolution::Render(Route::Login));
        assert_eq!(
            Router::resolve("/register", &anon),
            Resolution::Render(Route::Register)
        );
        assert_eq!(Router::resolve("/wallet", &anon), Resolution::Redirect(Route::Login));
        assert_eq!(Router::resolve("/nowhere", &anon), Resolution::Redirect(Route::Login));
    }

    #[test]
    fn test_authenticated_is_sent_home_from_public_and_unknown() {
        let auth = signed_in();
        assert_eq!(Router::resolve("/kyc", &auth), Resolution::Render(Route::Kyc));
        assert_eq!(Router::resolve("/login", &auth), Resolution::Redirect(Route::Schemes));
        assert_eq!(Router::resolve("/bogus", &auth), Resolution::Redirect(Route::Schemes));
    }

    #[test]
    fn test_unresolved_state_is_pending() {
        assert_eq!(
            Router::resolve("/wallet", &AuthState::Uninitialized),
            Resolution::Pending
        );
        assert_eq!(Router::resolve("/login", &AuthState::Loading), Resolution::Pending);
    }
}
