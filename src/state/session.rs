//! Session/auth service for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by the route guard, the social-login callback page, and the app
//! bootstrap. The session lives in storage under two independent keys (token
//! and user) so a 401 can drop it without touching the rest of the app
//! snapshot.
//!
//! ERROR HANDLING
//! ==============
//! Network and server failures during the callback come back as
//! [`CallbackOutcome::Failed`]; only missing parameters, which indicate a
//! routing bug rather than a runtime condition, are returned as
//! [`SessionError`].

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::net::api;
use crate::net::client::{ApiClient, ApiError};
use crate::net::types::{PendingRegistration, RegistrationRequest, Role, User};
use crate::util::storage::{PersistentStore, TOKEN_KEY, USER_KEY};

/// Caller errors from the session service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// Result of exchanging a social-login code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Existing account; the session has been stored.
    LoggedIn { user: User, role: Option<Role> },
    /// Valid identity without a local account; route to registration.
    NeedsRegistration(PendingRegistration),
    Failed(ApiError),
}

/// Point-in-time view of the stored session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Reads and writes the stored session.
#[derive(Clone, Debug)]
pub struct SessionService {
    store: PersistentStore,
    api: ApiClient,
    return_path: Rc<RefCell<Option<String>>>,
}

impl SessionService {
    pub fn new(store: PersistentStore, api: ApiClient) -> Self {
        Self { store, api, return_path: Rc::new(RefCell::new(None)) }
    }

    /// True iff a non-empty token is stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.store.get_opt::<String>(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// The stored user, or `None` if missing or unparseable.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.store.get_opt(USER_KEY)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot { token: self.token(), user: self.user() }
    }

    /// Store a new session.
    pub fn login(&self, token: &str, user: &User) {
        self.store.set(TOKEN_KEY, token);
        self.store.set(USER_KEY, user);
        log::info!("session: signed in user {}", user.id);
    }

    /// Clear the stored session. Navigation is up to the caller.
    pub fn logout(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(USER_KEY);
        log::info!("session: signed out");
    }

    /// Enforce "a token implies a user". A token without a readable user is
    /// treated as corrupted and cleared. Returns whether a valid session
    /// remains.
    pub fn validate(&self) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        if self.user().is_some() {
            return true;
        }
        log::warn!("session: token present without a readable user, forcing logout");
        self.logout();
        false
    }

    /// Remember where an unauthenticated visitor was headed.
    pub fn remember_return_path(&self, path: impl Into<String>) {
        let path = path.into();
        if path.starts_with('/') && !path.starts_with("/login") {
            *self.return_path.borrow_mut() = Some(path);
        }
    }

    /// Take the remembered return path, if any.
    pub fn take_return_path(&self) -> Option<String> {
        self.return_path.borrow_mut().take()
    }

    /// Exchange a social-login authorization code for a session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingParameter`] if `code` or `state` is empty;
    /// all other failures are reported as [`CallbackOutcome::Failed`].
    pub async fn handle_social_callback(&self, code: &str, state: &str) -> Result<CallbackOutcome, SessionError> {
        if code.trim().is_empty() {
            return Err(SessionError::MissingParameter("code"));
        }
        if state.trim().is_empty() {
            return Err(SessionError::MissingParameter("state"));
        }

        let body = match api::exchange_social_code(&self.api, code, state).await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("session: social callback failed: {e}");
                return Ok(CallbackOutcome::Failed(e));
            }
        };

        if body.needs_registration {
            return Ok(CallbackOutcome::NeedsRegistration(body.pending_registration()));
        }
        match (body.token.as_deref().filter(|t| !t.is_empty()), body.user) {
            (Some(token), Some(user)) => {
                self.login(token, &user);
                let role = user.role();
                Ok(CallbackOutcome::LoggedIn { user, role })
            }
            (Some(_), None) => Ok(CallbackOutcome::Failed(ApiError::new(
                "login response did not include the user profile",
            ))),
            (None, _) => Ok(CallbackOutcome::Failed(ApiError::new("login response did not include a token"))),
        }
    }

    /// Create an account and store the session it returns.
    ///
    /// # Errors
    ///
    /// Returns the backend error, or an [`ApiError`] if the response carries
    /// no usable session.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<User, ApiError> {
        let body = api::register_account(&self.api, request).await?;
        match (body.token.filter(|t| !t.is_empty()), body.user) {
            (Some(token), Some(user)) => {
                self.login(&token, &user);
                Ok(user)
            }
            _ => Err(ApiError::new("registration response did not include a session")),
        }
    }
}
