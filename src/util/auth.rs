//! Role-based route access.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route applies the same decision, re-evaluated on each
//! render and navigation from the stored session. The component wrapper in
//! `components::role_protected_route` turns the decision into navigation.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos_router::NavigateOptions;

use crate::net::types::{Role, RoleClaim};
use crate::state::session::SessionSnapshot;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// What a protected route should do for the current session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    Render,
    /// Send the visitor to login; `force_logout` clears a corrupted session
    /// first.
    RedirectToLogin { return_to: String, force_logout: bool },
    Redirect(String),
}

impl RouteDecision {
    /// Path to navigate to, if any.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Render => None,
            Self::RedirectToLogin { .. } => Some(LOGIN_PATH),
            Self::Redirect(path) => Some(path),
        }
    }
}

/// Decide access to `path` for a route open to `allowed` roles.
#[must_use]
pub fn evaluate_route_access(session: &SessionSnapshot, allowed: &[Role], path: &str) -> RouteDecision {
    if !session.is_authenticated() {
        return RouteDecision::RedirectToLogin { return_to: path.to_owned(), force_logout: false };
    }
    let claim = session.user.as_ref().map_or(RoleClaim::Missing, |user| user.role_claim());
    match claim {
        RoleClaim::Missing => RouteDecision::RedirectToLogin { return_to: path.to_owned(), force_logout: true },
        RoleClaim::Unrecognized(_) => RouteDecision::Redirect(HOME_PATH.to_owned()),
        RoleClaim::Known(role) if allowed.contains(&role) => RouteDecision::Render,
        RoleClaim::Known(role) => RouteDecision::Redirect(role.landing_path().to_owned()),
    }
}

/// True when `next` asks for the same login redirect `previous` already
/// performed. Only the forced logout can differ between the two, since that
/// logout is what re-runs the decision.
#[must_use]
pub fn repeats_login_redirect(previous: Option<&RouteDecision>, next: &RouteDecision) -> bool {
    match (previous, next) {
        (
            Some(RouteDecision::RedirectToLogin { return_to: before, .. }),
            RouteDecision::RedirectToLogin { return_to: after, force_logout: false },
        ) => before == after,
        _ => false,
    }
}

/// Full in-app URL for a location: path plus query and fragment, each
/// accepted with or without its leading `?` or `#`.
#[must_use]
pub fn attempted_url(pathname: &str, search: &str, hash: &str) -> String {
    let mut url = pathname.to_owned();
    let search = search.trim_start_matches('?');
    if !search.is_empty() {
        url.push('?');
        url.push_str(search);
    }
    let hash = hash.trim_start_matches('#');
    if !hash.is_empty() {
        url.push('#');
        url.push_str(hash);
    }
    url
}

/// Where to send a user right after signing in: the remembered path if
/// there is one, otherwise the role's landing page.
#[must_use]
pub fn post_login_destination(role: Option<Role>, return_path: Option<String>) -> String {
    return_path
        .filter(|p| p.starts_with('/') && !p.starts_with("//") && !p.starts_with(LOGIN_PATH))
        .unwrap_or_else(|| role.map_or(HOME_PATH, Role::landing_path).to_owned())
}

/// Guard redirects replace the history entry so "back" does not bounce.
#[must_use]
pub fn redirect_options() -> NavigateOptions {
    NavigateOptions { replace: true, ..NavigateOptions::default() }
}
