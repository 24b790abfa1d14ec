//! Social-login callback: exchanges `?code=&state=` and routes the outcome.
//!
//! SYSTEM CONTEXT
//! ==============
//! The identity provider redirects here. A known account is signed in and
//! sent to its remembered path or landing page; an unknown identity goes to
//! signup with its details prefilled; anything else lands back on login
//! with an inline message.

#[cfg(test)]
#[path = "auth_callback_test.rs"]
mod auth_callback_test;

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::app::use_app;
use crate::net::types::{PendingRegistration, Role, User};
use crate::state::session::{CallbackOutcome, SessionError};
use crate::util::auth::{LOGIN_PATH, post_login_destination, redirect_options};

pub const SIGNUP_PATH: &str = "/signup";

/// What the page does once the exchange settles.
#[derive(Clone, Debug, PartialEq, Eq)]
enum CallbackStep {
    SignedIn { user: User, role: Option<Role> },
    Register(PendingRegistration),
    Failed(String),
}

fn resolve_outcome(outcome: Result<CallbackOutcome, SessionError>) -> CallbackStep {
    match outcome {
        Ok(CallbackOutcome::LoggedIn { user, role }) => CallbackStep::SignedIn { user, role },
        Ok(CallbackOutcome::NeedsRegistration(pending)) => CallbackStep::Register(pending),
        Ok(CallbackOutcome::Failed(e)) => CallbackStep::Failed(e.message),
        Err(SessionError::MissingParameter(_)) => {
            CallbackStep::Failed("The sign-in link is incomplete. Please try again.".to_owned())
        }
    }
}

/// Provider-reported failure (`?error=...`), preferring the description.
fn provider_error(description: Option<String>, error: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty()).or(error).filter(|e| !e.trim().is_empty())
}

#[component]
pub fn AuthCallbackPage() -> impl IntoView {
    let ctx = use_app();
    let navigate = use_navigate();
    let query = use_query_map();

    let (code, state, rejected) = query.with_untracked(|q| {
        (
            q.get("code").unwrap_or_default(),
            q.get("state").unwrap_or_default(),
            provider_error(q.get("error_description"), q.get("error")),
        )
    });

    leptos::task::spawn_local(async move {
        let session = ctx.session();
        let step = match rejected {
            Some(message) => CallbackStep::Failed(message),
            None => resolve_outcome(session.handle_social_callback(&code, &state).await),
        };

        match step {
            CallbackStep::SignedIn { user, role } => {
                ctx.app_store().set_user(Some(user));
                let target = post_login_destination(role, session.take_return_path());
                navigate(&target, redirect_options());
            }
            CallbackStep::Register(pending) => {
                ctx.pending_registration.set(Some(pending));
                navigate(SIGNUP_PATH, redirect_options());
            }
            CallbackStep::Failed(message) => {
                log::warn!("auth callback: {message}");
                ctx.auth_message.set(Some(message));
                navigate(LOGIN_PATH, redirect_options());
            }
        }
    });

    view! {
        <div class="login-page">
            <div class="login-card">
                <p class="login-message">"Signing you in..."</p>
            </div>
        </div>
    }
}
