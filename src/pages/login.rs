//! Login page: social sign-in through the hosted identity provider.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::app::use_app;
use crate::config::IdentityProviderConfig;
use crate::util::auth::{post_login_destination, redirect_options};

/// Route the identity provider redirects back to.
pub const CALLBACK_PATH: &str = "/auth/callback";

/// Opaque anti-forgery value echoed back by the provider.
fn new_login_state() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn social_login_url(identity: Option<&IdentityProviderConfig>, redirect_uri: &str, state: &str) -> Option<String> {
    identity.map(|provider| provider.authorize_url(redirect_uri, state))
}

/// Absolute, URL-encoded callback address for the current origin.
fn callback_redirect_uri() -> String {
    #[cfg(feature = "csr")]
    {
        let origin = web_sys::window().and_then(|w| w.location().origin().ok()).unwrap_or_default();
        js_sys::encode_uri_component(&format!("{origin}{CALLBACK_PATH}")).into()
    }
    #[cfg(not(feature = "csr"))]
    {
        CALLBACK_PATH.to_owned()
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_app();
    let navigate = use_navigate();
    let config = ctx.config();

    let message = ctx.auth_message.get_untracked();
    ctx.auth_message.set(None);

    let session = ctx.session();
    if session.validate() {
        let role = session.user().and_then(|u| u.role());
        if role.is_some() {
            let target = post_login_destination(role, session.take_return_path());
            Effect::new(move || navigate(&target, redirect_options()));
        }
    }

    let login_url = social_login_url(config.identity.as_ref(), &callback_redirect_uri(), &new_login_state());

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>{config.app_name}</h1>
                <p class="login-card__subtitle">"Sign in to continue"</p>
                {message.map(|m| view! { <p class="login-message login-message--error">{m}</p> })}
                {match login_url {
                    Some(url) => view! { <a class="login-button" href=url>"Continue with social login"</a> }.into_any(),
                    None => view! { <p class="login-message">"Social login is not configured."</p> }.into_any(),
                }}
                <div class="login-divider"></div>
                <p class="login-card__footer">
                    "New here? "
                    <a href="/signup">"Create an account"</a>
                </p>
            </div>
        </div>
    }
}
