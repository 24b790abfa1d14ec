//! Two-step signup over the wizard context.
//!
//! Step one collects account credentials, step two the mentoring profile.
//! Each step merges its fields into the shared [`SignupData`] before the step
//! changes in either direction, so going back keeps what was entered. A social identity without an account
//! arrives here with its name and email prefilled.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::app::use_app;
use crate::state::signup::{SignupData, provide_signup_context, use_signup};
use crate::util::auth::{post_login_destination, redirect_options};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SignupStep {
    Account,
    Profile,
}

impl SignupStep {
    fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Account => &["full_name", "email", "password"],
            Self::Profile => &["field_of_study", "country"],
        }
    }
}

/// Required fields of `step` that are still missing.
fn step_missing(step: SignupStep, data: &SignupData) -> Vec<&'static str> {
    data.missing_fields().into_iter().filter(|f| step.fields().contains(f)).collect()
}

fn account_fields(full_name: String, email: String, password: String) -> SignupData {
    SignupData { full_name: Some(full_name), email: Some(email), password: Some(password), ..SignupData::default() }
}

fn profile_fields(field_of_study: String, country: String, bio: String) -> SignupData {
    SignupData { field_of_study: Some(field_of_study), country: Some(country), bio: Some(bio), ..SignupData::default() }
}

fn missing_message(missing: &[&str]) -> String {
    let labels: Vec<String> = missing.iter().map(|f| f.replace('_', " ")).collect();
    format!("Please fill in: {}.", labels.join(", "))
}

fn text_input(label: &'static str, kind: &'static str, value: RwSignal<String>) -> impl IntoView {
    view! {
        <label class="signup-field">
            <span>{label}</span>
            <input
                class="login-input"
                type=kind
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </label>
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let ctx = use_app();
    let data = provide_signup_context();
    if let Some(pending) = ctx.pending_registration.get_untracked() {
        ctx.pending_registration.set(None);
        data.update(|d| d.merge(SignupData::from_pending(pending)));
    }
    let step = RwSignal::new(SignupStep::Account);

    on_cleanup(move || {
        data.try_update(SignupData::reset);
    });

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Create your account"</h1>
                {move || match step.get() {
                    SignupStep::Account => view! { <AccountStep step=step/> }.into_any(),
                    SignupStep::Profile => view! { <ProfileStep step=step/> }.into_any(),
                }}
            </div>
        </div>
    }
}

#[component]
fn AccountStep(step: RwSignal<SignupStep>) -> impl IntoView {
    let data = use_signup();
    let initial = data.get_untracked();
    let full_name = RwSignal::new(initial.full_name.unwrap_or_default());
    let email = RwSignal::new(initial.email.unwrap_or_default());
    let password = RwSignal::new(initial.password.unwrap_or_default());
    let info = RwSignal::new(None::<String>);

    let on_next = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        data.update(|d| d.merge(account_fields(full_name.get(), email.get(), password.get())));
        let missing = data.with(|d| step_missing(SignupStep::Account, d));
        if missing.is_empty() {
            info.set(None);
            step.set(SignupStep::Profile);
        } else {
            info.set(Some(missing_message(&missing)));
        }
    };

    view! {
        <form class="login-form" on:submit=on_next>
            <p class="login-card__subtitle">"Step 1 of 2: account"</p>
            {text_input("Full name", "text", full_name)}
            {text_input("Email", "email", email)}
            {text_input("Password", "password", password)}
            {move || info.get().map(|m| view! { <p class="login-message login-message--error">{m}</p> })}
            <button class="login-button" type="submit">"Next"</button>
        </form>
    }
}

#[component]
fn ProfileStep(step: RwSignal<SignupStep>) -> impl IntoView {
    let ctx = use_app();
    let navigate = use_navigate();
    let data = use_signup();
    let initial = data.get_untracked();
    let field_of_study = RwSignal::new(initial.field_of_study.unwrap_or_default());
    let country = RwSignal::new(initial.country.unwrap_or_default());
    let bio = RwSignal::new(initial.bio.unwrap_or_default());
    let info = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);
    let save = move || data.update(|d| d.merge(profile_fields(field_of_study.get(), country.get(), bio.get())));

    let on_back = move |_: leptos::ev::MouseEvent| {
        save();
        step.set(SignupStep::Account);
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        save();
        let request = match data.with(SignupData::to_request) {
            Ok(request) => request,
            Err(missing) => {
                info.set(Some(missing_message(&missing)));
                return;
            }
        };

        busy.set(true);
        info.set(Some("Creating your account...".to_owned()));
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match ctx.session().register(&request).await {
                Ok(user) => {
                    let role = user.role();
                    ctx.app_store().set_user(Some(user));
                    data.update(SignupData::reset);
                    navigate(&post_login_destination(role, None), redirect_options());
                }
                Err(e) => {
                    info.set(Some(e.message));
                    busy.set(false);
                }
            }
        });
    };

    view! {
        <form class="login-form" on:submit=on_submit>
            <p class="login-card__subtitle">"Step 2 of 2: profile"</p>
            {text_input("Field of study", "text", field_of_study)}
            {text_input("Country", "text", country)}
            {text_input("About you (optional)", "text", bio)}
            {move || info.get().map(|m| view! { <p class="login-message">{m}</p> })}
            <div class="signup-actions">
                <button class="btn" type="button" on:click=on_back>"Back"</button>
                <button class="login-button" type="submit" disabled=move || busy.get()>"Create account"</button>
            </div>
        </form>
    }
}
