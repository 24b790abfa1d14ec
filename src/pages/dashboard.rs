//! Role dashboards and the public home page.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::use_app;
use crate::components::notification_badge::NotificationBadge;
use crate::components::notification_list::NotificationList;
use crate::net::types::Role;
use crate::state::app::Theme;
use crate::util::auth::LOGIN_PATH;

fn dashboard_heading(role: Role) -> &'static str {
    match role {
        Role::Mentee => "Mentee dashboard",
        Role::Mentor => "Mentor dashboard",
        Role::Admin | Role::SuperAdmin => "Admin dashboard",
    }
}

fn theme_toggle_label(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "Dark mode",
        Theme::Dark => "Light mode",
    }
}

/// Shared header: badge, theme and sidebar toggles, sign out.
#[component]
fn DashboardHeader(role: Role) -> impl IntoView {
    let ctx = use_app();
    let navigate = use_navigate();
    let user_name = move || ctx.state.with(|s| s.user().map(|u| u.name.clone()).unwrap_or_default());

    let on_logout = move |_| {
        ctx.logout();
        navigate(LOGIN_PATH, NavigateOptions::default());
    };

    view! {
        <header class="dashboard-page__header">
            <button class="btn" on:click=move |_| ctx.app_store().toggle_sidebar()>"Menu"</button>
            <h1>{dashboard_heading(role)}</h1>
            <span class="dashboard-page__user">{user_name}</span>
            <NotificationBadge/>
            <button
                class="btn"
                on:click=move |_| {
                    ctx.app_store().toggle_theme();
                }
            >
                {move || theme_toggle_label(ctx.state.with(|s| s.theme))}
            </button>
            <button class="btn" on:click=on_logout>"Sign out"</button>
        </header>
    }
}

/// Dashboard for one role. Rendered inside `RoleProtectedRoute`.
#[component]
pub fn DashboardPage(role: Role) -> impl IntoView {
    let ctx = use_app();
    let sidebar_open = move || ctx.state.with(|s| s.is_sidebar_open);

    view! {
        <div class="dashboard-page" class:dashboard-page--sidebar-open=sidebar_open>
            <DashboardHeader role=role/>
            <aside class="dashboard-page__sidebar" class:hidden=move || !sidebar_open()>
                <a href=role.landing_path()>"Overview"</a>
            </aside>
            <main class="dashboard-page__main">
                <NotificationList/>
            </main>
        </div>
    }
}

/// Public landing page.
#[component]
pub fn HomePage() -> impl IntoView {
    let ctx = use_app();
    let landing = move || ctx.state.with(|s| s.user().and_then(|u| u.role()).map(Role::landing_path));

    view! {
        <div class="home-page">
            <h1>{ctx.config().app_name}</h1>
            <p>"Find a mentor, book a session, and grow."</p>
            {move || match landing() {
                Some(path) => view! { <a class="login-button" href=path>"Go to your dashboard"</a> }.into_any(),
                None => view! {
                    <div class="home-page__actions">
                        <a class="login-button" href=LOGIN_PATH>"Sign in"</a>
                        <a class="btn" href="/signup">"Create an account"</a>
                    </div>
                }
                    .into_any(),
            }}
        </div>
    }
}
