//! Route wrapper that renders its children only for allowed roles.
//!
//! The decision is recomputed whenever the path or the global app state
//! changes, so a logout or a 401 teardown redirects immediately.

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

use crate::app::use_app;
use crate::net::types::Role;
use crate::util::auth::{
    LOGIN_PATH, RouteDecision, attempted_url, evaluate_route_access, redirect_options, repeats_login_redirect,
};

#[component]
pub fn RoleProtectedRoute(#[prop(into)] allowed_roles: Vec<Role>, children: ChildrenFn) -> impl IntoView {
    let ctx = use_app();
    let location = use_location();
    let navigate = use_navigate();
    let allowed = StoredValue::new(allowed_roles);

    let decision = Memo::new(move |_| {
        ctx.state.track();
        let path = attempted_url(&location.pathname.get(), &location.search.get(), &location.hash.get());
        let session = ctx.session().snapshot();
        allowed.with_value(|roles| evaluate_route_access(&session, roles, &path))
    });

    Effect::new(move |previous: Option<RouteDecision>| {
        let current = decision.get();
        if repeats_login_redirect(previous.as_ref(), &current) {
            return current;
        }
        match &current {
            RouteDecision::Render => {}
            RouteDecision::RedirectToLogin { return_to, force_logout } => {
                if *force_logout {
                    log::warn!("guard: session has no usable role, signing out");
                    ctx.session().logout();
                }
                ctx.session().remember_return_path(return_to.clone());
                navigate(LOGIN_PATH, redirect_options());
                if *force_logout {
                    ctx.app_store().set_user(None);
                }
            }
            RouteDecision::Redirect(path) => navigate(path, redirect_options()),
        }
        current
    });

    move || matches!(decision.get(), RouteDecision::Render).then(|| children())
}
