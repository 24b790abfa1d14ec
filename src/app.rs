//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Storage, the API client, the session service, and the global store are
//! built exactly once here and shared through a single [`AppContext`]. The
//! services hold `Rc`s, so they sit in a local `StoredValue`; the reactive
//! app state is a plain `RwSignal` that components can track directly.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::role_protected_route::RoleProtectedRoute;
use crate::config::AppConfig;
use crate::net::client::ApiClient;
use crate::net::transport::GlooTransport;
use crate::net::types::{PendingRegistration, Role, User};
use crate::pages::{
    auth_callback::AuthCallbackPage,
    dashboard::{DashboardPage, HomePage},
    login::LoginPage,
    signup::SignupPage,
};
use crate::state::app::{AppState, AppStore};
use crate::state::session::SessionService;
use crate::util::dark_mode::{DocumentTheme, ThemeMarker};
use crate::util::storage::{PersistentStore, StorageBackend};

/// Long-lived services shared by every page.
#[derive(Clone, Debug)]
pub struct Services {
    pub config: AppConfig,
    pub store: PersistentStore,
    pub api: ApiClient,
    pub session: SessionService,
    pub app: AppStore<RwSignal<AppState>>,
}

/// Handle provided at the root. `Copy`, so closures can capture it freely.
#[derive(Clone, Copy)]
pub struct AppContext {
    services: StoredValue<Services, LocalStorage>,
    pub state: RwSignal<AppState>,
    /// Identity awaiting an account, handed from the callback to signup.
    pub pending_registration: RwSignal<Option<PendingRegistration>>,
    /// One-shot message shown on the login page.
    pub auth_message: RwSignal<Option<String>>,
}

impl AppContext {
    #[must_use]
    pub fn config(&self) -> AppConfig {
        self.services.with_value(|s| s.config.clone())
    }

    #[must_use]
    pub fn api(&self) -> ApiClient {
        self.services.with_value(|s| s.api.clone())
    }

    #[must_use]
    pub fn session(&self) -> SessionService {
        self.services.with_value(|s| s.session.clone())
    }

    #[must_use]
    pub fn app_store(&self) -> AppStore<RwSignal<AppState>> {
        self.services.with_value(|s| s.app.clone())
    }

    /// Store a session and publish the user to the global state.
    pub fn login(&self, token: &str, user: User) {
        self.session().login(token, &user);
        self.app_store().set_user(Some(user));
    }

    /// Clear the session and the global user. Navigation is up to the caller.
    pub fn logout(&self) {
        self.session().logout();
        self.app_store().set_user(None);
    }
}

/// The root [`AppContext`].
///
/// # Panics
///
/// Panics if called outside [`App`].
#[must_use]
pub fn use_app() -> AppContext {
    expect_context::<AppContext>()
}

fn storage_backend() -> Rc<dyn StorageBackend> {
    #[cfg(feature = "csr")]
    {
        Rc::new(crate::util::storage::BrowserStorage)
    }
    #[cfg(not(feature = "csr"))]
    {
        Rc::new(crate::util::storage::MemoryStorage::new())
    }
}

/// Build the services and seed the global state from storage.
fn bootstrap(config: AppConfig) -> (Services, RwSignal<AppState>) {
    let store = PersistentStore::new(storage_backend());
    let api = ApiClient::new(&config, store.clone(), Rc::new(GlooTransport));
    let session = SessionService::new(store.clone(), api.clone());
    let marker: Rc<dyn ThemeMarker> = Rc::new(DocumentTheme);

    let mut initial = AppState::rehydrate(&store, marker.as_ref());
    let user = if session.validate() { session.user() } else { None };
    initial.set_user(user);

    let state = RwSignal::new(initial);
    let app = AppStore::new(state, store.clone(), marker);

    let on_401 = app.clone();
    api.on_unauthorized(move || on_401.set_user(None));

    log::info!("app: {} {} using {}", config.app_name, config.app_version, api.base_url());
    (Services { config, store, api, session, app }, state)
}

/// Root application component.
///
/// Provides the shared context and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = AppConfig::from_env();
    let title = config.app_name.clone();
    let (services, state) = bootstrap(config);

    provide_context(AppContext {
        services: StoredValue::new_local(services),
        state,
        pending_registration: RwSignal::new(None),
        auth_message: RwSignal::new(None),
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/mentor-portal.css"/>
        <Title text=title/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("signup") view=SignupPage/>
                <Route path=(StaticSegment("auth"), StaticSegment("callback")) view=AuthCallbackPage/>
                <Route
                    path=(StaticSegment("mentee"), StaticSegment("dashboard"))
                    view=|| view! {
                        <RoleProtectedRoute allowed_roles=vec![Role::Mentee]>
                            <DashboardPage role=Role::Mentee/>
                        </RoleProtectedRoute>
                    }
                />
                <Route
                    path=(StaticSegment("mentor"), StaticSegment("dashboard"))
                    view=|| view! {
                        <RoleProtectedRoute allowed_roles=vec![Role::Mentor]>
                            <DashboardPage role=Role::Mentor/>
                        </RoleProtectedRoute>
                    }
                />
                <Route
                    path=(StaticSegment("admin"), StaticSegment("dashboard"))
                    view=|| view! {
                        <RoleProtectedRoute allowed_roles=vec![Role::Admin, Role::SuperAdmin]>
                            <DashboardPage role=Role::Admin/>
                        </RoleProtectedRoute>
                    }
                />
                <Route path=StaticSegment("") view=HomePage/>
            </Routes>
        </Router>
    }
}
