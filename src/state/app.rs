//! Global app state: theme, current user, and layout chrome.
//!
//! DESIGN
//! ======
//! `AppState` keeps `user` and `is_authenticated` private so the only way to
//! change either is [`AppState::set_user`], which assigns both in one step.
//! [`AppStore`] wraps the state in a [`StateCell`] and owns the side effects:
//! persisting `{ theme, user, isSidebarOpen }` and keeping the document's
//! dark-mode marker in lockstep with `theme`.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::cell::StateCell;
use crate::net::types::User;
use crate::util::dark_mode::{ThemeMarker, initial_theme};
use crate::util::storage::{APP_STATE_KEY, PersistentStore};

/// Color theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

/// Process-wide UI state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    pub theme: Theme,
    user: Option<User>,
    is_authenticated: bool,
    pub is_sidebar_open: bool,
    /// Runtime only; never persisted.
    pub is_mobile_menu_open: bool,
}

impl AppState {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    /// Assign the user and recompute `is_authenticated` together.
    pub fn set_user(&mut self, user: Option<User>) {
        self.is_authenticated = user.is_some();
        self.user = user;
    }

    #[must_use]
    pub fn persisted(&self) -> PersistedAppState {
        PersistedAppState { theme: self.theme, user: self.user.clone(), is_sidebar_open: self.is_sidebar_open }
    }

    /// State to seed the store with: the persisted snapshot, or defaults with
    /// the host's color-scheme preference.
    #[must_use]
    pub fn rehydrate(store: &PersistentStore, marker: &dyn ThemeMarker) -> Self {
        match store.get_opt::<PersistedAppState>(APP_STATE_KEY) {
            Some(snapshot) => Self::from_persisted(snapshot),
            None => Self { theme: initial_theme(marker), ..Self::default() },
        }
    }

    #[must_use]
    pub fn from_persisted(snapshot: PersistedAppState) -> Self {
        let mut state = Self { theme: snapshot.theme, is_sidebar_open: snapshot.is_sidebar_open, ..Self::default() };
        state.set_user(snapshot.user);
        state
    }
}

/// Stored layout under [`APP_STATE_KEY`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAppState {
    pub theme: Theme,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub is_sidebar_open: bool,
}

/// Mutators over the global state with persistence and theme side effects.
pub struct AppStore<C> {
    state: C,
    store: PersistentStore,
    marker: Rc<dyn ThemeMarker>,
}

impl<C: Clone> Clone for AppStore<C> {
    fn clone(&self) -> Self {
        Self { state: self.state.clone(), store: self.store.clone(), marker: self.marker.clone() }
    }
}

impl<C> fmt::Debug for AppStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppStore").finish_non_exhaustive()
    }
}

impl<C: StateCell<AppState>> AppStore<C> {
    /// Wrap an already-seeded cell and sync the document to its theme.
    pub fn new(state: C, store: PersistentStore, marker: Rc<dyn ThemeMarker>) -> Self {
        if let Some(theme) = state.read_with(|s| s.theme) {
            marker.apply(theme);
        }
        Self { state, store, marker }
    }

    #[must_use]
    pub fn state(&self) -> &C {
        &self.state
    }

    /// Current snapshot, or `None` if the state has been disposed.
    #[must_use]
    pub fn get(&self) -> Option<AppState> {
        self.state.read_with(Clone::clone)
    }

    fn mutate(&self, f: impl FnOnce(&mut AppState)) {
        if let Some(snapshot) = self.state.update_with(|s| {
            f(s);
            s.persisted()
        }) {
            self.store.set(APP_STATE_KEY, &snapshot);
        }
    }

    pub fn set_theme(&self, theme: Theme) {
        self.mutate(|s| {
            s.theme = theme;
            self.marker.apply(theme);
        });
    }

    /// Flip the theme and return the new one.
    pub fn toggle_theme(&self) -> Option<Theme> {
        let mut next = None;
        self.mutate(|s| {
            let theme = s.theme.toggled();
            s.theme = theme;
            self.marker.apply(theme);
            next = Some(theme);
        });
        next
    }

    pub fn set_user(&self, user: Option<User>) {
        self.mutate(|s| s.set_user(user));
    }

    pub fn toggle_sidebar(&self) {
        self.mutate(|s| s.is_sidebar_open = !s.is_sidebar_open);
    }

    pub fn set_sidebar_open(&self, open: bool) {
        self.mutate(|s| s.is_sidebar_open = open);
    }

    /// Runtime-only flag; does not touch storage.
    pub fn set_mobile_menu_open(&self, open: bool) {
        self.state.update_with(|s| s.is_mobile_menu_open = open);
    }
}
