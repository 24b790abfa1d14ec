//! Component-scoped notification hooks.
//!
//! DESIGN
//! ======
//! Each call creates its own state signal, fires the initial load, and (when
//! enabled) starts a [`PollTask`] that is cancelled in `on_cleanup`. Feeds
//! hold an `Rc`-based API client, so they live in local `StoredValue`s and
//! the returned handles stay `Copy`.

#[cfg(test)]
#[path = "hooks_test.rs"]
mod hooks_test;

use std::future::Future;

use leptos::prelude::*;

use crate::app::use_app;
use crate::net::client::ApiError;
use crate::net::types::{Notification, NotificationFilter};
use crate::state::notifications::{
    LoadStatus, NotificationFeed, NotificationsState, POLL_INTERVAL, UnreadCountState, UnreadCounter,
};
use crate::util::poll::{PollTask, interval_ticks};

type SignalFeed = NotificationFeed<RwSignal<NotificationsState>>;
type SignalCounter = UnreadCounter<RwSignal<UnreadCountState>>;

/// Options for [`use_notifications`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationsOptions {
    /// Re-fetch the unread count every [`POLL_INTERVAL`].
    pub auto_refresh: bool,
    pub filter: NotificationFilter,
}

impl Default for NotificationsOptions {
    fn default() -> Self {
        Self { auto_refresh: true, filter: NotificationFilter::default() }
    }
}

fn unmounted() -> ApiError {
    ApiError::new("notifications are no longer mounted")
}

/// Start a poll loop that lives as long as the current reactive owner.
fn poll_while_mounted<F, Fut>(on_tick: F)
where
    F: FnMut() -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    let (task, run) = PollTask::new(interval_ticks(POLL_INTERVAL), on_tick);
    leptos::task::spawn_local(run);
    cancel_on_cleanup(task);
}

/// Tie `task` to the current reactive owner.
fn cancel_on_cleanup(task: PollTask) {
    on_cleanup(move || task.cancel());
}

/// Reactive notification list with mutations.
#[derive(Clone, Copy)]
pub struct NotificationsHandle {
    state: RwSignal<NotificationsState>,
    feed: StoredValue<SignalFeed, LocalStorage>,
}

impl NotificationsHandle {
    #[must_use]
    pub fn state(&self) -> RwSignal<NotificationsState> {
        self.state
    }

    #[must_use]
    pub fn items(&self) -> Vec<Notification> {
        self.state.with(|s| s.items.clone())
    }

    #[must_use]
    pub fn unread_count(&self) -> u32 {
        self.state.with(|s| s.unread_count)
    }

    #[must_use]
    pub fn status(&self) -> LoadStatus {
        self.state.with(|s| s.status)
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.with(|s| s.error.clone())
    }

    /// Reload list and count in the background.
    pub fn refresh(&self) {
        if let Some(feed) = self.feed.try_get_value() {
            leptos::task::spawn_local(async move {
                let _ = feed.load().await;
            });
        }
    }

    /// # Errors
    ///
    /// Returns the backend error; the local change has been rolled back.
    pub fn mark_as_read(&self, id: String) -> impl Future<Output = Result<(), ApiError>> + use<> {
        let feed = self.feed.try_get_value();
        async move {
            match feed {
                Some(feed) => feed.mark_as_read(&id).await,
                None => Err(unmounted()),
            }
        }
    }

    /// # Errors
    ///
    /// Returns the backend error; the local change has been rolled back.
    pub fn mark_all_as_read(&self) -> impl Future<Output = Result<(), ApiError>> + use<> {
        let feed = self.feed.try_get_value();
        async move {
            match feed {
                Some(feed) => feed.mark_all_as_read().await,
                None => Err(unmounted()),
            }
        }
    }

    /// # Errors
    ///
    /// Returns the backend error; the item has been restored.
    pub fn delete_notification(&self, id: String) -> impl Future<Output = Result<(), ApiError>> + use<> {
        let feed = self.feed.try_get_value();
        async move {
            match feed {
                Some(feed) => feed.delete_notification(&id).await,
                None => Err(unmounted()),
            }
        }
    }

    /// # Errors
    ///
    /// Returns the backend error; nothing was removed locally.
    pub fn clear_read_notifications(&self) -> impl Future<Output = Result<(), ApiError>> + use<> {
        let feed = self.feed.try_get_value();
        async move {
            match feed {
                Some(feed) => feed.clear_read_notifications().await,
                None => Err(unmounted()),
            }
        }
    }
}

/// Notification feed bound to the calling component.
///
/// # Panics
///
/// Panics if called outside the [`crate::app::App`] tree.
pub fn use_notifications(options: NotificationsOptions) -> NotificationsHandle {
    let api = use_app().api();
    let state = RwSignal::new(NotificationsState::default());
    let feed = NotificationFeed::new(api, state, options.filter);

    let initial = feed.clone();
    leptos::task::spawn_local(async move {
        let _ = initial.load().await;
    });

    if options.auto_refresh {
        let polled = feed.clone();
        poll_while_mounted(move || {
            let feed = polled.clone();
            async move {
                let _ = feed.refresh_unread_count().await;
            }
        });
    }

    NotificationsHandle { state, feed: StoredValue::new_local(feed) }
}

/// Reactive unread count for badges.
#[derive(Clone, Copy)]
pub struct UnreadCountHandle {
    state: RwSignal<UnreadCountState>,
    counter: StoredValue<SignalCounter, LocalStorage>,
}

impl UnreadCountHandle {
    #[must_use]
    pub fn count(&self) -> u32 {
        self.state.with(|s| s.count)
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.state.with(|s| s.loading)
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.with(|s| s.error.clone())
    }

    pub fn refresh(&self) {
        if let Some(counter) = self.counter.try_get_value() {
            leptos::task::spawn_local(async move {
                let _ = counter.refresh().await;
            });
        }
    }
}

/// Unread count with its own poll interval, independent of any feed.
///
/// # Panics
///
/// Panics if called outside the [`crate::app::App`] tree.
pub fn use_unread_count() -> UnreadCountHandle {
    let api = use_app().api();
    let state = RwSignal::new(UnreadCountState::default());
    let counter = UnreadCounter::new(api, state);

    let initial = counter.clone();
    leptos::task::spawn_local(async move {
        let _ = initial.refresh().await;
    });

    let polled = counter.clone();
    poll_while_mounted(move || {
        let counter = polled.clone();
        async move {
            let _ = counter.refresh().await;
        }
    });

    UnreadCountHandle { state, counter: StoredValue::new_local(counter) }
}
