//! Notification list and unread-count state with optimistic mutations.
//!
//! DESIGN
//! ======
//! [`NotificationsState`] is plain data with pure mutation helpers. Each
//! optimistic helper returns a [`Reversal`] describing how to undo exactly the
//! change it made. [`NotificationFeed`] applies the change, calls the backend,
//! and replays the reversal if the call fails, so local and server state do
//! not stay diverged until the next poll.
//!
//! Every authoritative count (a load or a count refresh) bumps
//! `count_epoch`. A reversal only restores the counter when the epoch it was
//! recorded at is still current; otherwise the server's number already
//! accounts for the failed change and is left alone.
//!
//! The feed is generic over [`StateCell`]: writes to a disposed cell are
//! discarded, which is how responses that land after unmount are dropped.

#[cfg(test)]
#[path = "notifications_test.rs"]
mod notifications_test;

use std::time::Duration;

use super::cell::StateCell;
use crate::net::api;
use crate::net::client::{ApiClient, ApiError};
use crate::net::types::{Notification, NotificationFilter};

/// Unread-count refresh period.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Lifecycle of a feed's data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// Local cache of the user's notifications.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NotificationsState {
    pub items: Vec<Notification>,
    pub unread_count: u32,
    pub status: LoadStatus,
    pub error: Option<String>,
    /// Bumped whenever `unread_count` is replaced by a server value.
    pub count_epoch: u64,
}

/// Inverse of one optimistic change.
#[derive(Clone, Debug, PartialEq)]
pub enum Reversal {
    MarkRead { id: String, flipped: bool, decremented: bool, epoch: u64 },
    MarkAllRead { flipped_ids: Vec<String>, previous_count: u32, epoch: u64 },
    Delete { index: usize, item: Option<Notification>, decremented: bool, epoch: u64 },
}

impl Reversal {
    /// Undo the change this reversal was recorded for.
    pub fn revert(self, state: &mut NotificationsState) {
        match self {
            Self::MarkRead { id, flipped, decremented, epoch } => {
                if flipped {
                    if let Some(item) = state.items.iter_mut().find(|n| n.id == id) {
                        item.is_read = false;
                    }
                }
                if decremented && state.count_epoch == epoch {
                    state.unread_count += 1;
                }
            }
            Self::MarkAllRead { flipped_ids, previous_count, epoch } => {
                for item in state.items.iter_mut().filter(|n| flipped_ids.contains(&n.id)) {
                    item.is_read = false;
                }
                if state.count_epoch == epoch {
                    state.unread_count = previous_count;
                }
            }
            Self::Delete { index, item, decremented, epoch } => {
                if let Some(item) = item {
                    if !state.items.iter().any(|n| n.id == item.id) {
                        let index = index.min(state.items.len());
                        state.items.insert(index, item);
                    }
                }
                if decremented && state.count_epoch == epoch {
                    state.unread_count += 1;
                }
            }
        }
    }
}

impl NotificationsState {
    pub fn begin_load(&mut self) {
        self.status = LoadStatus::Loading;
        self.error = None;
    }

    pub fn finish_load(&mut self, result: Result<(Vec<Notification>, u32), ApiError>) {
        match result {
            Ok((items, count)) => {
                self.items = items;
                self.set_unread_count(count);
                self.status = LoadStatus::Ready;
                self.error = None;
            }
            Err(e) => {
                self.status = LoadStatus::Error;
                self.error = Some(e.message);
            }
        }
    }

    /// Replace the counter with a server value.
    pub fn set_unread_count(&mut self, count: u32) {
        self.unread_count = count;
        self.count_epoch = self.count_epoch.wrapping_add(1);
    }

    /// Mark `id` read locally.
    ///
    /// A known unread item is flipped and the counter decremented; a known
    /// read item is left alone. An id missing from the local list still
    /// decrements the counter, floored at zero, since badge-only views never
    /// load the list.
    pub fn apply_mark_read(&mut self, id: &str) -> Reversal {
        let (flipped, should_decrement) = match self.items.iter_mut().find(|n| n.id == id) {
            Some(item) if !item.is_read => {
                item.is_read = true;
                (true, true)
            }
            Some(_) => (false, false),
            None => (false, true),
        };
        let decremented = should_decrement && self.unread_count > 0;
        if decremented {
            self.unread_count -= 1;
        }
        Reversal::MarkRead { id: id.to_owned(), flipped, decremented, epoch: self.count_epoch }
    }

    pub fn apply_mark_all_read(&mut self) -> Reversal {
        let mut flipped_ids = Vec::new();
        for item in self.items.iter_mut().filter(|n| !n.is_read) {
            item.is_read = true;
            flipped_ids.push(item.id.clone());
        }
        let previous_count = std::mem::take(&mut self.unread_count);
        Reversal::MarkAllRead { flipped_ids, previous_count, epoch: self.count_epoch }
    }

    /// Remove `id` locally; the counter only moves if the item was unread.
    pub fn apply_delete(&mut self, id: &str) -> Reversal {
        let Some(index) = self.items.iter().position(|n| n.id == id) else {
            return Reversal::Delete { index: 0, item: None, decremented: false, epoch: self.count_epoch };
        };
        let item = self.items.remove(index);
        let decremented = !item.is_read && self.unread_count > 0;
        if decremented {
            self.unread_count -= 1;
        }
        Reversal::Delete { index, item: Some(item), decremented, epoch: self.count_epoch }
    }

    /// Drop every read item. The counter is unaffected.
    pub fn remove_read(&mut self) {
        self.items.retain(|n| !n.is_read);
    }
}

/// Full notification feed: list, counter, and mutations.
#[derive(Clone, Debug)]
pub struct NotificationFeed<C> {
    api: ApiClient,
    state: C,
    filter: NotificationFilter,
}

impl<C: StateCell<NotificationsState>> NotificationFeed<C> {
    pub fn new(api: ApiClient, state: C, filter: NotificationFilter) -> Self {
        Self { api, state, filter }
    }

    #[must_use]
    pub fn state(&self) -> &C {
        &self.state
    }

    /// Fetch list and count concurrently; `Ready` only once both succeed.
    ///
    /// # Errors
    ///
    /// Returns the first fetch error; the state records it as `Error`.
    pub async fn load(&self) -> Result<(), ApiError> {
        self.state.update_with(NotificationsState::begin_load);
        let (items, count) = futures::join!(
            api::fetch_notifications(&self.api, &self.filter),
            api::fetch_unread_count(&self.api)
        );
        let result = items.and_then(|items| count.map(|count| (items, count)));
        let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
        if let Err(e) = &outcome {
            log::warn!("notifications: load failed: {e}");
        }
        self.state.update_with(|s| s.finish_load(result));
        outcome
    }

    /// Re-fetch only the unread count.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previous count is kept.
    pub async fn refresh_unread_count(&self) -> Result<(), ApiError> {
        match api::fetch_unread_count(&self.api).await {
            Ok(count) => {
                self.state.update_with(|s| s.set_unread_count(count));
                Ok(())
            }
            Err(e) => {
                log::warn!("notifications: unread count refresh failed: {e}");
                Err(e)
            }
        }
    }

    async fn reconcile<Fut>(&self, reversal: Option<Reversal>, call: Fut) -> Result<(), ApiError>
    where
        Fut: std::future::Future<Output = Result<(), ApiError>>,
    {
        let result = call.await;
        if let (Err(e), Some(reversal)) = (&result, reversal) {
            log::warn!("notifications: rolling back optimistic change: {e}");
            self.state.update_with(|s| reversal.revert(s));
        }
        result
    }

    /// Mark one notification read, optimistically.
    ///
    /// # Errors
    ///
    /// Returns the backend error after undoing the local change.
    pub async fn mark_as_read(&self, id: &str) -> Result<(), ApiError> {
        let reversal = self.state.update_with(|s| s.apply_mark_read(id));
        self.reconcile(reversal, api::mark_notification_read(&self.api, id)).await
    }

    /// Mark everything read, optimistically.
    ///
    /// # Errors
    ///
    /// Returns the backend error after undoing the local change.
    pub async fn mark_all_as_read(&self) -> Result<(), ApiError> {
        let reversal = self.state.update_with(NotificationsState::apply_mark_all_read);
        self.reconcile(reversal, api::mark_all_notifications_read(&self.api)).await
    }

    /// Delete one notification, optimistically.
    ///
    /// # Errors
    ///
    /// Returns the backend error after restoring the item.
    pub async fn delete_notification(&self, id: &str) -> Result<(), ApiError> {
        let reversal = self.state.update_with(|s| s.apply_delete(id));
        self.reconcile(reversal, api::delete_notification(&self.api, id)).await
    }

    /// Delete all read notifications; local items go only after the backend
    /// confirms.
    ///
    /// # Errors
    ///
    /// Returns the backend error; local state is untouched in that case.
    pub async fn clear_read_notifications(&self) -> Result<(), ApiError> {
        api::clear_read_notifications(&self.api).await?;
        self.state.update_with(NotificationsState::remove_read);
        Ok(())
    }
}

/// State for badge-only consumers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnreadCountState {
    pub count: u32,
    pub loading: bool,
    pub error: Option<String>,
}

/// Unread-count poller, independent of any [`NotificationFeed`].
#[derive(Clone, Debug)]
pub struct UnreadCounter<C> {
    api: ApiClient,
    state: C,
}

impl<C: StateCell<UnreadCountState>> UnreadCounter<C> {
    pub fn new(api: ApiClient, state: C) -> Self {
        Self { api, state }
    }

    #[must_use]
    pub fn state(&self) -> &C {
        &self.state
    }

    /// Fetch the count.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previous count is kept.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        self.state.update_with(|s| s.loading = true);
        let result = api::fetch_unread_count(&self.api).await;
        self.state.update_with(|s| {
            s.loading = false;
            match &result {
                Ok(count) => {
                    s.count = *count;
                    s.error = None;
                }
                Err(e) => s.error = Some(e.message.clone()),
            }
        });
        result.map(|_| ())
    }
}
