//! Notification list with per-item and bulk actions.
//!
//! ERROR HANDLING
//! ==============
//! Mutations update the list optimistically through the hook. When the
//! backend rejects one, the hook has already rolled the list back and the
//! error message is shown above the list until the next successful action.

#[cfg(test)]
#[path = "notification_list_test.rs"]
mod notification_list_test;

use std::future::Future;

use leptos::prelude::*;

use crate::hooks::{NotificationsHandle, NotificationsOptions, use_notifications};
use crate::net::client::ApiError;
use crate::net::types::{Notification, NotificationFilter};
use crate::state::notifications::LoadStatus;

/// Human title for a notification category, e.g. `session_booked` -> "Session booked".
fn humanize_kind(kind: &str) -> String {
    let spaced = kind.replace(['_', '-'], " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Notification".to_owned(),
    }
}

fn display_title(notification: &Notification) -> String {
    notification
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| humanize_kind(&notification.kind))
}

/// Run a mutation in the background and surface its error, if any.
fn report<F>(action: F, error: RwSignal<Option<String>>)
where
    F: Future<Output = Result<(), ApiError>> + 'static,
{
    leptos::task::spawn_local(async move {
        let outcome = action.await.err().map(|e| e.message);
        error.set(outcome);
    });
}

#[component]
pub fn NotificationList(#[prop(optional)] unread_only: bool, #[prop(optional)] kind: Option<String>) -> impl IntoView {
    let feed = use_notifications(NotificationsOptions {
        filter: NotificationFilter { unread_only, kind },
        ..NotificationsOptions::default()
    });
    let action_error = RwSignal::new(None::<String>);

    view! {
        <section class="notifications">
            <header class="notifications__header">
                <h2>"Notifications"</h2>
                <span class="notifications__count">{move || feed.unread_count()}" unread"</span>
                <button class="btn" on:click=move |_| report(feed.mark_all_as_read(), action_error)>
                    "Mark all read"
                </button>
                <button class="btn" on:click=move |_| report(feed.clear_read_notifications(), action_error)>
                    "Clear read"
                </button>
                <button class="btn" on:click=move |_| feed.refresh()>"Refresh"</button>
            </header>

            {move || {
                action_error.get().map(|message| view! { <p class="notifications__error">{message}</p> })
            }}

            {move || match feed.status() {
                LoadStatus::Idle | LoadStatus::Loading => {
                    view! { <p class="notifications__status">"Loading notifications..."</p> }.into_any()
                }
                LoadStatus::Error => {
                    let message = feed.error().unwrap_or_default();
                    view! { <p class="notifications__error">{message}</p> }.into_any()
                }
                LoadStatus::Ready => {
                    let items = feed.items();
                    if items.is_empty() {
                        view! { <p class="notifications__status">"You're all caught up."</p> }.into_any()
                    } else {
                        view! {
                            <ul class="notifications__list">
                                {items
                                    .into_iter()
                                    .map(|n| view! { <NotificationRow notification=n feed=feed action_error=action_error/> })
                                    .collect_view()}
                            </ul>
                        }
                            .into_any()
                    }
                }
            }}
        </section>
    }
}

#[component]
fn NotificationRow(
    notification: Notification,
    feed: NotificationsHandle,
    action_error: RwSignal<Option<String>>,
) -> impl IntoView {
    let title = display_title(&notification);
    let unread = !notification.is_read;
    let read_id = notification.id.clone();
    let delete_id = notification.id;

    view! {
        <li class="notification" class:notification--unread=unread>
            <div class="notification__body">
                <strong class="notification__title">{title}</strong>
                {notification.message.map(|m| view! { <p class="notification__message">{m}</p> })}
                <time class="notification__time">{notification.timestamp}</time>
            </div>
            <div class="notification__actions">
                {unread
                    .then(|| {
                        view! {
                            <button
                                class="btn btn--small"
                                on:click=move |_| report(feed.mark_as_read(read_id.clone()), action_error)
                            >
                                "Mark read"
                            </button>
                        }
                    })}
                <button
                    class="btn btn--small btn--danger"
                    on:click=move |_| report(feed.delete_notification(delete_id.clone()), action_error)
                >
                    "Delete"
                </button>
            </div>
        </li>
    }
}
