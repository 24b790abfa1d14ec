//! Unread-notification badge for the app header.

#[cfg(test)]
#[path = "notification_badge_test.rs"]
mod notification_badge_test;

use leptos::prelude::*;

use crate::hooks::use_unread_count;

/// Largest count shown verbatim.
const MAX_SHOWN: u32 = 99;

fn badge_label(count: u32) -> String {
    if count > MAX_SHOWN { format!("{MAX_SHOWN}+") } else { count.to_string() }
}

#[component]
pub fn NotificationBadge() -> impl IntoView {
    let unread = use_unread_count();

    view! {
        <span
            class="notification-badge"
            class:notification-badge--empty=move || unread.count() == 0
            title=move || format!("{} unread notifications", unread.count())
        >
            {move || badge_label(unread.count())}
        </span>
    }
}
