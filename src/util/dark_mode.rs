//! Document-level dark mode marker.
//!
//! Applies or removes the `dark` class on the `<html>` element and reads the
//! host's `prefers-color-scheme`. Requires a browser environment; native
//! builds no-op so the app store stays testable.

#[cfg(test)]
#[path = "dark_mode_test.rs"]
mod dark_mode_test;

use crate::state::app::Theme;

/// Class toggled on `<html>` while the dark theme is active.
pub const DARK_CLASS: &str = "dark";

/// Side-effect seam between the theme in app state and the rendered document.
pub trait ThemeMarker {
    /// Make the document reflect `theme`.
    fn apply(&self, theme: Theme);

    /// Whether the host environment prefers a dark color scheme.
    fn prefers_dark(&self) -> bool;
}

/// Marker backed by `document.documentElement`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentTheme;

impl ThemeMarker for DocumentTheme {
    fn apply(&self, theme: Theme) {
        #[cfg(feature = "csr")]
        {
            if let Some(el) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|doc| doc.document_element())
            {
                let class_list = el.class_list();
                let result = match theme {
                    Theme::Dark => class_list.add_1(DARK_CLASS),
                    Theme::Light => class_list.remove_1(DARK_CLASS),
                };
                if result.is_err() {
                    log::warn!("dark mode: could not update document class");
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = theme;
        }
    }

    fn prefers_dark(&self) -> bool {
        #[cfg(feature = "csr")]
        {
            web_sys::window()
                .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
                .map_or(false, |mq| mq.matches())
        }
        #[cfg(not(feature = "csr"))]
        {
            false
        }
    }
}

/// Theme to use when nothing has been persisted yet.
pub fn initial_theme(marker: &dyn ThemeMarker) -> Theme {
    if marker.prefers_dark() { Theme::Dark } else { Theme::Light }
}
