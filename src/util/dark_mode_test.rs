#![cfg(not(feature = "csr"))]

use super::*;

struct PrefersDark;

impl ThemeMarker for PrefersDark {
    fn apply(&self, _theme: Theme) {}

    fn prefers_dark(&self) -> bool {
        true
    }
}

#[test]
fn document_theme_does_not_prefer_dark_outside_browser() {
    assert!(!DocumentTheme.prefers_dark());
    assert_eq!(initial_theme(&DocumentTheme), Theme::Light);
}

#[test]
fn initial_theme_follows_host_preference() {
    assert_eq!(initial_theme(&PrefersDark), Theme::Dark);
}

#[test]
fn apply_is_noop_but_callable() {
    DocumentTheme.apply(Theme::Dark);
    DocumentTheme.apply(Theme::Light);
}
