//! # mentor-portal
//!
//! Leptos + WASM client state for the mentoring marketplace: persistent
//! storage, the authenticated REST client, the session service, the global
//! app store, notification polling, role-based routing, and the signup
//! wizard.
//!
//! Everything outside the `csr` feature builds and tests natively; browser
//! APIs sit behind small traits with inert native fallbacks.

pub mod app;
pub mod components;
pub mod config;
pub mod hooks;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        leptos::logging::warn!("logger already initialized");
    }
    leptos::mount::mount_to_body(app::App);
}
