//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`. Pure decisions live in plain functions next to the page
//! so they can be tested without a browser.

pub mod auth_callback;
pub mod dashboard;
pub mod login;
pub mod signup;
