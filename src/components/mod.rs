//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read shared services from the root `AppContext` and own no
//! long-lived state beyond what their hooks create.

pub mod notification_badge;
pub mod notification_list;
pub mod role_protected_route;
