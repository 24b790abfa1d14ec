//! Client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by concern (`app`, `session`, `notifications`, `signup`)
//! so pages and components depend on small focused models. Logic is written
//! against [`cell::StateCell`] so it runs over signals in the browser and
//! plain `RefCell`s in tests.

pub mod app;
pub mod cell;
pub mod notifications;
pub mod session;
pub mod signup;
