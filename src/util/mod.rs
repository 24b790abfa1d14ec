//! Browser-side helpers shared by pages and stores.

pub mod auth;
pub mod dark_mode;
pub mod poll;
pub mod storage;
