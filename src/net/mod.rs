//! Networking modules for the REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` is the HTTP seam, `client` owns auth headers and error
//! normalization, `api` holds the typed endpoints, and `types` defines the
//! shared wire schema.

pub mod api;
pub mod client;
#[cfg(test)]
pub(crate) mod mock;
pub mod transport;
pub mod types;
