//! Download every video owned by a Streamable account.
//!
//! The run is strictly sequential: acquire a session, enumerate the catalog,
//! then resolve and fetch one video at a time. Files already present in the
//! output directory are skipped, which makes re-runs cheap.

pub mod api;
pub mod application;
pub mod cli;
pub mod domain;
pub mod session;
pub mod utils;
