//! Background Tasks Module
//!
//! Contains background tasks that run periodically while a client is alive.
//!
//! # Tasks
//! - Refresh: re-fetches every cached city of a polling client

mod refresh;

pub use refresh::{RefreshReport, RefreshScheduler};
