//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time and ISO dates
//! - Storage (LocalStorage on web)
//! - HTTP (fetch on web)

pub mod time;

#[cfg(target_arch = "wasm32")]
pub mod http;
#[cfg(target_arch = "wasm32")]
pub mod storage;

pub use time::{iso_date_now, now_ms};
