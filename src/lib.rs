#![allow(dead_code)]

pub mod autosave;
pub mod bridge;
pub mod config;
pub mod coordinator;
pub mod core;
pub mod editor;
pub mod error;

use std::sync::atomic::{AtomicBool, Ordering};

pub use error::{Error, Result};
pub use self::core::{session, vault};

/// Whether debug logging is active, shared between the logger filter and the settings toggle.
static DEBUG_LOGGING: AtomicBool = AtomicBool::new(false);

pub fn set_debug_logging(enabled: bool) {
    DEBUG_LOGGING.store(enabled, Ordering::Relaxed);
}

pub fn debug_logging() -> bool {
    DEBUG_LOGGING.load(Ordering::Relaxed)
}
