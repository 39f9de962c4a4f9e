//! SMS Reader Core - Foundation types, error handling, configuration, and logging.
//!
//! This crate provides the shared foundation used by the other SMS reader crates:
//! - Application configuration (message store location, permission consent, limits)
//! - The caller-visible error taxonomy and its stable error codes
//! - Structured logging with tracing
//! - Platform detection utilities
//! - Store column names and fixed plugin constants

pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod constants;

// Re-export commonly used items at the crate root
pub use config::AppConfig;
pub use error::{ErrorKind, SmsError, SmsResult, StoreError};
pub use logging::init_logging;
pub use platform::Platform;
