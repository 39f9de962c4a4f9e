//! SMS Reader Services - permission gating, message queries, and the plugin surface.
//!
//! This crate provides:
//! - The `PermissionGate` capability and a host-driven implementation that
//!   resolves one pending prompt when the host delivers the user's answer
//! - `MessageQueryService`, the permission-gated, filtered, bounded read
//!   over a `MessageStore`
//! - The `SmsReader` plugin surface with a native implementation, a
//!   fallback for platforms without an SMS inbox, and a platform-aware client

pub mod status;
pub mod permission;
pub mod query;
pub mod reader;

// Re-export key types
pub use status::{ListeningStatus, MessageList, PermissionStatus, StopStatus};
pub use permission::{HostPermissionGate, PermissionGate};
pub use query::MessageQueryService;
pub use reader::{NativeSmsReader, SmsReader, SmsReaderClient, UnsupportedSmsReader};
