//! SMS Reader Bridge - the call surface seen by the web application.
//!
//! Calls arrive as `{id, method, options}` objects and are answered with
//! either a resolved payload or a rejection carrying a message and an
//! error code. `Bridge::serve` speaks this protocol as JSON lines over any
//! async reader/writer pair.

pub mod call;
pub mod commands;
pub mod dispatch;

pub use call::{PluginCall, PluginResponse, Rejection};
pub use dispatch::Bridge;
