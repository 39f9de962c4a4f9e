//! SMS Reader Models - message records, query filters, and message stores.
//!
//! This crate owns everything that touches the platform message table:
//! typed column access over raw rows, the caller-facing `MessageRecord`,
//! the `QueryFilter` input and the selection built from it, and the
//! `MessageStore` capability with an in-memory and a SQLite backend.

pub mod row;
pub mod models;
pub mod selection;
pub mod store;
pub mod db;
pub mod schema;

// Re-export key types
pub use db::{SqliteMessageStore, StoreStats};
pub use models::filter::QueryFilter;
pub use models::message::{MessageRecord, SmsEntry};
pub use row::{Row, RowError, Value};
pub use selection::{Condition, Selection, SortDirection, StoreQuery};
pub use store::{InMemoryStore, MessageStore};
