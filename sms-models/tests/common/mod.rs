//! Shared test utilities for integration tests.

use rusqlite::Connection;
use sms_core::config::StoreConfig;
use sms_models::schema;
use sms_models::{SmsEntry, SqliteMessageStore};
use tempfile::TempDir;

/// Create a telephony database file holding `entries` and open it read-only.
/// Returns the store and the TempDir (must be held alive for the duration of the test).
pub fn create_test_store(entries: &[SmsEntry]) -> (SqliteMessageStore, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("mmssms.db");
    {
        let conn = Connection::open(&path).expect("failed to create database");
        schema::create_sms_table(&conn).expect("failed to create sms table");
        for entry in entries {
            schema::insert_entry(&conn, entry).expect("failed to insert message");
        }
    }
    let store = SqliteMessageStore::open(&path, &StoreConfig::default())
        .expect("failed to open message store");
    (store, dir)
}

/// Three messages from "A" dated 300/200/100, one from "B" dated 250,
/// and one outgoing message that must never be returned.
pub fn scenario_entries() -> Vec<SmsEntry> {
    vec![
        SmsEntry::inbox(1, "A", "payment 1", 100),
        SmsEntry::inbox(2, "A", "payment 2", 200),
        SmsEntry::inbox(3, "B", "payment 3", 250),
        SmsEntry::inbox(4, "A", "payment 4", 300).mark_read(),
        SmsEntry::sent(5, "A", "thanks", 400),
    ]
}
