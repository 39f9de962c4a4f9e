//! Schema of the telephony `sms` table.
//!
//! Mirrors the columns of the platform provider closely enough that a
//! database created here and a pulled `mmssms.db` read the same way.
//! Used to build fixtures; the reader itself never writes.

use rusqlite::{params, Connection};

use crate::models::message::SmsEntry;

/// SQL to create the message table and its date index.
pub const CREATE_SMS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS sms (
    _id INTEGER PRIMARY KEY,
    thread_id INTEGER,
    address TEXT,
    person INTEGER,
    date INTEGER,
    date_sent INTEGER DEFAULT 0,
    protocol INTEGER,
    read INTEGER DEFAULT 0,
    status INTEGER DEFAULT -1,
    type INTEGER,
    reply_path_present INTEGER,
    subject TEXT,
    body TEXT,
    service_center TEXT,
    locked INTEGER DEFAULT 0,
    error_code INTEGER DEFAULT 0,
    seen INTEGER DEFAULT 0
);
CREATE INDEX IF NOT EXISTS sms_date_index ON sms (date);
";

/// Create the message table if it does not exist.
pub fn create_sms_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_SMS_TABLE)
}

/// Insert one message, returning its `_id`.
pub fn insert_entry(conn: &Connection, entry: &SmsEntry) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO sms (_id, address, date, read, type, body, seen)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?4)",
        params![
            entry.id,
            entry.address,
            entry.date,
            entry.read as i32,
            entry.message_box,
            entry.body,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}
