//! Message entity models.

use serde::{Deserialize, Serialize};

use sms_core::constants::{columns, message_box};

use crate::row::{Row, RowError};

/// A received text message as handed to the calling application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Store identifier, unique per message on a device.
    pub id: String,
    /// Sender address or number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Message text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Receive time in epoch milliseconds.
    pub date: i64,
    /// Whether the system already marked the message read.
    pub read: bool,
}

impl MessageRecord {
    /// Construct a record from a projected store row.
    pub fn from_row(row: &Row) -> Result<Self, RowError> {
        Ok(Self {
            id: row
                .get_string(columns::ID)?
                .ok_or_else(|| RowError::NullValue(columns::ID.to_string()))?,
            address: row.get_string(columns::ADDRESS)?,
            body: row.get_string(columns::BODY)?,
            date: row.get_i64(columns::DATE)?,
            read: row.get_i64(columns::READ)? == 1,
        })
    }
}

/// A raw message as stored by the platform, including its message box.
///
/// Used to populate stores; never returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsEntry {
    pub id: i64,
    pub address: Option<String>,
    pub body: Option<String>,
    pub date: i64,
    pub read: bool,
    pub message_box: i64,
}

impl SmsEntry {
    /// A received message from `address`.
    pub fn inbox(id: i64, address: &str, body: &str, date: i64) -> Self {
        Self {
            id,
            address: Some(address.to_string()),
            body: Some(body.to_string()),
            date,
            read: false,
            message_box: message_box::INBOX,
        }
    }

    /// A message sent from this device to `address`.
    pub fn sent(id: i64, address: &str, body: &str, date: i64) -> Self {
        Self {
            message_box: message_box::SENT,
            read: true,
            ..Self::inbox(id, address, body, date)
        }
    }

    /// Mark the entry as read.
    pub fn mark_read(mut self) -> Self {
        self.read = true;
        self
    }

    /// The full store row for this entry.
    pub fn to_row(&self) -> Row {
        Row::new()
            .with(columns::ID, self.id)
            .with(columns::ADDRESS, self.address.clone())
            .with(columns::BODY, self.body.clone())
            .with(columns::DATE, self.date)
            .with(columns::READ, self.read)
            .with(columns::TYPE, self.message_box)
    }
}
