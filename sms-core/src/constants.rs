//! Application-wide constants.

/// Application name.
pub const APP_NAME: &str = "SmsReader";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Permission alias requested from the host runtime.
pub const PERMISSION_ALIAS: &str = "sms";

/// Default cap on the number of records returned by `readSms`.
pub const DEFAULT_MAX_COUNT: i64 = 50;

/// Default file name of the telephony database.
pub const DEFAULT_STORE_FILE: &str = "mmssms.db";

/// Table and column names of the platform message store.
pub mod columns {
    /// Table holding text messages.
    pub const TABLE: &str = "sms";
    pub const ID: &str = "_id";
    pub const ADDRESS: &str = "address";
    pub const BODY: &str = "body";
    pub const DATE: &str = "date";
    pub const READ: &str = "read";
    /// Message box the row belongs to (inbox, sent, draft, ...).
    pub const TYPE: &str = "type";

    /// Columns projected for every message query.
    pub const PROJECTION: &[&str] = &[ID, ADDRESS, BODY, DATE, READ];
}

/// Message box type values used by the telephony store.
pub mod message_box {
    pub const ALL: i64 = 0;
    pub const INBOX: i64 = 1;
    pub const SENT: i64 = 2;
    pub const DRAFT: i64 = 3;
}

/// Fixed human-readable messages carried by rejected calls.
pub mod messages {
    pub const PERMISSION_DENIED: &str = "SMS read permission not granted";
    pub const QUERY_FAILED: &str = "Failed to read SMS messages";
    pub const LISTENING_NOT_IMPLEMENTED: &str = "SMS listening not yet implemented";
    pub const PLATFORM_UNSUPPORTED: &str = "SMS reading not supported on this platform";
}

/// Method names of the bridge call surface.
pub mod methods {
    pub const CHECK_PERMISSION: &str = "checkPermission";
    pub const REQUEST_PERMISSION: &str = "requestPermission";
    pub const READ_SMS: &str = "readSms";
    pub const START_LISTENING: &str = "startListening";
    pub const STOP_LISTENING: &str = "stopListening";
}
