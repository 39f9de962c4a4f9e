//! Result payloads resolved by the plugin operations.

use serde::{Deserialize, Serialize};
use sms_models::MessageRecord;

/// Result of `checkPermission` and `requestPermission`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionStatus {
    pub granted: bool,
}

/// Result of `readSms`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageList {
    pub messages: Vec<MessageRecord>,
}

/// Result of `startListening` on platforms that answer it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListeningStatus {
    pub listening: bool,
}

/// Result of `stopListening`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopStatus {
    pub stopped: bool,
}
