//! Plugin methods exposed to the application.
//!
//! Each command bridges one method name to the reader. Absent or null
//! options take their defaults; a present option of the wrong type rejects
//! the call.

use serde_json::{Map, Value};
use tracing::debug;

use sms_core::error::{SmsError, SmsResult};
use sms_models::QueryFilter;
use sms_services::{ListeningStatus, MessageList, PermissionStatus, SmsReader, StopStatus};

pub async fn check_permission(reader: &dyn SmsReader) -> SmsResult<PermissionStatus> {
    reader.check_permission().await
}

pub async fn request_permission(reader: &dyn SmsReader) -> SmsResult<PermissionStatus> {
    reader.request_permission().await
}

pub async fn read_sms(
    reader: &dyn SmsReader,
    options: &Value,
    default_max_count: i64,
) -> SmsResult<MessageList> {
    let filter = parse_filter(options, default_max_count)?;
    debug!(?filter, "readSms");
    reader.read_sms(filter).await
}

pub async fn start_listening(reader: &dyn SmsReader) -> SmsResult<ListeningStatus> {
    reader.start_listening().await
}

pub async fn stop_listening(reader: &dyn SmsReader) -> SmsResult<StopStatus> {
    reader.stop_listening().await
}

/// Turn `readSms` options into a filter.
///
/// Null-valued keys count as absent; a missing `maxCount` takes
/// `default_max_count`.
pub fn parse_filter(options: &Value, default_max_count: i64) -> SmsResult<QueryFilter> {
    let object = match options {
        Value::Null => Map::new(),
        Value::Object(map) => map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        other => {
            return Err(SmsError::InvalidArgument(format!(
                "options must be an object, got {other}"
            )))
        }
    };

    let has_max_count = object.contains_key("maxCount");
    let mut filter: QueryFilter = serde_json::from_value(Value::Object(object))
        .map_err(|e| SmsError::InvalidArgument(e.to_string()))?;
    if !has_max_count {
        filter.max_count = default_max_count;
    }
    Ok(filter)
}
