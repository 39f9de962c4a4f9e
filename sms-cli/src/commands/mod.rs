//! CLI command implementations.

pub mod read;
pub mod permission;
pub mod listen;
pub mod store;
pub mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate};
use tracing::warn;

use sms_core::config::ConfigHandle;
use sms_core::error::{SmsError, SmsResult, StoreError};
use sms_core::platform::Platform;
use sms_models::SqliteMessageStore;
use sms_services::{MessageQueryService, NativeSmsReader, SmsReader, SmsReaderClient};

use crate::gate::TerminalPermissionGate;

/// Resolve the store path from an override or the config.
pub async fn store_path(config: &ConfigHandle, db: Option<PathBuf>) -> SmsResult<PathBuf> {
    match db {
        Some(path) => Ok(path),
        None => config.read().await.effective_store_path(),
    }
}

/// Helper to open the message store from config.
pub async fn open_store(config: &ConfigHandle, db: Option<PathBuf>) -> SmsResult<SqliteMessageStore> {
    let path = store_path(config, db).await?;
    let store_config = config.read().await.store.clone();
    SqliteMessageStore::open(&path, &store_config).map_err(SmsError::from)
}

/// Build the reader the application would see.
///
/// Without a readable message store this host has no SMS inbox, and the
/// client falls back to the unsupported-platform behavior.
pub async fn open_reader(config: &ConfigHandle, db: Option<PathBuf>) -> SmsResult<SmsReaderClient> {
    let native: Option<Arc<dyn SmsReader>> = match open_store(config, db).await {
        Ok(store) => {
            let gate = Arc::new(TerminalPermissionGate::new(config.clone()).await);
            let service = Arc::new(MessageQueryService::new(gate, Arc::new(store)));
            Some(Arc::new(NativeSmsReader::new(service)))
        }
        Err(SmsError::QueryFailure(StoreError::Unavailable(reason))) => {
            warn!("no message store: {reason}");
            None
        }
        Err(e) => return Err(e),
    };
    Ok(SmsReaderClient::for_platform(Platform::current(), native))
}

/// Parse a `--since` value: epoch milliseconds, RFC 3339, or a calendar day (UTC midnight).
pub fn parse_since(value: &str) -> SmsResult<i64> {
    let value = value.trim();
    if let Ok(ms) = value.parse::<i64>() {
        return Ok(ms);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp_millis());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
        .ok_or_else(|| SmsError::InvalidArgument(format!("unrecognized date: {value}")))
}

/// Format epoch milliseconds in local time.
pub fn format_date(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Truncate a string to a maximum number of characters, appending an ellipsis if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{kept}...")
    } else {
        s.chars().take(max_len).collect()
    }
}
