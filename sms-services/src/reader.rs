//! The `SmsReader` plugin surface.
//!
//! `NativeSmsReader` answers from a real message store. On platforms
//! without one, `UnsupportedSmsReader` stands in so callers always get a
//! well-formed answer. `SmsReaderClient` adds the platform check callers
//! make before asking for permission or messages.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use sms_core::constants::messages;
use sms_core::error::{SmsError, SmsResult};
use sms_core::platform::Platform;
use sms_models::QueryFilter;

use crate::query::MessageQueryService;
use crate::status::{ListeningStatus, MessageList, PermissionStatus, StopStatus};

/// Operations the plugin exposes to the application.
#[async_trait]
pub trait SmsReader: Send + Sync {
    async fn request_permission(&self) -> SmsResult<PermissionStatus>;

    async fn check_permission(&self) -> SmsResult<PermissionStatus>;

    async fn read_sms(&self, filter: QueryFilter) -> SmsResult<MessageList>;

    async fn start_listening(&self) -> SmsResult<ListeningStatus>;

    async fn stop_listening(&self) -> SmsResult<StopStatus>;
}

/// Reader backed by the device message store.
#[derive(Clone)]
pub struct NativeSmsReader {
    service: Arc<MessageQueryService>,
}

impl NativeSmsReader {
    pub fn new(service: Arc<MessageQueryService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl SmsReader for NativeSmsReader {
    async fn request_permission(&self) -> SmsResult<PermissionStatus> {
        self.service.request_permission().await
    }

    async fn check_permission(&self) -> SmsResult<PermissionStatus> {
        Ok(self.service.check_permission())
    }

    async fn read_sms(&self, filter: QueryFilter) -> SmsResult<MessageList> {
        // Store cursors block; keep them off the async workers.
        let service = self.service.clone();
        tokio::task::spawn_blocking(move || service.read_messages(&filter))
            .await
            .map_err(|e| SmsError::Internal(format!("read task failed: {e}")))?
    }

    async fn start_listening(&self) -> SmsResult<ListeningStatus> {
        self.service.start_listening()
    }

    async fn stop_listening(&self) -> SmsResult<StopStatus> {
        Ok(self.service.stop_listening())
    }
}

/// Reader for platforms without an SMS inbox. Never grants access.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedSmsReader;

#[async_trait]
impl SmsReader for UnsupportedSmsReader {
    async fn request_permission(&self) -> SmsResult<PermissionStatus> {
        warn!("SMS reading is not available on this platform");
        Ok(PermissionStatus { granted: false })
    }

    async fn check_permission(&self) -> SmsResult<PermissionStatus> {
        Ok(PermissionStatus { granted: false })
    }

    async fn read_sms(&self, _filter: QueryFilter) -> SmsResult<MessageList> {
        warn!("SMS reading is not available on this platform");
        Ok(MessageList::default())
    }

    async fn start_listening(&self) -> SmsResult<ListeningStatus> {
        warn!("SMS listening is not available on this platform");
        Ok(ListeningStatus { listening: false })
    }

    async fn stop_listening(&self) -> SmsResult<StopStatus> {
        Ok(StopStatus { stopped: true })
    }
}

/// Platform-aware entry point used by the application.
///
/// When SMS reading is unsupported, permission requests and reads fail with
/// `UnsupportedPlatform` and permission checks report `granted = false`
/// without consulting the reader.
#[derive(Clone)]
pub struct SmsReaderClient {
    reader: Arc<dyn SmsReader>,
    supported: bool,
}

impl SmsReaderClient {
    pub fn new(reader: Arc<dyn SmsReader>, supported: bool) -> Self {
        Self { reader, supported }
    }

    /// Pick the native reader when one is registered, else the fallback.
    ///
    /// Reading counts as supported on a platform with a native SMS store or
    /// whenever a native reader is available.
    pub fn for_platform(platform: Platform, native: Option<Arc<dyn SmsReader>>) -> Self {
        let supported = platform.has_native_sms_store() || native.is_some();
        let reader = native.unwrap_or_else(|| Arc::new(UnsupportedSmsReader));
        Self::new(reader, supported)
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    fn ensure_supported(&self) -> SmsResult<()> {
        if self.supported {
            Ok(())
        } else {
            Err(SmsError::UnsupportedPlatform(
                messages::PLATFORM_UNSUPPORTED.to_string(),
            ))
        }
    }
}

#[async_trait]
impl SmsReader for SmsReaderClient {
    async fn request_permission(&self) -> SmsResult<PermissionStatus> {
        self.ensure_supported()?;
        self.reader.request_permission().await
    }

    async fn check_permission(&self) -> SmsResult<PermissionStatus> {
        if !self.supported {
            return Ok(PermissionStatus { granted: false });
        }
        self.reader.check_permission().await
    }

    async fn read_sms(&self, filter: QueryFilter) -> SmsResult<MessageList> {
        self.ensure_supported()?;
        self.reader.read_sms(filter).await
    }

    async fn start_listening(&self) -> SmsResult<ListeningStatus> {
        self.reader.start_listening().await
    }

    async fn stop_listening(&self) -> SmsResult<StopStatus> {
        self.reader.stop_listening().await
    }
}
