//! Permission-gated queries over the message store.
//!
//! `read_messages` never touches the store unless the gate authorizes it.
//! Rows are mapped while the store iterates, newest first, and iteration
//! stops as soon as the requested number of records has been collected.
//! A row that fails to decode is dropped from the result.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use sms_core::constants::messages;
use sms_core::error::{SmsError, SmsResult};
use sms_models::{MessageRecord, MessageStore, QueryFilter, Selection, StoreQuery};

use crate::permission::PermissionGate;
use crate::status::{ListeningStatus, MessageList, PermissionStatus, StopStatus};

/// Answers the plugin operations against a message store.
///
/// Holds no per-call state; the only thing it tracks between calls is
/// whether a permission prompt is currently outstanding.
pub struct MessageQueryService {
    gate: Arc<dyn PermissionGate>,
    store: Arc<dyn MessageStore>,
    prompt_in_flight: AtomicBool,
}

impl MessageQueryService {
    /// Create a new MessageQueryService.
    pub fn new(gate: Arc<dyn PermissionGate>, store: Arc<dyn MessageStore>) -> Self {
        Self {
            gate,
            store,
            prompt_in_flight: AtomicBool::new(false),
        }
    }

    /// Current authorization state.
    pub fn check_permission(&self) -> PermissionStatus {
        PermissionStatus {
            granted: self.gate.is_authorized(),
        }
    }

    /// Ask for read access, prompting only when it is not already granted.
    ///
    /// Only one prompt may be outstanding; a concurrent request fails with
    /// `PermissionRequestPending`.
    pub async fn request_permission(&self) -> SmsResult<PermissionStatus> {
        if self.gate.is_authorized() {
            return Ok(PermissionStatus { granted: true });
        }

        if self
            .prompt_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("permission request while another prompt is pending");
            return Err(SmsError::PermissionRequestPending);
        }
        let _slot = PromptSlot(&self.prompt_in_flight);

        info!(alias = self.gate.alias(), "requesting SMS permission");
        self.gate.request_authorization().await?;

        let status = self.check_permission();
        info!(granted = status.granted, "permission prompt answered");
        Ok(status)
    }

    /// Read inbound messages matching `filter`, newest first.
    pub fn read_messages(&self, filter: &QueryFilter) -> SmsResult<MessageList> {
        if !self.gate.is_authorized() {
            warn!("readSms called without permission");
            return Err(SmsError::PermissionDenied);
        }

        let limit = filter.limit();
        if limit == 0 {
            return Ok(MessageList::default());
        }

        let query = StoreQuery::inbox(Selection::from_filter(filter));
        let mut records = Vec::with_capacity(limit.min(64));
        let mut skipped = 0usize;

        self.store
            .query(&query, &mut |row| {
                match MessageRecord::from_row(&row) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        skipped += 1;
                        debug!("skipping malformed message row: {e}");
                    }
                }
                if records.len() >= limit {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .map_err(|e| {
                error!("{}: {e}", messages::QUERY_FAILED);
                SmsError::QueryFailure(e)
            })?;

        debug!(
            returned = records.len(),
            skipped,
            limit,
            "read messages"
        );
        Ok(MessageList { messages: records })
    }

    /// Push delivery of new messages is not available.
    pub fn start_listening(&self) -> SmsResult<ListeningStatus> {
        Err(SmsError::NotImplemented(
            messages::LISTENING_NOT_IMPLEMENTED.to_string(),
        ))
    }

    /// Nothing is ever listening, so stopping always succeeds.
    pub fn stop_listening(&self) -> StopStatus {
        StopStatus { stopped: true }
    }
}

/// Releases the prompt slot when the request finishes or is dropped.
struct PromptSlot<'a>(&'a AtomicBool);

impl Drop for PromptSlot<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
