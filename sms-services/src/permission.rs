//! Permission gating.
//!
//! The host runtime owns the actual permission and the prompt shown to the
//! user. `PermissionGate` is the narrow view of it the reader consumes: a
//! synchronous check and an asynchronous request that completes once the
//! host has an answer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::{debug, info};

use sms_core::error::{SmsError, SmsResult};

/// Host capability that authorizes read access to the message store.
#[async_trait]
pub trait PermissionGate: Send + Sync {
    /// Name of the permission alias this gate answers for.
    fn alias(&self) -> &str;

    /// Whether read access is currently authorized. No side effects.
    fn is_authorized(&self) -> bool;

    /// Prompt the user and wait until the host reports the outcome.
    ///
    /// Completion only means the prompt was answered; callers re-check
    /// `is_authorized` for the result.
    async fn request_authorization(&self) -> SmsResult<()>;
}

/// Gate whose prompt is answered by the embedding host.
///
/// `request_authorization` parks on a oneshot channel until the host calls
/// `deliver` with the user's answer. At most one prompt is pending at a time.
pub struct HostPermissionGate {
    alias: String,
    granted: AtomicBool,
    pending: Mutex<Option<oneshot::Sender<bool>>>,
}

impl HostPermissionGate {
    /// A gate that starts out unauthorized.
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            granted: AtomicBool::new(false),
            pending: Mutex::new(None),
        }
    }

    /// A gate that starts out authorized.
    pub fn granted(alias: impl Into<String>) -> Self {
        let gate = Self::new(alias);
        gate.granted.store(true, Ordering::SeqCst);
        gate
    }

    /// Record the user's answer and resume the pending prompt, if any.
    ///
    /// Returns true when a waiting request was resumed.
    pub fn deliver(&self, granted: bool) -> bool {
        self.granted.store(granted, Ordering::SeqCst);
        let sender = self.pending.lock().unwrap_or_else(|e| e.into_inner()).take();
        match sender {
            Some(tx) => {
                debug!(alias = %self.alias, granted, "delivering permission result");
                tx.send(granted).is_ok()
            }
            None => false,
        }
    }

    /// Withdraw consent, as when the user revokes it in system settings.
    pub fn revoke(&self) {
        info!(alias = %self.alias, "permission revoked");
        self.granted.store(false, Ordering::SeqCst);
    }

    /// Whether a prompt is waiting for `deliver`.
    pub fn has_pending_prompt(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }
}

#[async_trait]
impl PermissionGate for HostPermissionGate {
    fn alias(&self) -> &str {
        &self.alias
    }

    fn is_authorized(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    async fn request_authorization(&self) -> SmsResult<()> {
        let rx = {
            let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            if pending.as_ref().is_some_and(|tx| !tx.is_closed()) {
                return Err(SmsError::PermissionRequestPending);
            }
            let (tx, rx) = oneshot::channel();
            *pending = Some(tx);
            rx
        };

        info!(alias = %self.alias, "waiting for permission prompt");
        rx.await
            .map(|_| ())
            .map_err(|_| SmsError::Internal("permission prompt closed without a result".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_deliver_without_prompt_still_records_answer() {
        let gate = HostPermissionGate::new("sms");
        assert!(!gate.deliver(true));
        assert!(gate.is_authorized());
        gate.revoke();
        assert!(!gate.is_authorized());
    }

    #[tokio::test]
    async fn test_prompt_resolves_on_deliver() {
        let gate = Arc::new(HostPermissionGate::new("sms"));
        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.request_authorization().await })
        };

        while !gate.has_pending_prompt() {
            tokio::task::yield_now().await;
        }
        assert!(gate.deliver(true));
        waiter.await.unwrap().unwrap();
        assert!(gate.is_authorized());
        assert!(!gate.has_pending_prompt());
    }

    #[tokio::test]
    async fn test_second_prompt_is_rejected_while_pending() {
        let gate = Arc::new(HostPermissionGate::new("sms"));
        let first = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.request_authorization().await })
        };
        while !gate.has_pending_prompt() {
            tokio::task::yield_now().await;
        }

        let second = gate.request_authorization().await;
        assert!(matches!(second, Err(SmsError::PermissionRequestPending)));

        gate.deliver(false);
        first.await.unwrap().unwrap();
        assert!(!gate.is_authorized());
    }
}
