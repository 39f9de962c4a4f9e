//! Shared test utilities for integration tests.

use std::sync::Arc;

use serde_json::Value;

use sms_bridge::{Bridge, PluginResponse};
use sms_models::{InMemoryStore, SmsEntry};
use sms_services::{HostPermissionGate, MessageQueryService, NativeSmsReader};

pub struct TestBridge {
    pub gate: Arc<HostPermissionGate>,
    pub store: Arc<InMemoryStore>,
    pub bridge: Arc<Bridge>,
}

/// A bridge over a native reader and an in-memory inbox.
pub fn test_bridge(granted: bool, entries: Vec<SmsEntry>) -> TestBridge {
    let gate = Arc::new(if granted {
        HostPermissionGate::granted("sms")
    } else {
        HostPermissionGate::new("sms")
    });
    let store = Arc::new(InMemoryStore::with_entries(entries));
    let service = Arc::new(MessageQueryService::new(gate.clone(), store.clone()));
    let bridge = Arc::new(Bridge::new(Arc::new(NativeSmsReader::new(service))));
    TestBridge {
        gate,
        store,
        bridge,
    }
}

pub fn inbox() -> Vec<SmsEntry> {
    vec![
        SmsEntry::inbox(1, "MTN", "You have received 1,000 RWF", 100),
        SmsEntry::inbox(2, "MTN", "You have received 2,000 RWF", 200).mark_read(),
        SmsEntry::inbox(3, "Airtel", "Payment confirmed", 250),
    ]
}

/// Run `handle_line` and decode the response.
pub async fn call(bridge: &Bridge, line: &str) -> PluginResponse {
    let raw = bridge.handle_line(line).await;
    serde_json::from_str(&raw).unwrap()
}

/// Error code of a rejected response.
pub fn code(response: &PluginResponse) -> Value {
    assert!(!response.ok, "expected a rejection, got {response:?}");
    serde_json::to_value(response.error.as_ref().unwrap().code).unwrap()
}
