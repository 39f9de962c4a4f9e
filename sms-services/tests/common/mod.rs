//! Shared test utilities for integration tests.

use std::sync::Arc;

use sms_models::{InMemoryStore, SmsEntry};
use sms_services::{HostPermissionGate, MessageQueryService, NativeSmsReader};

/// Everything a test needs to drive a native reader.
pub struct Harness {
    pub gate: Arc<HostPermissionGate>,
    pub store: Arc<InMemoryStore>,
    pub service: Arc<MessageQueryService>,
    pub reader: NativeSmsReader,
}

/// Build a native reader over an in-memory store holding `entries`.
pub fn harness(granted: bool, entries: Vec<SmsEntry>) -> Harness {
    let gate = Arc::new(if granted {
        HostPermissionGate::granted("sms")
    } else {
        HostPermissionGate::new("sms")
    });
    let store = Arc::new(InMemoryStore::with_entries(entries));
    let service = Arc::new(MessageQueryService::new(gate.clone(), store.clone()));
    let reader = NativeSmsReader::new(service.clone());
    Harness {
        gate,
        store,
        service,
        reader,
    }
}

/// Three inbox messages from "A" dated 300/200/100 and one from "B" dated 250,
/// plus messages that must never surface: an outgoing one and a draft.
pub fn scenario_entries() -> Vec<SmsEntry> {
    let mut draft = SmsEntry::inbox(7, "A", "unsent", 500);
    draft.message_box = sms_core::constants::message_box::DRAFT;
    vec![
        SmsEntry::inbox(1, "A", "You have received 1,000 RWF", 100),
        SmsEntry::inbox(2, "A", "You have received 2,000 RWF", 200),
        SmsEntry::inbox(3, "B", "Payment of 2,500 RWF confirmed", 250),
        SmsEntry::inbox(4, "A", "You have received 3,000 RWF", 300),
        SmsEntry::sent(6, "A", "thanks", 400),
        draft,
    ]
}

/// Dates of the returned records, in order.
pub fn dates(list: &sms_services::MessageList) -> Vec<i64> {
    list.messages.iter().map(|m| m.date).collect()
}
