//! Integration tests for the bridge call surface.

mod common;

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use common::{call, code, inbox, test_bridge};
use sms_bridge::{Bridge, PluginResponse};
use sms_core::error::StoreError;
use sms_services::{MessageQueryService, NativeSmsReader, SmsReaderClient, UnsupportedSmsReader};

// ---- individual calls ----

#[tokio::test]
async fn check_permission_resolves_status() {
    let t = test_bridge(false, inbox());
    let response = call(&t.bridge, r#"{"id":1,"method":"checkPermission"}"#).await;
    assert!(response.ok);
    assert_eq!(response.id, json!(1));
    assert_eq!(response.data, Some(json!({ "granted": false })));
}

#[tokio::test]
async fn read_sms_returns_wire_records() {
    let t = test_bridge(true, inbox());
    let response = call(
        &t.bridge,
        r#"{"id":"r","method":"readSms","options":{"address":"MTN"}}"#,
    )
    .await;
    assert_eq!(
        response.data,
        Some(json!({
            "messages": [
                { "id": "2", "address": "MTN", "body": "You have received 2,000 RWF", "date": 200, "read": true },
                { "id": "1", "address": "MTN", "body": "You have received 1,000 RWF", "date": 100, "read": false }
            ]
        }))
    );
}

#[tokio::test]
async fn read_sms_without_max_count_uses_bridge_default() {
    let t = test_bridge(true, inbox());
    let service = Arc::new(MessageQueryService::new(t.gate.clone(), t.store.clone()));
    let bridge = Bridge::new(Arc::new(NativeSmsReader::new(service))).with_default_max_count(1);

    let response = call(&bridge, r#"{"id":0,"method":"readSms","options":{}}"#).await;
    assert_eq!(response.data.unwrap()["messages"].as_array().unwrap().len(), 1);

    let response = call(&bridge, r#"{"id":0,"method":"readSms","options":{"maxCount":5}}"#).await;
    assert_eq!(response.data.unwrap()["messages"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn unsupported_platform_resolves_empty() {
    let client = SmsReaderClient::new(Arc::new(UnsupportedSmsReader), true);
    let bridge = Bridge::new(Arc::new(client));
    let response = call(&bridge, r#"{"id":0,"method":"readSms"}"#).await;
    assert_eq!(response.data, Some(json!({ "messages": [] })));
    let response = call(&bridge, r#"{"id":1,"method":"checkPermission"}"#).await;
    assert_eq!(response.data, Some(json!({ "granted": false })));

    let unsupported = Bridge::new(Arc::new(SmsReaderClient::new(
        Arc::new(UnsupportedSmsReader),
        false,
    )));
    let response = call(&unsupported, r#"{"id":2,"method":"readSms"}"#).await;
    assert_eq!(code(&response), json!("UNAVAILABLE"));
    assert_eq!(
        response.error.unwrap().message,
        "SMS reading not supported on this platform"
    );
}

#[tokio::test]
async fn read_sms_denied_rejects_without_querying() {
    let t = test_bridge(false, inbox());
    let response = call(&t.bridge, r#"{"id":2,"method":"readSms","options":{}}"#).await;
    assert_eq!(code(&response), json!("PERMISSION_DENIED"));
    assert_eq!(
        response.error.unwrap().message,
        "SMS read permission not granted"
    );
    assert_eq!(t.store.query_count(), 0);
}

#[tokio::test]
async fn store_failure_rejects_with_query_failed() {
    let t = test_bridge(true, inbox());
    t.store.fail_with(StoreError::Database("disk I/O error".into()));
    let response = call(&t.bridge, r#"{"id":3,"method":"readSms"}"#).await;
    assert_eq!(code(&response), json!("QUERY_FAILED"));
    let error = response.error.unwrap();
    assert_eq!(error.message, "Failed to read SMS messages");
    assert!(error.cause.unwrap().contains("disk I/O error"));
}

#[tokio::test]
async fn listening_methods() {
    let t = test_bridge(true, inbox());
    let start = call(&t.bridge, r#"{"id":4,"method":"startListening"}"#).await;
    assert_eq!(code(&start), json!("UNIMPLEMENTED"));
    assert_eq!(start.error.unwrap().message, "SMS listening not yet implemented");

    let stop = call(&t.bridge, r#"{"id":5,"method":"stopListening"}"#).await;
    assert_eq!(stop.data, Some(json!({ "stopped": true })));
}

#[tokio::test]
async fn unknown_and_malformed_calls() {
    let t = test_bridge(true, inbox());
    let unknown = call(&t.bridge, r#"{"id":6,"method":"deleteSms"}"#).await;
    assert_eq!(code(&unknown), json!("UNIMPLEMENTED"));
    assert_eq!(unknown.id, json!(6));

    let bad_options = call(
        &t.bridge,
        r#"{"id":7,"method":"readSms","options":{"maxCount":"lots"}}"#,
    )
    .await;
    assert_eq!(code(&bad_options), json!("INVALID_ARGUMENT"));

    let garbage = call(&t.bridge, "not json").await;
    assert_eq!(code(&garbage), json!("INVALID_ARGUMENT"));
    assert_eq!(garbage.id, Value::Null);
}

// ---- transport ----

fn parse_output(out: &[u8]) -> Vec<PluginResponse> {
    String::from_utf8_lossy(out)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn serve_answers_every_line() {
    let t = test_bridge(true, inbox());
    let input = concat!(
        r#"{"id":1,"method":"checkPermission"}"#,
        "\n\n",
        r#"{"id":2,"method":"readSms","options":{"maxCount":1}}"#,
        "\n",
        r#"{"id":3,"method":"stopListening"}"#,
        "\n",
    );
    let mut out = Vec::new();
    t.bridge
        .clone()
        .serve(input.as_bytes(), &mut out)
        .await
        .unwrap();

    let mut responses = parse_output(&out);
    assert_eq!(responses.len(), 3);
    responses.sort_by_key(|r| r.id.as_i64());
    assert!(responses.iter().all(|r| r.ok));
    assert_eq!(
        responses[1].data.as_ref().unwrap()["messages"][0]["date"],
        json!(250)
    );
}

#[tokio::test]
async fn pending_prompt_does_not_block_other_calls() {
    let t = test_bridge(false, inbox());
    let input = concat!(
        r#"{"id":"ask","method":"requestPermission"}"#,
        "\n",
        r#"{"id":"check","method":"checkPermission"}"#,
        "\n",
    );

    let bridge = t.bridge.clone();
    let served = tokio::spawn(async move {
        let mut out = Vec::new();
        bridge
            .serve(Cursor::new(input.as_bytes().to_vec()), &mut out)
            .await
            .unwrap();
        out
    });

    tokio::time::timeout(Duration::from_secs(5), async {
        while !t.gate.has_pending_prompt() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();
    assert!(t.gate.deliver(true));

    let out = tokio::time::timeout(Duration::from_secs(5), served)
        .await
        .unwrap()
        .unwrap();
    let responses = parse_output(&out);
    assert_eq!(responses.len(), 2);

    let ask = responses.iter().find(|r| r.id == json!("ask")).unwrap();
    assert_eq!(ask.data, Some(json!({ "granted": true })));
    let check = responses.iter().find(|r| r.id == json!("check")).unwrap();
    assert!(check.ok);
}

#[tokio::test]
async fn invalid_utf8_line_is_rejected_and_serving_continues() {
    let t = test_bridge(true, inbox());
    let mut input = Vec::new();
    input.extend_from_slice(br#"{"id":1,"method":"checkPermission"}"#);
    input.push(b'\n');
    input.extend_from_slice(b"{\"id\":2,\"method\":\"readSms\",\"options\":{\"address\":\"\xff\"}}\n");
    input.extend_from_slice(br#"{"id":3,"method":"stopListening"}"#);

    let mut out = Vec::new();
    t.bridge.clone().serve(input.as_slice(), &mut out).await.unwrap();

    let responses = parse_output(&out);
    assert_eq!(responses.len(), 3);

    let first = responses.iter().find(|r| r.id == json!(1)).unwrap();
    assert_eq!(first.data, Some(json!({ "granted": true })));
    let last = responses.iter().find(|r| r.id == json!(3)).unwrap();
    assert_eq!(last.data, Some(json!({ "stopped": true })));

    let rejected = responses.iter().find(|r| r.id == Value::Null).unwrap();
    assert_eq!(code(rejected), json!("INVALID_ARGUMENT"));
}

/// Yields its bytes, then fails every following read.
struct FailingAfter(Cursor<Vec<u8>>);

impl tokio::io::AsyncRead for FailingAfter {
    fn poll_read(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        let this = self.get_mut();
        let remaining = &this.0.get_ref()[this.0.position() as usize..];
        if remaining.is_empty() {
            return std::task::Poll::Ready(Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "host went away",
            )));
        }
        let n = remaining.len().min(buf.remaining());
        buf.put_slice(&remaining[..n]);
        this.0.set_position(this.0.position() + n as u64);
        std::task::Poll::Ready(Ok(()))
    }
}

#[tokio::test]
async fn read_error_still_answers_accepted_calls() {
    let t = test_bridge(true, inbox());
    let input = FailingAfter(Cursor::new(
        concat!(
            r#"{"id":1,"method":"checkPermission"}"#,
            "\n",
            r#"{"id":2,"method":"readSms","options":{"maxCount":1}}"#,
            "\n",
        )
        .as_bytes()
        .to_vec(),
    ));

    let mut out = Vec::new();
    let result = t
        .bridge
        .clone()
        .serve(tokio::io::BufReader::new(input), &mut out)
        .await;
    assert!(matches!(result, Err(sms_core::error::SmsError::Io(_))));

    let mut ids: Vec<i64> = parse_output(&out).iter().filter_map(|r| r.id.as_i64()).collect();
    ids.sort();
    assert_eq!(ids, vec![1, 2]);
}
