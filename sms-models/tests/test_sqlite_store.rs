//! Integration tests for the SQLite-backed message store.
//!
//! Runs real queries against a temporary telephony database and checks
//! that the rendered selection agrees with the in-memory evaluation.

mod common;

use std::ops::ControlFlow;

use rusqlite::Connection;
use sms_core::config::StoreConfig;
use sms_core::error::StoreError;
use sms_models::{
    InMemoryStore, MessageRecord, MessageStore, QueryFilter, Selection, SqliteMessageStore,
    StoreQuery,
};

fn records(store: &dyn MessageStore, filter: &QueryFilter) -> Vec<MessageRecord> {
    let mut out = Vec::new();
    store
        .query(&StoreQuery::inbox(Selection::from_filter(filter)), &mut |row| {
            out.push(MessageRecord::from_row(&row).expect("well-formed row"));
            ControlFlow::Continue(())
        })
        .expect("query should succeed");
    out
}

fn dates(records: &[MessageRecord]) -> Vec<i64> {
    records.iter().map(|r| r.date).collect()
}

#[test]
fn inbox_is_sorted_newest_first() {
    let (store, _dir) = common::create_test_store(&common::scenario_entries());
    let all = records(&store, &QueryFilter::default());
    assert_eq!(dates(&all), vec![300, 250, 200, 100]);
    assert!(all[0].read);
    assert!(!all[1].read);
}

#[test]
fn address_filter_is_exact() {
    let (store, _dir) = common::create_test_store(&common::scenario_entries());
    let from_a = records(&store, &QueryFilter::new().with_address("A"));
    assert_eq!(dates(&from_a), vec![300, 200, 100]);
    assert!(from_a.iter().all(|r| r.address.as_deref() == Some("A")));

    assert!(records(&store, &QueryFilter::new().with_address("a")).is_empty());
}

#[test]
fn min_date_is_inclusive() {
    let (store, _dir) = common::create_test_store(&common::scenario_entries());
    let recent = records(&store, &QueryFilter::new().with_min_date(200));
    assert_eq!(dates(&recent), vec![300, 250, 200]);
}

#[test]
fn sqlite_and_memory_stores_agree() {
    let entries = common::scenario_entries();
    let (sqlite, _dir) = common::create_test_store(&entries);
    let memory = InMemoryStore::with_entries(entries);

    let filters = [
        QueryFilter::default(),
        QueryFilter::new().with_address("A"),
        QueryFilter::new().with_address("B").with_min_date(100),
        QueryFilter::new().with_min_date(250),
        QueryFilter::new().with_min_date(1_000),
    ];
    for filter in &filters {
        assert_eq!(records(&sqlite, filter), records(&memory, filter), "filter {filter:?}");
    }
}

#[test]
fn early_stop_reads_only_what_is_needed() {
    let (store, _dir) = common::create_test_store(&common::scenario_entries());
    let mut seen = 0;
    store
        .query(&StoreQuery::inbox(Selection::all()), &mut |_| {
            seen += 1;
            ControlFlow::Break(())
        })
        .unwrap();
    assert_eq!(seen, 1);
}

#[test]
fn null_columns_come_back_as_absent() {
    let (store, dir) = common::create_test_store(&[]);
    {
        let conn = Connection::open(dir.path().join("mmssms.db")).unwrap();
        conn.execute("INSERT INTO sms (_id, date, type) VALUES (9, 42, 1)", [])
            .unwrap();
    }
    let found = records(&store, &QueryFilter::default());
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "9");
    assert_eq!(found[0].address, None);
    assert_eq!(found[0].body, None);
    assert!(!found[0].read);
}

#[test]
fn verify_and_stats() {
    let (store, _dir) = common::create_test_store(&common::scenario_entries());
    store.verify().unwrap();

    let stats = store.stats().unwrap();
    assert_eq!(stats.total, 5);
    assert_eq!(stats.inbox, 4);
    assert_eq!(stats.unread_inbox, 3);
    assert_eq!(stats.newest_inbox_date, Some(300));
}

#[test]
fn verify_rejects_foreign_database() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("other.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE sms (_id INTEGER PRIMARY KEY, body TEXT);")
            .unwrap();
    }
    let store = SqliteMessageStore::open(&path, &StoreConfig::default()).unwrap();
    match store.verify() {
        Err(StoreError::Unavailable(msg)) => {
            assert!(msg.contains("address"), "unexpected message: {msg}");
            assert!(msg.contains("type"), "unexpected message: {msg}");
        }
        other => panic!("expected Unavailable, got {other:?}"),
    }
}

#[test]
fn query_on_missing_table_is_a_database_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("empty.db");
    Connection::open(&path).unwrap().execute_batch("CREATE TABLE t (x);").unwrap();

    let store = SqliteMessageStore::open(&path, &StoreConfig::default()).unwrap();
    let result = store.query(&StoreQuery::inbox(Selection::all()), &mut |_| ControlFlow::Continue(()));
    assert!(matches!(result, Err(StoreError::Database(_))));
}
