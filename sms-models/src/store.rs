//! The message store capability and its in-memory implementation.
//!
//! A store answers one `StoreQuery` by handing projected rows to a visitor,
//! newest first. The visitor decides when to stop, so a bounded read never
//! walks more of the store than it needs. Any cursor a backend opens lives
//! only for the duration of `query` and is released before it returns.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use sms_core::constants::columns;
use sms_core::error::StoreError;

use crate::models::message::SmsEntry;
use crate::row::Row;
use crate::selection::{SortDirection, StoreQuery};

/// Read-only access to the platform message table.
pub trait MessageStore: Send + Sync {
    /// Stream the rows matching `query` to `visit` in the requested order.
    ///
    /// Rows carry the columns of `columns::PROJECTION`. Iteration stops as
    /// soon as `visit` returns `ControlFlow::Break`.
    fn query(
        &self,
        query: &StoreQuery,
        visit: &mut dyn FnMut(Row) -> ControlFlow<()>,
    ) -> Result<(), StoreError>;
}

/// Message store held entirely in memory.
///
/// Rows keep insertion order among equal dates. Counts the queries it has
/// answered and the rows it has handed out, so callers can assert how much
/// of the store a read touched.
#[derive(Default)]
pub struct InMemoryStore {
    rows: RwLock<Vec<Row>>,
    queries: AtomicUsize,
    visited: AtomicUsize,
    failure: Mutex<Option<StoreError>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given entries.
    pub fn with_entries(entries: impl IntoIterator<Item = SmsEntry>) -> Self {
        let store = Self::new();
        for entry in entries {
            store.insert(&entry);
        }
        store
    }

    /// Add a well-formed message.
    pub fn insert(&self, entry: &SmsEntry) {
        self.insert_row(entry.to_row());
    }

    /// Add an arbitrary row, including malformed ones.
    pub fn insert_row(&self, row: Row) {
        self.rows
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(row);
    }

    /// Make every following query fail with `error`.
    pub fn fail_with(&self, error: StoreError) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(error);
    }

    /// Number of queries issued against this store.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Number of rows handed to visitors across all queries.
    pub fn visited_count(&self) -> usize {
        self.visited.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.rows.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MessageStore for InMemoryStore {
    fn query(
        &self,
        query: &StoreQuery,
        visit: &mut dyn FnMut(Row) -> ControlFlow<()>,
    ) -> Result<(), StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.failure.lock().unwrap_or_else(|e| e.into_inner()).clone() {
            return Err(error);
        }

        let rows = self.rows.read().unwrap_or_else(|e| e.into_inner());
        let mut matched: Vec<&Row> = rows
            .iter()
            .filter(|row| query.in_box(row) && query.selection.matches(row))
            .collect();

        // Stable sort keeps insertion order among equal dates.
        let date = |row: &Row| row.get_i64(columns::DATE).unwrap_or(0);
        match query.sort {
            SortDirection::Asc => matched.sort_by_key(|row| date(row)),
            SortDirection::Desc => matched.sort_by_key(|row| std::cmp::Reverse(date(row))),
        }

        for row in matched {
            self.visited.fetch_add(1, Ordering::SeqCst);
            if visit(row.project(columns::PROJECTION)).is_break() {
                break;
            }
        }
        Ok(())
    }
}
