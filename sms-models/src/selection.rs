//! Selection predicates and query descriptions for message stores.
//!
//! A `Selection` is a conjunction of conditions. SQL-backed stores render it
//! to a parameterized `WHERE` fragment; in-memory stores evaluate it against
//! rows directly. Both must agree on which rows match.

use sms_core::constants::{columns, message_box};

use crate::models::filter::QueryFilter;
use crate::row::{Row, Value};

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// One term of a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `address = ?`
    AddressEquals(String),
    /// `date >= ?`
    DateAtLeast(i64),
}

impl Condition {
    fn clause(&self) -> String {
        match self {
            Condition::AddressEquals(_) => format!("{} = ?", columns::ADDRESS),
            Condition::DateAtLeast(_) => format!("{} >= ?", columns::DATE),
        }
    }

    fn arg(&self) -> Value {
        match self {
            Condition::AddressEquals(address) => Value::Text(address.clone()),
            Condition::DateAtLeast(date) => Value::Integer(*date),
        }
    }

    fn matches(&self, row: &Row) -> bool {
        match self {
            Condition::AddressEquals(address) => {
                matches!(row.get_string(columns::ADDRESS), Ok(Some(a)) if a == *address)
            }
            Condition::DateAtLeast(min) => {
                matches!(row.get_i64(columns::DATE), Ok(date) if date >= *min)
            }
        }
    }
}

/// Conjunction of conditions. Empty means "match everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    conditions: Vec<Condition>,
}

impl Selection {
    /// The unconditional selection.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build the selection for a caller's filter.
    pub fn from_filter(filter: &QueryFilter) -> Self {
        let mut selection = Self::all();
        if let Some(address) = filter.address_filter() {
            selection = selection.and(Condition::AddressEquals(address.to_string()));
        }
        if let Some(min_date) = filter.min_date {
            selection = selection.and(Condition::DateAtLeast(min_date));
        }
        selection
    }

    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn is_unconditional(&self) -> bool {
        self.conditions.is_empty()
    }

    /// The `WHERE` fragment with `?` placeholders, or `None` when unconditional.
    pub fn where_clause(&self) -> Option<String> {
        if self.is_unconditional() {
            return None;
        }
        let clauses: Vec<String> = self.conditions.iter().map(Condition::clause).collect();
        Some(clauses.join(" AND "))
    }

    /// Positional arguments for the placeholders of `where_clause`.
    pub fn args(&self) -> Vec<Value> {
        self.conditions.iter().map(Condition::arg).collect()
    }

    /// Evaluate the selection against a row.
    pub fn matches(&self, row: &Row) -> bool {
        self.conditions.iter().all(|c| c.matches(row))
    }
}

/// Everything a store needs to answer one message query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreQuery {
    pub selection: Selection,
    /// Message box to read from; `message_box::ALL` disables the restriction.
    pub message_box: i64,
    /// Ordering on the date column.
    pub sort: SortDirection,
}

impl StoreQuery {
    /// Inbox-only, newest first.
    pub fn inbox(selection: Selection) -> Self {
        Self {
            selection,
            message_box: message_box::INBOX,
            sort: SortDirection::Desc,
        }
    }

    /// Whether a full store row belongs to the requested message box.
    pub fn in_box(&self, row: &Row) -> bool {
        self.message_box == message_box::ALL
            || matches!(row.get_i64(columns::TYPE), Ok(t) if t == self.message_box)
    }
}
