//! Owned rows with by-name, type-coercing column access.
//!
//! Coercion follows what a platform cursor does: reading an integer column
//! as a string yields its decimal text, reading NULL as an integer yields 0.
//! Anything that cannot be coerced is a `RowError`, which callers treat as a
//! malformed row.

use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use thiserror::Error;

/// Failure to decode a single column of a row.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// The row has no column with this name.
    #[error("column '{0}' does not exist")]
    MissingColumn(String),

    /// The column holds NULL where a value is required.
    #[error("column '{0}' is null")]
    NullValue(String),

    /// The stored value cannot be read as the requested type.
    #[error("column '{column}' cannot be read as {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
    },
}

/// A single stored value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(v: ValueRef<'_>) -> Self {
        match v {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Real(f) => ToSqlOutput::Borrowed(ValueRef::Real(*f)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

/// One projected row of the message store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column append.
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    /// Append a column, replacing any existing column with the same name.
    pub fn push(&mut self, column: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.columns.iter_mut().find(|(name, _)| name == column) {
            Some(slot) => slot.1 = value,
            None => self.columns.push((column.to_string(), value)),
        }
    }

    /// Keep only the named columns, in the given order. Absent columns stay absent.
    pub fn project(&self, columns: &[&str]) -> Row {
        let mut projected = Row::new();
        for column in columns {
            if let Ok(value) = self.value(column) {
                projected.push(column, value.clone());
            }
        }
        projected
    }

    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Raw value of a column.
    pub fn value(&self, column: &str) -> Result<&Value, RowError> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
            .ok_or_else(|| RowError::MissingColumn(column.to_string()))
    }

    /// Read a column as text. NULL reads as `None`.
    pub fn get_string(&self, column: &str) -> Result<Option<String>, RowError> {
        match self.value(column)? {
            Value::Null => Ok(None),
            Value::Integer(i) => Ok(Some(i.to_string())),
            Value::Real(f) => Ok(Some(f.to_string())),
            Value::Text(s) => Ok(Some(s.clone())),
            Value::Blob(b) => String::from_utf8(b.clone())
                .map(Some)
                .map_err(|_| mismatch(column, "text")),
        }
    }

    /// Read a column as a 64-bit integer. NULL reads as 0.
    pub fn get_i64(&self, column: &str) -> Result<i64, RowError> {
        match self.value(column)? {
            Value::Null => Ok(0),
            Value::Integer(i) => Ok(*i),
            Value::Real(f) => Ok(*f as i64),
            Value::Text(s) => s.trim().parse().map_err(|_| mismatch(column, "integer")),
            Value::Blob(_) => Err(mismatch(column, "integer")),
        }
    }
}

fn mismatch(column: &str, expected: &'static str) -> RowError {
    RowError::TypeMismatch {
        column: column.to_string(),
        expected,
    }
}
