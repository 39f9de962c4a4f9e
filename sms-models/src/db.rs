//! Message store backed by the platform's telephony SQLite database.
//!
//! Opens the database read-only through an r2d2 pool. Each query borrows a
//! connection for its own duration; the statement and its cursor are dropped
//! before the connection goes back to the pool.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

use sms_core::config::StoreConfig;
use sms_core::constants::{columns, message_box};
use sms_core::error::StoreError;

use crate::row::{Row, Value};
use crate::selection::StoreQuery;
use crate::store::MessageStore;

/// Type alias for the SQLite connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Read-only message store over a telephony database file.
#[derive(Clone)]
pub struct SqliteMessageStore {
    pool: Arc<DbPool>,
    path: PathBuf,
}

impl SqliteMessageStore {
    /// Open the database at `db_path` read-only.
    pub fn open(db_path: &Path, config: &StoreConfig) -> Result<Self, StoreError> {
        if !db_path.exists() {
            return Err(StoreError::Unavailable(format!(
                "no message database at {}",
                db_path.display()
            )));
        }

        info!("opening message store at {}", db_path.display());

        let manager = SqliteConnectionManager::file(db_path).with_flags(
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        );
        let pool = Pool::builder()
            .max_size(config.pool_size.max(1))
            .connection_timeout(Duration::from_secs(5))
            .connection_customizer(Box::new(ConnectionCustomizer {
                busy_timeout: Duration::from_millis(config.busy_timeout_ms),
            }))
            .build(manager)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(Self {
            pool: Arc::new(pool),
            path: db_path.to_path_buf(),
        })
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> Result<r2d2::PooledConnection<SqliteConnectionManager>, StoreError> {
        self.pool.get().map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    /// Check that the message table exists with every column a query needs.
    pub fn verify(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let present = table_columns(&conn, columns::TABLE)?;
        if present.is_empty() {
            return Err(StoreError::Unavailable(format!(
                "table '{}' not found",
                columns::TABLE
            )));
        }

        let missing: Vec<&str> = columns::PROJECTION
            .iter()
            .chain(std::iter::once(&columns::TYPE))
            .filter(|c| !present.iter().any(|p| p.as_str() == **c))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(StoreError::Unavailable(format!(
                "table '{}' is missing columns: {}",
                columns::TABLE,
                missing.join(", ")
            )));
        }

        debug!("message store schema verified");
        Ok(())
    }

    /// Row counts for the message table.
    pub fn stats(&self) -> Result<StoreStats, StoreError> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN {ty} = ?1 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN {ty} = ?1 AND {read} = 0 THEN 1 ELSE 0 END), 0),
                    MAX(CASE WHEN {ty} = ?1 THEN {date} END)
             FROM {table}",
            ty = columns::TYPE,
            read = columns::READ,
            date = columns::DATE,
            table = columns::TABLE,
        );
        conn.query_row(&sql, [message_box::INBOX], |row| {
            Ok(StoreStats {
                total: row.get(0)?,
                inbox: row.get(1)?,
                unread_inbox: row.get(2)?,
                newest_inbox_date: row.get(3)?,
            })
        })
        .map_err(|e| StoreError::Database(e.to_string()))
    }
}

impl MessageStore for SqliteMessageStore {
    fn query(
        &self,
        query: &StoreQuery,
        visit: &mut dyn FnMut(Row) -> ControlFlow<()>,
    ) -> Result<(), StoreError> {
        let (sql, args) = build_sql(query);
        debug!(%sql, args = args.len(), "querying message store");

        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        let mut rows = stmt
            .query(rusqlite::params_from_iter(args.iter()))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        while let Some(row) = rows.next().map_err(|e| StoreError::Database(e.to_string()))? {
            let mut projected = Row::new();
            for (idx, column) in columns::PROJECTION.iter().enumerate() {
                let value = row
                    .get_ref(idx)
                    .map_err(|e| StoreError::Database(e.to_string()))?;
                projected.push(column, Value::from(value));
            }
            if visit(projected).is_break() {
                break;
            }
        }
        Ok(())
    }
}

/// Render a store query to SQL and its positional arguments.
fn build_sql(query: &StoreQuery) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut args = Vec::new();

    if query.message_box != message_box::ALL {
        clauses.push(format!("{} = ?", columns::TYPE));
        args.push(Value::Integer(query.message_box));
    }
    if let Some(clause) = query.selection.where_clause() {
        clauses.push(clause);
        args.extend(query.selection.args());
    }

    let mut sql = format!("SELECT {} FROM {}", columns::PROJECTION.join(", "), columns::TABLE);
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(&format!(" ORDER BY {} {}", columns::DATE, query.sort.as_sql()));
    (sql, args)
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .map_err(|e| StoreError::Database(e.to_string()))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>("name"))
        .map_err(|e| StoreError::Database(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StoreError::Database(e.to_string()))?;
    Ok(names)
}

/// Row counts of the message table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total: i64,
    pub inbox: i64,
    pub unread_inbox: i64,
    pub newest_inbox_date: Option<i64>,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "total={}, inbox={}, unread_inbox={}",
            self.total, self.inbox, self.unread_inbox
        )
    }
}

/// r2d2 connection customizer that keeps connections read-only.
#[derive(Debug)]
struct ConnectionCustomizer {
    busy_timeout: Duration,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for ConnectionCustomizer {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.busy_timeout(self.busy_timeout)?;
        conn.execute_batch("PRAGMA query_only=ON;")?;
        Ok(())
    }
}
