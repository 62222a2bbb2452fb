//! Database Facade Module
//!
//! This module provides the thin facade over the rusqlite driver: open a
//! connection, run plain or parameterized SQL, and materialize the driver's
//! result cursor into a [`Table`] in a single forward pass.
//!
//! Everything here is synchronous and blocking: each call returns when the
//! driver returns. Execution failures are logged through `tracing` and then
//! surfaced as typed errors; nothing is retried or swallowed.

use std::collections::HashMap;

use rusqlite::{Connection, Params};
use tracing::{debug, error};

use crate::core::{FacadeError, Result};
use crate::table::Table;
use crate::value::{ColumnKind, Value};

/// Handle to one open database connection.
#[derive(Debug)]
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens a connection to the database at `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Errors
    ///
    /// Returns `FacadeError::Connection` when the connection cannot be
    /// established. Connection failures are propagated, never retried.
    pub fn connect(path: &str) -> Result<Self> {
        debug!(path, "opening database connection");
        let connection = Connection::open(path).map_err(|e| {
            error!(path, "connection failed: {e}");
            FacadeError::Connection(e.to_string())
        })?;
        Ok(Database { connection })
    }

    /// Opens a connection to a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns `FacadeError::Connection` when the connection cannot be
    /// established.
    pub fn open_in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory().map_err(|e| {
            error!("in-memory connection failed: {e}");
            FacadeError::Connection(e.to_string())
        })?;
        Ok(Database { connection })
    }

    /// Wraps an already-open driver connection.
    pub fn from_connection(connection: Connection) -> Self {
        Database { connection }
    }

    /// The raw driver connection.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Executes a read query and materializes the full result.
    ///
    /// # Arguments
    ///
    /// * `sql` - The SQL query to execute
    ///
    /// # Returns
    ///
    /// A [`Table`] holding every result row in cursor order.
    ///
    /// # Errors
    ///
    /// Returns `FacadeError::Query` if the SQL is malformed or the driver
    /// reports a fault during execution or conversion.
    pub fn query(&self, sql: &str) -> Result<Table<'_>> {
        self.query_with(sql, [])
    }

    /// Executes a parameterized read query and materializes the full result.
    ///
    /// Parameters bind positionally to the statement's placeholders in
    /// declaration order (placeholder 1 = first parameter), exactly as the
    /// driver defines it. [`Value`] implements `ToSql`, so previously read
    /// cells can be bound back directly.
    ///
    /// # Arguments
    ///
    /// * `sql` - The SQL query with positional placeholders
    /// * `params` - Parameter values, e.g. via `rusqlite::params![..]`
    ///
    /// # Errors
    ///
    /// Returns `FacadeError::Query` if the SQL is malformed or the driver
    /// reports a fault during execution or conversion.
    pub fn query_with<P: Params>(&self, sql: &str, params: P) -> Result<Table<'_>> {
        debug!(sql, "executing query");
        self.convert_to_table(sql, params).map_err(|e| {
            error!(sql, "query failed: {e}");
            e
        })
    }

    /// Executes a write statement such as INSERT, UPDATE or DELETE.
    ///
    /// # Returns
    ///
    /// The number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns `FacadeError::Query` on malformed SQL or a driver fault. The
    /// failure is logged and then returned; callers decide how to react.
    pub fn execute(&self, sql: &str) -> Result<usize> {
        self.execute_with(sql, [])
    }

    /// Executes a parameterized write statement.
    ///
    /// Parameters bind positionally, as in [`Database::query_with`].
    ///
    /// # Returns
    ///
    /// The number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns `FacadeError::Query` on malformed SQL or a driver fault.
    pub fn execute_with<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        debug!(sql, "executing update");
        self.connection.execute(sql, params).map_err(|e| {
            error!(sql, "update failed: {e}");
            FacadeError::Query(format!("update execution failed: {e}"))
        })
    }

    /// Selects every row of the named table.
    pub fn select_all(&self, table_name: &str) -> Result<Table<'_>> {
        self.query(&format!("SELECT * FROM {}", table_name))
    }

    /// Deletes every row of the named table. Be warned!
    ///
    /// # Returns
    ///
    /// The number of deleted rows.
    pub fn delete_all(&self, table_name: &str) -> Result<usize> {
        self.execute(&format!("DELETE FROM {}", table_name))
    }

    /// Prepares `sql`, runs it, and materializes the cursor into a table.
    ///
    /// The cursor is consumed in a single forward pass: the column map is
    /// built from statement metadata first, then each cursor advance reads
    /// `column_count` scalars in column order into one row. The cursor is
    /// not rewindable, so conversion and exhaustion happen together; it is
    /// closed (dropped) when this function returns.
    fn convert_to_table<P: Params>(&self, sql: &str, params: P) -> Result<Table<'_>> {
        let mut stmt = self
            .connection
            .prepare(sql)
            .map_err(|e| FacadeError::Query(format!("failed to prepare statement: {e}")))?;

        let column_count = stmt.column_count();
        let mut columns = HashMap::with_capacity(column_count);
        let mut names = Vec::with_capacity(column_count);
        let mut kinds = Vec::with_capacity(column_count);
        for (index, column) in stmt.columns().iter().enumerate() {
            columns.insert(column.name().to_string(), index);
            names.push(column.name().to_string());
            kinds.push(ColumnKind::from_decl(column.decl_type()));
        }
        debug!(column_count, "converting result cursor to table");

        let mut table = Table::new(self, columns, column_count);
        let mut rows = stmt
            .query(params)
            .map_err(|e| FacadeError::Query(format!("query execution failed: {e}")))?;
        while let Some(driver_row) = rows
            .next()
            .map_err(|e| FacadeError::Query(format!("row fetch failed: {e}")))?
        {
            let mut values = Vec::with_capacity(column_count);
            for index in 0..column_count {
                let raw = driver_row.get_ref(index)?;
                values.push(Value::from_driver(&names[index], kinds[index], raw)?);
            }
            table.push_row(values);
        }

        debug!(rows = table.row_count(), "table materialized");
        Ok(table)
    }
}
