//! Materialized query results.
//!
//! A [`Table`] is the full in-memory result of one executed query: an ordered
//! sequence of rows plus the column-name-to-index mapping reported by the
//! driver. Tables are populated once, during a single pass over the driver
//! cursor, and are read-only afterwards. Rows are handed out as lightweight
//! [`Row`] handles that borrow the table, so sibling navigation is a live
//! lookup into the table rather than a stored link.

use std::any::Any;
use std::collections::HashMap;

use crate::core::{FacadeError, Result};
use crate::db::Database;
use crate::mapper;
use crate::row::Row;
use crate::value::Value;

/// The materialized result of one query.
///
/// Holds a back-reference to the [`Database`] that executed the query, the
/// column mapping (immutable after construction) and the cell grid in
/// row-major order. Every row has exactly `column_count()` cells.
///
/// The column count is carried separately from the name map: a result may
/// project the same name twice (`SELECT a.id, b.id FROM ..`), in which case
/// the map resolves the name to the last such column while every row still
/// holds one cell per result column.
#[derive(Debug)]
pub struct Table<'db> {
    /// Database instance that was used to execute the query.
    database: &'db Database,
    /// Column name to zero-based column index mapping. Duplicate result
    /// names collapse to the rightmost column.
    columns: HashMap<String, usize>,
    /// Number of result columns, as reported by the statement.
    column_count: usize,
    /// Cell grid, one inner vec per row.
    cells: Vec<Vec<Value>>,
}

impl<'db> Table<'db> {
    pub(crate) fn new(
        database: &'db Database,
        columns: HashMap<String, usize>,
        column_count: usize,
    ) -> Self {
        Table {
            database,
            columns,
            column_count,
            cells: Vec::new(),
        }
    }

    /// Appends one row of cells. Only called during cursor conversion; the
    /// table is read-only once it is handed to the caller.
    pub(crate) fn push_row(&mut self, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.column_count);
        self.cells.push(values);
    }

    /// The database handle that produced this table.
    pub fn database(&self) -> &'db Database {
        self.database
    }

    /// Number of result columns.
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Resolves a column name to its zero-based index.
    ///
    /// # Errors
    ///
    /// Returns `FacadeError::UnknownColumn` if no column has that name. A
    /// miss here indicates programmer error and is never silently defaulted.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .get(name)
            .copied()
            .ok_or_else(|| FacadeError::UnknownColumn(name.to_string()))
    }

    /// Reverse lookup: the name of the column at `index`, or `None` if no
    /// column has that index.
    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, i)| **i == index)
            .map(|(name, _)| name.as_str())
    }

    /// All column names. Iteration order is unspecified relative to the
    /// column indices; sort by `column_index` if deterministic order is
    /// needed.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The row at `position`, or `None` if out of range.
    pub fn row(&self, position: usize) -> Option<Row<'_>> {
        if position < self.cells.len() {
            Some(Row::new(self, position))
        } else {
            None
        }
    }

    /// Iterates over all rows in result order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        (0..self.cells.len()).map(move |position| Row::new(self, position))
    }

    /// The first row, or `None` for an empty table.
    pub fn first(&self) -> Option<Row<'_>> {
        self.row(0)
    }

    /// The last row, or `None` for an empty table.
    pub fn last(&self) -> Option<Row<'_>> {
        self.cells.len().checked_sub(1).and_then(|p| self.row(p))
    }

    /// Maps every row to a `T` using the converter registered for `T` in the
    /// [`mapper`] registry, in row order.
    ///
    /// Returns an empty vec when no converter is registered for `T`. This is
    /// a deliberate soft miss, in contrast to the hard failure of
    /// [`Table::column_index`].
    pub fn map_all<T: Any>(&self) -> Vec<T> {
        mapper::map_table(self)
    }

    pub(crate) fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.cells.get(row).and_then(|cells| cells.get(column))
    }
}
