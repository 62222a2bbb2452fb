//! Row handles and the typed accessor surface.
//!
//! A [`Row`] is a cheap copyable handle into its owning [`Table`]: it stores
//! only the table reference and its own position, so `next`/`previous` are
//! live lookups against the table, not stored links.
//!
//! The typed accessors encode a deliberately asymmetric null contract carried
//! over from the callers this layer serves: numeric and boolean accessors
//! coerce NULL to the type's zero value (`0`, `0.0`, `false`), while string
//! and date accessors preserve NULL as `None`. A non-null value of the wrong
//! kind is always a hard `TypeMismatch`; there is no cross-kind coercion.

use std::any::Any;

use chrono::NaiveDate;

use crate::core::{FacadeError, Result};
use crate::mapper;
use crate::table::Table;
use crate::value::Value;

/// A column selector: either a zero-based index or a column name.
///
/// Mirrors the driver's own row-index convention so accessors can be called
/// as `row.get(0)` or `row.get("name")`. Name resolution goes through
/// [`Table::column_index`] and therefore hard-fails on unknown names.
pub trait ColumnIndex {
    fn resolve(&self, table: &Table<'_>) -> Result<usize>;
}

impl ColumnIndex for usize {
    fn resolve(&self, table: &Table<'_>) -> Result<usize> {
        if *self < table.column_count() {
            Ok(*self)
        } else {
            Err(FacadeError::UnknownColumn(format!(
                "column index {} out of range ({} columns)",
                self,
                table.column_count()
            )))
        }
    }
}

impl ColumnIndex for &str {
    fn resolve(&self, table: &Table<'_>) -> Result<usize> {
        table.column_index(self)
    }
}

impl ColumnIndex for String {
    fn resolve(&self, table: &Table<'_>) -> Result<usize> {
        table.column_index(self)
    }
}

/// One record of a query result.
#[derive(Debug, Clone, Copy)]
pub struct Row<'t> {
    /// Owning table; navigation and name lookups resolve through it live.
    table: &'t Table<'t>,
    /// Fixed zero-based position within the table at construction time.
    position: usize,
}

impl<'t> Row<'t> {
    pub(crate) fn new(table: &'t Table<'t>, position: usize) -> Self {
        Row { table, position }
    }

    /// The table this row belongs to.
    pub fn table(&self) -> &'t Table<'t> {
        self.table
    }

    /// Zero-based position of this row within its table.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Column names of the owning table (order unspecified).
    pub fn column_names(&self) -> Vec<&'t str> {
        self.table.column_names()
    }

    /// The raw scalar value at the given column.
    ///
    /// # Errors
    ///
    /// Returns `FacadeError::UnknownColumn` if the name or index does not
    /// resolve to a column of the owning table.
    pub fn get<I: ColumnIndex>(&self, index: I) -> Result<&'t Value> {
        let column = index.resolve(self.table)?;
        self.value_at(column)
    }

    /// String accessor. NULL is preserved as `None`.
    pub fn get_string<I: ColumnIndex>(&self, index: I) -> Result<Option<&'t str>> {
        let column = index.resolve(self.table)?;
        match self.value_at(column)? {
            Value::Null => Ok(None),
            Value::Text(s) => Ok(Some(s.as_str())),
            other => Err(self.mismatch("text", other, column)),
        }
    }

    /// Date accessor. NULL is preserved as `None`.
    pub fn get_date<I: ColumnIndex>(&self, index: I) -> Result<Option<NaiveDate>> {
        let column = index.resolve(self.table)?;
        match self.value_at(column)? {
            Value::Null => Ok(None),
            Value::Date(d) => Ok(Some(*d)),
            other => Err(self.mismatch("date", other, column)),
        }
    }

    /// Integer accessor. NULL coerces to `0`.
    pub fn get_int<I: ColumnIndex>(&self, index: I) -> Result<i64> {
        let column = index.resolve(self.table)?;
        match self.value_at(column)? {
            Value::Null => Ok(0),
            Value::Integer(i) => Ok(*i),
            other => Err(self.mismatch("integer", other, column)),
        }
    }

    /// Floating-point accessor. NULL coerces to `0.0`.
    pub fn get_double<I: ColumnIndex>(&self, index: I) -> Result<f64> {
        let column = index.resolve(self.table)?;
        match self.value_at(column)? {
            Value::Null => Ok(0.0),
            Value::Real(f) => Ok(*f),
            other => Err(self.mismatch("real", other, column)),
        }
    }

    /// Boolean accessor. NULL coerces to `false`.
    pub fn get_boolean<I: ColumnIndex>(&self, index: I) -> Result<bool> {
        let column = index.resolve(self.table)?;
        match self.value_at(column)? {
            Value::Null => Ok(false),
            Value::Boolean(b) => Ok(*b),
            other => Err(self.mismatch("boolean", other, column)),
        }
    }

    /// True iff the stored value at the column is NULL.
    pub fn is_null<I: ColumnIndex>(&self, index: I) -> Result<bool> {
        Ok(self.get(index)?.is_null())
    }

    /// True iff a row exists at `position + 1` in the owning table at the
    /// time of the call.
    pub fn has_next(&self) -> bool {
        self.position + 1 < self.table.row_count()
    }

    /// The next sibling row, looked up live in the owning table.
    pub fn next(&self) -> Option<Row<'t>> {
        if self.has_next() {
            self.table.row(self.position + 1)
        } else {
            None
        }
    }

    /// True iff a row exists at `position - 1` and the table holds more than
    /// one row.
    pub fn has_previous(&self) -> bool {
        self.position >= 1 && self.table.row_count() > 1
    }

    /// The previous sibling row, looked up live in the owning table.
    pub fn previous(&self) -> Option<Row<'t>> {
        if self.has_previous() {
            self.table.row(self.position - 1)
        } else {
            None
        }
    }

    /// Builds a `T` from this row using the converter registered for `T` in
    /// the [`mapper`] registry. Returns `None` when no converter is
    /// registered.
    pub fn map_to<T: Any>(&self) -> Option<T> {
        mapper::map_row(self)
    }

    fn value_at(&self, column: usize) -> Result<&'t Value> {
        self.table.cell(self.position, column).ok_or_else(|| {
            FacadeError::UnknownColumn(format!("column index {column} out of range"))
        })
    }

    fn mismatch(&self, expected: &'static str, found: &Value, column: usize) -> FacadeError {
        let column = self
            .table
            .column_name(column)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{column}"));
        FacadeError::TypeMismatch {
            expected,
            found: found.kind(),
            column,
        }
    }
}
