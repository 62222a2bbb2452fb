//! Scalar cell values for materialized query results.
//!
//! Every cell of a [`crate::Table`] holds exactly one `Value`. The set of
//! kinds is closed and mirrors what the driver reports for a column: the
//! declared column type decides whether an INTEGER cell is an integer or a
//! boolean and whether a TEXT cell is plain text or a date.

use chrono::NaiveDate;
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::ToSql;

use crate::core::{FacadeError, Result};

/// Wire format for date columns. Dates are stored as TEXT in this format and
/// bound back the same way.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single cell value from a query result.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Date(NaiveDate),
}

/// Column kind derived from the declared type of a result column, used to
/// refine raw driver values into the closed `Value` set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ColumnKind {
    Other,
    Boolean,
    Date,
}

impl ColumnKind {
    /// Classifies a column by its declared SQL type, e.g. `BOOLEAN` or
    /// `DATE`. Expression columns have no declared type and classify as
    /// `Other`.
    pub(crate) fn from_decl(decl: Option<&str>) -> Self {
        match decl {
            Some(decl) => {
                let decl = decl.to_ascii_uppercase();
                if decl.contains("BOOL") {
                    ColumnKind::Boolean
                } else if decl.contains("DATE") {
                    ColumnKind::Date
                } else {
                    ColumnKind::Other
                }
            }
            None => ColumnKind::Other,
        }
    }
}

impl Value {
    /// Short name of the stored kind, used in type-mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Boolean(_) => "boolean",
            Value::Date(_) => "date",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Converts one raw driver cell into a `Value`, refined by the column
    /// kind. TEXT in a date column that does not parse as [`DATE_FORMAT`]
    /// stays text. BLOB cells are outside the scalar set and fail.
    pub(crate) fn from_driver(column: &str, kind: ColumnKind, raw: ValueRef<'_>) -> Result<Value> {
        let value = match raw {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) if kind == ColumnKind::Boolean => Value::Boolean(i != 0),
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(t) => {
                let text = String::from_utf8_lossy(t).into_owned();
                if kind == ColumnKind::Date {
                    match NaiveDate::parse_from_str(&text, DATE_FORMAT) {
                        Ok(date) => Value::Date(date),
                        Err(_) => Value::Text(text),
                    }
                } else {
                    Value::Text(text)
                }
            }
            ValueRef::Blob(_) => {
                return Err(FacadeError::Query(format!(
                    "unsupported BLOB value in column {}",
                    column
                )))
            }
        };
        Ok(value)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use rusqlite::types::Value as SqlValue;
        let out = match self {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Integer(i) => ToSqlOutput::Owned(SqlValue::Integer(*i)),
            Value::Real(f) => ToSqlOutput::Owned(SqlValue::Real(*f)),
            Value::Boolean(b) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*b))),
            Value::Date(d) => ToSqlOutput::Owned(SqlValue::Text(d.format(DATE_FORMAT).to_string())),
        };
        Ok(out)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
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

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_kind_classification() {
        assert_eq!(ColumnKind::from_decl(Some("BOOLEAN")), ColumnKind::Boolean);
        assert_eq!(ColumnKind::from_decl(Some("bool")), ColumnKind::Boolean);
        assert_eq!(ColumnKind::from_decl(Some("DATE")), ColumnKind::Date);
        assert_eq!(ColumnKind::from_decl(Some("INTEGER")), ColumnKind::Other);
        assert_eq!(ColumnKind::from_decl(Some("TEXT")), ColumnKind::Other);
        assert_eq!(ColumnKind::from_decl(None), ColumnKind::Other);
    }

    #[test]
    fn test_boolean_refinement() {
        let v = Value::from_driver("active", ColumnKind::Boolean, ValueRef::Integer(1)).unwrap();
        assert_eq!(v, Value::Boolean(true));
        let v = Value::from_driver("active", ColumnKind::Boolean, ValueRef::Integer(0)).unwrap();
        assert_eq!(v, Value::Boolean(false));
        // Without a boolean declaration the integer stays an integer
        let v = Value::from_driver("active", ColumnKind::Other, ValueRef::Integer(1)).unwrap();
        assert_eq!(v, Value::Integer(1));
    }

    #[test]
    fn test_date_refinement_and_fallback() {
        let v = Value::from_driver("born", ColumnKind::Date, ValueRef::Text(b"2021-06-15")).unwrap();
        assert_eq!(
            v,
            Value::Date(NaiveDate::from_ymd_opt(2021, 6, 15).unwrap())
        );
        // Unparsable text in a date column stays text
        let v = Value::from_driver("born", ColumnKind::Date, ValueRef::Text(b"soon")).unwrap();
        assert_eq!(v, Value::Text("soon".to_string()));
    }

    #[test]
    fn test_blob_rejected() {
        let result = Value::from_driver("data", ColumnKind::Other, ValueRef::Blob(b"\x01\x02"));
        match result.unwrap_err() {
            FacadeError::Query(msg) => assert!(msg.contains("BLOB")),
            _ => panic!("Expected Query error"),
        }
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::Integer(3).kind(), "integer");
        assert_eq!(Value::Text("x".into()).kind(), "text");
        assert!(Value::Null.is_null());
        assert!(!Value::Boolean(false).is_null());
    }
}
