// Core infrastructure modules
pub mod core;

// Feature-specific modules
pub mod db;
pub mod mapper;
pub mod row;
pub mod table;
pub mod value;

// Re-export the primary API surface at the crate root
pub use crate::core::{FacadeError, Result};
pub use db::Database;
pub use mapper::RowMapper;
pub use row::{ColumnIndex, Row};
pub use table::Table;
pub use value::Value;
