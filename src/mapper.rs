//! Process-wide row-to-object mapper registry.
//!
//! Callers register a converter per target type; [`crate::Row::map_to`] and
//! [`crate::Table::map_all`] then materialize domain objects from query
//! results. The registry is keyed by [`TypeId`], holds at most one converter
//! per type (re-registering overwrites) and lives for the process lifetime.
//!
//! The map is guarded by an `RwLock` so concurrent registration and lookup
//! from multiple threads is well-defined; the facade itself stays
//! single-threaded and blocking.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::row::Row;
use crate::table::Table;

/// Builds one instance of `T` from one row.
///
/// `build` is the single required operation; `build_all` applies it to every
/// row of a table in row order. Any `Fn(&Row) -> T` closure is a `RowMapper`
/// through the blanket impl.
pub trait RowMapper<T>: Send + Sync {
    fn build(&self, row: &Row<'_>) -> T;

    fn build_all(&self, table: &Table<'_>) -> Vec<T> {
        table.rows().map(|row| self.build(&row)).collect()
    }
}

impl<T, F> RowMapper<T> for F
where
    F: for<'a> Fn(&Row<'a>) -> T + Send + Sync,
{
    fn build(&self, row: &Row<'_>) -> T {
        self(row)
    }
}

type ErasedConverter = Arc<dyn for<'a> Fn(&Row<'a>) -> Box<dyn Any> + Send + Sync>;

static CONVERTERS: Lazy<RwLock<HashMap<TypeId, ErasedConverter>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Installs the converter for `T`, overwriting any previous one.
pub fn register<T: Any>(mapper: impl RowMapper<T> + 'static) {
    debug!(type_name = std::any::type_name::<T>(), "registering row mapper");
    let converter: ErasedConverter =
        Arc::new(move |row| Box::new(mapper.build(row)) as Box<dyn Any>);
    converters_mut().insert(TypeId::of::<T>(), converter);
}

/// Removes the converter for `T`. No-op if none is registered.
pub fn unregister<T: Any>() {
    debug!(type_name = std::any::type_name::<T>(), "unregistering row mapper");
    converters_mut().remove(&TypeId::of::<T>());
}

/// True iff a converter is currently registered for `T`.
pub fn is_registered<T: Any>() -> bool {
    find(TypeId::of::<T>()).is_some()
}

/// Builds a `T` from `row` with the registered converter, or `None` when no
/// converter is registered for `T`.
pub fn map_row<T: Any>(row: &Row<'_>) -> Option<T> {
    let converter = find(TypeId::of::<T>())?;
    converter(row).downcast::<T>().ok().map(|boxed| *boxed)
}

/// Applies the registered converter for `T` to every row of `table`, in row
/// order. Returns an empty vec when no converter is registered; a missing
/// converter is a soft miss, never an error.
pub fn map_table<T: Any>(table: &Table<'_>) -> Vec<T> {
    match find(TypeId::of::<T>()) {
        Some(converter) => table
            .rows()
            .filter_map(|row| converter(&row).downcast::<T>().ok().map(|boxed| *boxed))
            .collect(),
        None => Vec::new(),
    }
}

fn find(type_id: TypeId) -> Option<ErasedConverter> {
    let guard = match CONVERTERS.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    guard.get(&type_id).cloned()
}

fn converters_mut() -> std::sync::RwLockWriteGuard<'static, HashMap<TypeId, ErasedConverter>> {
    // A panic while holding the lock poisons it; the registry data is still
    // consistent, so keep serving it.
    match CONVERTERS.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
