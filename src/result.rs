//! Owning wrapper around a native result.

use std::fmt;

use tracing::trace;

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::types::Column;

/// A materialized result handed over by the engine.
///
/// Owns the native result and destroys it on drop. Column descriptors borrow
/// the result set, so they cannot outlive it.
pub struct ResultSet<'e, E: Engine> {
    engine: &'e E,
    raw: E::Result,
}

impl<'e, E: Engine> ResultSet<'e, E> {
    /// Take ownership of a native result.
    pub fn new(engine: &'e E, raw: E::Result) -> Self {
        Self { engine, raw }
    }

    /// The engine that produced this result.
    pub fn engine(&self) -> &'e E {
        self.engine
    }

    /// Borrow the native result.
    pub fn raw(&self) -> &E::Result {
        &self.raw
    }

    /// Number of columns.
    pub fn column_count(&self) -> u64 {
        self.engine.column_count(&self.raw)
    }

    /// Column descriptor at `index`.
    pub fn column(&self, index: u64) -> Result<Column<'_, E>> {
        let count = self.column_count();
        if index >= count {
            return Err(Error::ColumnIndexOutOfBounds { index, count });
        }
        Ok(Column::new(self, index))
    }

    /// All column descriptors in declaration order.
    pub fn columns(&self) -> Vec<Column<'_, E>> {
        (0..self.column_count())
            .map(|index| Column::new(self, index))
            .collect()
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns().iter().map(Column::name).collect()
    }

    /// Find a column index by name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<u64> {
        let name_upper = name.to_uppercase();
        self.columns()
            .iter()
            .find(|c| c.name().to_uppercase() == name_upper)
            .map(Column::index)
    }
}

impl<E: Engine> Drop for ResultSet<'_, E> {
    fn drop(&mut self) {
        trace!("destroying result");
        self.engine.destroy_result(&mut self.raw);
    }
}

impl<E: Engine> fmt::Debug for ResultSet<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSet")
            .field("columns", &self.column_names())
            .finish()
    }
}
