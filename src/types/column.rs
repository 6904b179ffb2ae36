//! Per-column metadata accessor.
//!
//! A `Column` is just a result reference and an index. Every accessor goes
//! back to the engine; nothing is cached.

use std::fmt;

use crate::engine::Engine;
use crate::result::ResultSet;

use super::logical_type::LogicalType;
use super::type_id::{raw_type_symbol, TypeId};

/// A column of a result set.
///
/// Borrows the result set, which must outlive every column built from it.
pub struct Column<'r, E: Engine> {
    result: &'r ResultSet<'r, E>,
    index: u64,
}

impl<'r, E: Engine> Column<'r, E> {
    /// Bind a column descriptor to a result and index.
    ///
    /// The index is not checked; see [`ResultSet::column`] for a checked
    /// constructor.
    pub fn new(result: &'r ResultSet<'r, E>, index: u64) -> Self {
        Self { result, index }
    }

    /// Zero-based column index.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Raw primitive type code.
    pub fn primitive_type(&self) -> i32 {
        self.result
            .engine()
            .column_type(self.result.raw(), self.index)
    }

    /// Primitive type tag, `None` for codes this crate does not know.
    pub fn type_id(&self) -> Option<TypeId> {
        TypeId::from_raw(self.primitive_type())
    }

    /// Lowercase tag symbol, `unknown` for unknown codes.
    pub fn type_symbol(&self) -> &'static str {
        raw_type_symbol(self.primitive_type())
    }

    /// Canonical logical type name, `None` if the engine has no logical type
    /// for this column.
    pub fn logical_type(&self) -> Option<String> {
        self.logical_type_handle()?.name()
    }

    /// Owning wrapper around the column's logical type.
    pub fn logical_type_handle(&self) -> Option<LogicalType<'r, E>> {
        let engine = self.result.engine();
        engine
            .column_logical_type(self.result.raw(), self.index)
            .map(|handle| LogicalType::from_raw(engine, handle))
    }

    /// Declared column name.
    pub fn name(&self) -> String {
        self.result
            .engine()
            .column_name(self.result.raw(), self.index)
            .into_owned()
    }

    /// Bytes of host memory held by the descriptor itself.
    pub fn memsize(&self) -> usize {
        std::mem::size_of::<Self>()
    }
}

impl<E: Engine> Clone for Column<'_, E> {
    fn clone(&self) -> Self {
        Self {
            result: self.result,
            index: self.index,
        }
    }
}

impl<E: Engine> fmt::Debug for Column<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("index", &self.index)
            .field("name", &self.name())
            .field("type", &self.type_symbol())
            .finish()
    }
}
