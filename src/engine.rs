//! The native engine interface consumed by this layer.
//!
//! `Engine` mirrors the engine's C-level metadata API: every call is an
//! immediate, infallible lookup against in-memory structures. Handles and
//! strings returned by the engine are owned by the caller and must be handed
//! back through [`Engine::destroy_logical_type`] and [`Engine::free_string`].
//! Nothing in this crate calls those two directly; ownership always goes
//! through [`LogicalType`](crate::LogicalType) or [`EngineString`].

use std::borrow::Cow;
use std::fmt;

use tracing::trace;

/// Metadata API of the native database engine.
///
/// Column indices are zero-based and trusted; the engine is responsible for
/// bounds checking them. Accessors called on a handle of the wrong kind
/// (for example `decimal_width` on a VARCHAR) return whatever the engine
/// defines for that misuse.
pub trait Engine {
    /// Native materialized result.
    type Result;
    /// Native logical type handle. Copying the handle does not copy ownership.
    type LogicalType: Copy;
    /// Engine-allocated string.
    type String;

    /// Number of columns in a result.
    fn column_count(&self, result: &Self::Result) -> u64;

    /// Raw primitive type code of a column.
    fn column_type(&self, result: &Self::Result, col: u64) -> i32;

    /// Logical type of a column, `None` if the engine has none for it.
    fn column_logical_type(&self, result: &Self::Result, col: u64) -> Option<Self::LogicalType>;

    /// Declared column name. Always valid for a valid index.
    fn column_name<'r>(&self, result: &'r Self::Result, col: u64) -> Cow<'r, str>;

    /// Release a native result.
    fn destroy_result(&self, result: &mut Self::Result);

    /// Raw primitive type code of a logical type.
    fn type_id(&self, ty: Self::LogicalType) -> i32;

    fn decimal_width(&self, ty: Self::LogicalType) -> u8;

    fn decimal_scale(&self, ty: Self::LogicalType) -> u8;

    /// Child type of a LIST. For a MAP this is the `STRUCT(key, value)` entry type.
    fn list_child_type(&self, ty: Self::LogicalType) -> Self::LogicalType;

    fn array_child_type(&self, ty: Self::LogicalType) -> Self::LogicalType;

    fn array_size(&self, ty: Self::LogicalType) -> u64;

    fn struct_child_count(&self, ty: Self::LogicalType) -> u64;

    fn struct_child_name(&self, ty: Self::LogicalType, index: u64) -> Self::String;

    fn struct_child_type(&self, ty: Self::LogicalType, index: u64) -> Self::LogicalType;

    fn map_key_type(&self, ty: Self::LogicalType) -> Self::LogicalType;

    fn map_value_type(&self, ty: Self::LogicalType) -> Self::LogicalType;

    fn union_member_count(&self, ty: Self::LogicalType) -> u64;

    fn union_member_name(&self, ty: Self::LogicalType, index: u64) -> Self::String;

    fn union_member_type(&self, ty: Self::LogicalType, index: u64) -> Self::LogicalType;

    /// Release a logical type handle.
    fn destroy_logical_type(&self, ty: Self::LogicalType);

    /// View an engine string. Invalid UTF-8 is replaced lossily.
    fn string_as_str<'s>(&self, s: &'s Self::String) -> Cow<'s, str>;

    /// Release an engine string.
    fn free_string(&self, s: Self::String);
}

/// Owning guard for a string allocated by the engine.
///
/// The string is freed when the guard is dropped, including during unwinding.
pub struct EngineString<'e, E: Engine> {
    engine: &'e E,
    raw: Option<E::String>,
}

impl<'e, E: Engine> EngineString<'e, E> {
    /// Take ownership of an engine string.
    pub fn new(engine: &'e E, raw: E::String) -> Self {
        Self {
            engine,
            raw: Some(raw),
        }
    }

    /// Borrow the string contents.
    pub fn as_str(&self) -> Cow<'_, str> {
        match &self.raw {
            Some(raw) => self.engine.string_as_str(raw),
            None => Cow::Borrowed(""),
        }
    }
}

impl<E: Engine> fmt::Display for EngineString<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl<E: Engine> fmt::Debug for EngineString<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EngineString").field(&self.as_str()).finish()
    }
}

impl<E: Engine> Drop for EngineString<'_, E> {
    fn drop(&mut self) {
        if let Some(raw) = self.raw.take() {
            trace!("freeing engine string");
            self.engine.free_string(raw);
        }
    }
}
