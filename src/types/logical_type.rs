//! Owning wrapper around a native logical type handle.

use std::fmt;

use tracing::trace;

use crate::engine::{Engine, EngineString};
use crate::error::{Error, Result};

use super::name::render_name;
use super::type_id::{raw_type_symbol, TypeId};

/// A logical type handle owned by this wrapper.
///
/// The handle is released exactly once, when the wrapper is dropped. A null
/// wrapper owns nothing and reports `INVALID`.
///
/// Accessors that only make sense for one kind of type (`width`, `scale`,
/// `child_count`, ...) are passed straight to the engine; what they return for
/// other kinds is up to the engine. `child_type`, `size`, `key_type` and
/// `value_type` check the tag first and return `None` on mismatch.
pub struct LogicalType<'e, E: Engine> {
    engine: &'e E,
    pub(crate) handle: Option<E::LogicalType>,
}

impl<'e, E: Engine> LogicalType<'e, E> {
    /// Take ownership of a native handle.
    pub fn from_raw(engine: &'e E, handle: E::LogicalType) -> Self {
        trace!("acquired logical type handle");
        Self {
            engine,
            handle: Some(handle),
        }
    }

    /// A wrapper that owns no handle.
    pub fn null(engine: &'e E) -> Self {
        Self {
            engine,
            handle: None,
        }
    }

    /// Whether this wrapper owns no handle.
    pub fn is_null(&self) -> bool {
        self.handle.is_none()
    }

    /// Borrow the native handle without giving up ownership.
    pub fn as_raw(&self) -> Option<E::LogicalType> {
        self.handle
    }

    /// Give up ownership of the native handle. The caller must release it.
    pub fn into_raw(mut self) -> Option<E::LogicalType> {
        self.handle.take()
    }

    /// Raw primitive type code.
    pub fn raw_type_id(&self) -> i32 {
        match self.handle {
            Some(handle) => self.engine.type_id(handle),
            None => TypeId::Invalid.code(),
        }
    }

    /// Primitive type tag, `None` for codes this crate does not know.
    pub fn type_id(&self) -> Option<TypeId> {
        TypeId::from_raw(self.raw_type_id())
    }

    /// Lowercase tag symbol, `unknown` for unknown codes.
    pub fn type_symbol(&self) -> &'static str {
        raw_type_symbol(self.raw_type_id())
    }

    /// Decimal width. Only meaningful for DECIMAL.
    pub fn width(&self) -> u8 {
        self.handle.map_or(0, |handle| self.engine.decimal_width(handle))
    }

    /// Decimal scale. Only meaningful for DECIMAL.
    pub fn scale(&self) -> u8 {
        self.handle.map_or(0, |handle| self.engine.decimal_scale(handle))
    }

    /// Decimal `(width, scale)`, rejecting any other kind of type.
    pub fn decimal(&self) -> Result<(u8, u8)> {
        self.expect(TypeId::Decimal)?;
        Ok((self.width(), self.scale()))
    }

    /// Child type of a LIST, or the `STRUCT(key, value)` entry type of a MAP.
    pub fn child_type(&self) -> Option<LogicalType<'e, E>> {
        let handle = self.handle?;
        match self.type_id()? {
            TypeId::List | TypeId::Map => Some(self.wrap(self.engine.list_child_type(handle))),
            _ => None,
        }
    }

    /// Element type of an ARRAY.
    pub fn array_child_type(&self) -> Option<LogicalType<'e, E>> {
        let handle = self.handle?;
        match self.type_id()? {
            TypeId::Array => Some(self.wrap(self.engine.array_child_type(handle))),
            _ => None,
        }
    }

    /// Fixed size of an ARRAY.
    pub fn size(&self) -> Option<u64> {
        let handle = self.handle?;
        match self.type_id()? {
            TypeId::Array => Some(self.engine.array_size(handle)),
            _ => None,
        }
    }

    /// Key type of a MAP.
    pub fn key_type(&self) -> Option<LogicalType<'e, E>> {
        let handle = self.handle?;
        match self.type_id()? {
            TypeId::Map => Some(self.wrap(self.engine.map_key_type(handle))),
            _ => None,
        }
    }

    /// Value type of a MAP.
    pub fn value_type(&self) -> Option<LogicalType<'e, E>> {
        let handle = self.handle?;
        match self.type_id()? {
            TypeId::Map => Some(self.wrap(self.engine.map_value_type(handle))),
            _ => None,
        }
    }

    /// Number of STRUCT children.
    pub fn child_count(&self) -> u64 {
        self.handle
            .map_or(0, |handle| self.engine.struct_child_count(handle))
    }

    /// Name of the STRUCT child at `index`.
    pub fn child_name_at(&self, index: u64) -> Result<String> {
        let handle = self.checked(index, self.child_count())?;
        let name = EngineString::new(self.engine, self.engine.struct_child_name(handle, index));
        Ok(name.as_str().into_owned())
    }

    /// Type of the STRUCT child at `index`.
    pub fn child_type_at(&self, index: u64) -> Result<LogicalType<'e, E>> {
        let handle = self.checked(index, self.child_count())?;
        Ok(self.wrap(self.engine.struct_child_type(handle, index)))
    }

    /// STRUCT child names in declaration order.
    pub fn child_names(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.child_count()).filter_map(move |i| self.child_name_at(i).ok())
    }

    /// STRUCT child types in declaration order.
    pub fn child_types(&self) -> impl Iterator<Item = LogicalType<'e, E>> + '_ {
        (0..self.child_count()).filter_map(move |i| self.child_type_at(i).ok())
    }

    /// Number of UNION members.
    pub fn member_count(&self) -> u64 {
        self.handle
            .map_or(0, |handle| self.engine.union_member_count(handle))
    }

    /// Name of the UNION member at `index`.
    pub fn member_name_at(&self, index: u64) -> Result<String> {
        let handle = self.checked(index, self.member_count())?;
        let name = EngineString::new(self.engine, self.engine.union_member_name(handle, index));
        Ok(name.as_str().into_owned())
    }

    /// Type of the UNION member at `index`.
    pub fn member_type_at(&self, index: u64) -> Result<LogicalType<'e, E>> {
        let handle = self.checked(index, self.member_count())?;
        Ok(self.wrap(self.engine.union_member_type(handle, index)))
    }

    /// UNION member names in declaration order.
    pub fn member_names(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.member_count()).filter_map(move |i| self.member_name_at(i).ok())
    }

    /// UNION member types in declaration order.
    pub fn member_types(&self) -> impl Iterator<Item = LogicalType<'e, E>> + '_ {
        (0..self.member_count()).filter_map(move |i| self.member_type_at(i).ok())
    }

    /// Canonical type name, e.g. `STRUCT(a INTEGER, b VARCHAR[])`.
    ///
    /// `None` for a null wrapper or an INVALID type.
    pub fn name(&self) -> Option<String> {
        self.handle.and_then(|handle| render_name(self.engine, handle))
    }

    /// Bytes of host memory held by the wrapper itself.
    pub fn memsize(&self) -> usize {
        std::mem::size_of::<Self>()
    }

    fn wrap(&self, handle: E::LogicalType) -> LogicalType<'e, E> {
        LogicalType::from_raw(self.engine, handle)
    }

    fn expect(&self, expected: TypeId) -> Result<()> {
        match self.type_id() {
            Some(actual) if actual == expected => Ok(()),
            _ => Err(Error::TypeMismatch {
                expected,
                actual: self.type_symbol().to_uppercase(),
            }),
        }
    }

    fn checked(&self, index: u64, count: u64) -> Result<E::LogicalType> {
        match self.handle {
            Some(handle) if index < count => Ok(handle),
            _ => Err(Error::ChildIndexOutOfBounds { index, count }),
        }
    }
}

impl<E: Engine> Drop for LogicalType<'_, E> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            trace!("releasing logical type handle");
            self.engine.destroy_logical_type(handle);
        }
    }
}

impl<E: Engine> fmt::Display for LogicalType<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().as_deref().unwrap_or(""))
    }
}

impl<E: Engine> fmt::Debug for LogicalType<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogicalType")
            .field("type", &self.type_symbol())
            .field("name", &self.name())
            .finish()
    }
}
