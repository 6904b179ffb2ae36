//! Values passed to and returned from host method calls.

use std::fmt;

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::types::LogicalType;

/// A value crossing the host boundary.
pub enum HostValue<'e, E: Engine> {
    Nil,
    Integer(i64),
    String(String),
    Symbol(&'static str),
    Array(Vec<HostValue<'e, E>>),
    /// A `DuckDB::LogicalType` object; the host owns the wrapped handle.
    LogicalType(LogicalType<'e, E>),
}

impl<'e, E: Engine> HostValue<'e, E> {
    pub fn is_nil(&self) -> bool {
        matches!(self, HostValue::Nil)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            HostValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::String(s) => Some(s.as_str()),
            HostValue::Symbol(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[HostValue<'e, E>]> {
        match self {
            HostValue::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn into_logical_type(self) -> Option<LogicalType<'e, E>> {
        match self {
            HostValue::LogicalType(ty) => Some(ty),
            _ => None,
        }
    }

    /// Host class name of the value.
    pub fn class_name(&self) -> &'static str {
        match self {
            HostValue::Nil => "NilClass",
            HostValue::Integer(_) => "Integer",
            HostValue::String(_) => "String",
            HostValue::Symbol(_) => "Symbol",
            HostValue::Array(_) => "Array",
            HostValue::LogicalType(_) => "DuckDB::LogicalType",
        }
    }

    /// Convert to a non-negative index argument.
    pub(crate) fn to_index(&self) -> Result<u64> {
        match self {
            HostValue::Integer(i) => u64::try_from(*i)
                .map_err(|_| Error::type_conversion(format!("negative index {}", i))),
            other => Err(Error::type_conversion(format!(
                "no implicit conversion of {} into Integer",
                other.class_name()
            ))),
        }
    }
}

impl<E: Engine> From<Option<String>> for HostValue<'_, E> {
    fn from(value: Option<String>) -> Self {
        value.map_or(HostValue::Nil, HostValue::String)
    }
}

impl<'e, E: Engine> From<Option<LogicalType<'e, E>>> for HostValue<'e, E> {
    fn from(value: Option<LogicalType<'e, E>>) -> Self {
        value.map_or(HostValue::Nil, HostValue::LogicalType)
    }
}

impl<E: Engine> fmt::Debug for HostValue<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Nil => f.write_str("nil"),
            HostValue::Integer(i) => write!(f, "{}", i),
            HostValue::String(s) => write!(f, "{:?}", s),
            HostValue::Symbol(s) => write!(f, ":{}", s),
            HostValue::Array(items) => f.debug_list().entries(items).finish(),
            HostValue::LogicalType(ty) => write!(f, "#<DuckDB::LogicalType {}>", ty),
        }
    }
}
