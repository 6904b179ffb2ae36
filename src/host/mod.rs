//! Host environment registration and method dispatch.
//!
//! The host sees one module, `DuckDB`, with two classes: `DuckDB::Column` and
//! `DuckDB::LogicalType`, plus a constant table mapping type names to their
//! engine codes. The table is built once per process by [`init`] and never
//! changes afterwards.
//!
//! # Example
//!
//! ```
//! use duckdb_coltype::host::{self, HostValue};
//! use duckdb_coltype::mock::{MockEngine, MockResult, TypeSpec};
//! use duckdb_coltype::{ResultSet, TypeId};
//!
//! let engine = MockEngine::new();
//! let result = ResultSet::new(
//!     &engine,
//!     MockResult::new().with_column("price", TypeSpec::decimal(18, 3)),
//! );
//! let column = result.column(0).unwrap();
//!
//! let registry = host::init();
//! let name = registry.call_column(&column, "logical_type", &[]).unwrap();
//! assert_eq!(name.as_str(), Some("DECIMAL(18,3)"));
//! assert_eq!(registry.constant("DECIMAL"), Some(TypeId::Decimal.code()));
//! ```

mod class;
mod value;

use std::sync::OnceLock;

use tracing::{debug, trace};

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::types::{raw_type_symbol, Column, LogicalType, TypeId, UNKNOWN_TYPE_SYMBOL};

pub use class::{ClassDef, MethodDef, Visibility, COLUMN_CLASS, LOGICAL_TYPE_CLASS};
pub use value::HostValue;

/// Name of the host module.
pub const MODULE_NAME: &str = "DuckDB";

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Register the host module. Later calls return the same registry.
pub fn init() -> &'static Registry {
    REGISTRY.get_or_init(|| {
        let registry = Registry::new();
        debug!(
            module = MODULE_NAME,
            classes = registry.classes.len(),
            constants = registry.constants.len(),
            "registered host module"
        );
        registry
    })
}

/// The registry, if [`init`] has run.
pub fn registry() -> Option<&'static Registry> {
    REGISTRY.get()
}

/// Registered classes and constants of the host module.
#[derive(Debug)]
pub struct Registry {
    classes: Vec<&'static ClassDef>,
    constants: Vec<(&'static str, i32)>,
}

impl Registry {
    fn new() -> Self {
        Self {
            classes: vec![&COLUMN_CLASS, &LOGICAL_TYPE_CLASS],
            constants: TypeId::ALL.iter().map(|id| (id.name(), id.code())).collect(),
        }
    }

    pub fn module_name(&self) -> &'static str {
        MODULE_NAME
    }

    pub fn classes(&self) -> &[&'static ClassDef] {
        &self.classes
    }

    /// Look up a class by short (`Column`) or qualified (`DuckDB::Column`) name.
    pub fn class(&self, name: &str) -> Option<&'static ClassDef> {
        self.classes
            .iter()
            .copied()
            .find(|c| c.name == name || c.qualified_name == name)
    }

    pub fn constants(&self) -> &[(&'static str, i32)] {
        &self.constants
    }

    /// Engine code for a type name, e.g. `INTEGER`.
    pub fn constant(&self, name: &str) -> Option<i32> {
        self.constants
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, code)| *code)
    }

    /// Host symbol for an integer type code, `unknown` outside the known set.
    pub fn type_to_sym(&self, code: i64) -> &'static str {
        i32::try_from(code).map_or(UNKNOWN_TYPE_SYMBOL, raw_type_symbol)
    }

    /// Call a public method on a `DuckDB::Column`.
    pub fn call_column<'r, E: Engine>(
        &self,
        column: &Column<'r, E>,
        method: &str,
        args: &[HostValue<'r, E>],
    ) -> Result<HostValue<'r, E>> {
        dispatch_column(column, method, args, false)
    }

    /// Call any method, including private ones, on a `DuckDB::Column`.
    pub fn send_column<'r, E: Engine>(
        &self,
        column: &Column<'r, E>,
        method: &str,
        args: &[HostValue<'r, E>],
    ) -> Result<HostValue<'r, E>> {
        dispatch_column(column, method, args, true)
    }

    /// Call a public method on a `DuckDB::LogicalType`.
    pub fn call_logical_type<'e, E: Engine>(
        &self,
        ty: &LogicalType<'e, E>,
        method: &str,
        args: &[HostValue<'e, E>],
    ) -> Result<HostValue<'e, E>> {
        dispatch_logical_type(ty, method, args, false)
    }

    /// Call any method, including private ones, on a `DuckDB::LogicalType`.
    pub fn send_logical_type<'e, E: Engine>(
        &self,
        ty: &LogicalType<'e, E>,
        method: &str,
        args: &[HostValue<'e, E>],
    ) -> Result<HostValue<'e, E>> {
        dispatch_logical_type(ty, method, args, true)
    }
}

fn resolve(
    class: &'static ClassDef,
    method: &str,
    given: usize,
    allow_private: bool,
) -> Result<&'static MethodDef> {
    let def = class
        .method(method)
        .ok_or_else(|| Error::no_method(class.qualified_name, method))?;

    if def.visibility == Visibility::Private && !allow_private {
        return Err(Error::PrivateMethod {
            class: class.qualified_name,
            method: method.to_string(),
        });
    }
    if def.arity != given {
        return Err(Error::ArgumentCount {
            method: method.to_string(),
            expected: def.arity,
            given,
        });
    }

    trace!(class = class.qualified_name, method, "dispatch");
    Ok(def)
}

fn integer<'e, E: Engine>(n: u64) -> HostValue<'e, E> {
    HostValue::Integer(i64::try_from(n).unwrap_or(i64::MAX))
}

fn dispatch_column<'r, E: Engine>(
    column: &Column<'r, E>,
    method: &str,
    args: &[HostValue<'r, E>],
    allow_private: bool,
) -> Result<HostValue<'r, E>> {
    let def = resolve(&COLUMN_CLASS, method, args.len(), allow_private)?;

    let value = match def.name {
        "_type" => HostValue::Integer(column.primitive_type().into()),
        "type" => HostValue::Symbol(column.type_symbol()),
        "_logical_type" | "logical_type" => column.logical_type().into(),
        "name" => HostValue::String(column.name()),
        _ => return Err(Error::no_method(COLUMN_CLASS.qualified_name, method)),
    };
    Ok(value)
}

fn dispatch_logical_type<'e, E: Engine>(
    ty: &LogicalType<'e, E>,
    method: &str,
    args: &[HostValue<'e, E>],
    allow_private: bool,
) -> Result<HostValue<'e, E>> {
    let def = resolve(&LOGICAL_TYPE_CLASS, method, args.len(), allow_private)?;

    let value = match def.name {
        "_type" => HostValue::Integer(ty.raw_type_id().into()),
        "type" => HostValue::Symbol(ty.type_symbol()),
        "width" => HostValue::Integer(ty.width().into()),
        "scale" => HostValue::Integer(ty.scale().into()),
        "child_type" => ty.child_type().into(),
        "size" => ty.size().map_or(HostValue::Nil, integer),
        "key_type" => ty.key_type().into(),
        "value_type" => ty.value_type().into(),
        "child_count" => integer(ty.child_count()),
        "child_name_at" => HostValue::String(ty.child_name_at(args[0].to_index()?)?),
        "child_type_at" => HostValue::LogicalType(ty.child_type_at(args[0].to_index()?)?),
        "each_child_name" => HostValue::Array(ty.child_names().map(HostValue::String).collect()),
        "each_child_type" => {
            HostValue::Array(ty.child_types().map(HostValue::LogicalType).collect())
        }
        "member_count" => integer(ty.member_count()),
        "member_name_at" => HostValue::String(ty.member_name_at(args[0].to_index()?)?),
        "member_type_at" => HostValue::LogicalType(ty.member_type_at(args[0].to_index()?)?),
        "each_member_name" => {
            HostValue::Array(ty.member_names().map(HostValue::String).collect())
        }
        "each_member_type" => {
            HostValue::Array(ty.member_types().map(HostValue::LogicalType).collect())
        }
        "to_s" => HostValue::String(ty.to_string()),
        _ => return Err(Error::no_method(LOGICAL_TYPE_CLASS.qualified_name, method)),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockEngine, MockResult, TypeSpec};
    use crate::result::ResultSet;

    fn make_test_result() -> MockResult {
        MockResult::new()
            .with_column("id", TypeSpec::of(TypeId::Integer))
            .with_column("amount", TypeSpec::decimal(18, 3))
            .with_opaque_column("raw", 77)
    }

    #[test]
    fn test_init_is_idempotent() {
        let first = init();
        let second = init();
        assert!(std::ptr::eq(first, second));
        assert!(std::ptr::eq(registry().unwrap(), first));
        assert_eq!(first.module_name(), "DuckDB");
        assert_eq!(first.classes().len(), 2);
    }

    #[test]
    fn test_class_lookup() {
        let registry = init();
        assert_eq!(registry.class("Column").unwrap().data_type, "DuckDB/Column");
        assert_eq!(
            registry.class("DuckDB::LogicalType").unwrap().data_type,
            "DuckDB/LogicalType"
        );
        assert!(registry.class("Result").is_none());
    }

    #[test]
    fn test_constants() {
        let registry = init();
        assert_eq!(registry.constant("INTEGER"), Some(4));
        assert_eq!(registry.constant("SQLNULL"), Some(36));
        assert_eq!(registry.constant("UNKNOWN"), None);
        assert_eq!(registry.constants().len(), TypeId::ALL.len());
        assert_eq!(registry.type_to_sym(19), "decimal");
        assert_eq!(registry.type_to_sym(1 << 40), "unknown");
    }

    #[test]
    fn test_column_dispatch() {
        let engine = MockEngine::new();
        let result = ResultSet::new(&engine, make_test_result());
        let registry = init();
        let column = result.column(1).unwrap();

        let name = registry.call_column(&column, "name", &[]).unwrap();
        assert_eq!(name.as_str(), Some("amount"));
        let ty = registry.call_column(&column, "type", &[]).unwrap();
        assert_eq!(ty.as_str(), Some("decimal"));
        let code = registry.send_column(&column, "_type", &[]).unwrap();
        assert_eq!(code.as_integer(), Some(19));
        let logical = registry.call_column(&column, "logical_type", &[]).unwrap();
        assert_eq!(logical.as_str(), Some("DECIMAL(18,3)"));
        assert_eq!(engine.live_handles(), 0);
    }

    #[test]
    fn test_column_dispatch_unknown_type() {
        let engine = MockEngine::new();
        let result = ResultSet::new(&engine, make_test_result());
        let registry = init();
        let column = result.column(2).unwrap();

        let ty = registry.call_column(&column, "type", &[]).unwrap();
        assert_eq!(ty.as_str(), Some("unknown"));
        assert!(registry.call_column(&column, "logical_type", &[]).unwrap().is_nil());
    }

    #[test]
    fn test_dispatch_errors() {
        let engine = MockEngine::new();
        let result = ResultSet::new(&engine, make_test_result());
        let registry = init();
        let column = result.column(0).unwrap();

        assert_eq!(
            registry.call_column(&column, "_type", &[]).unwrap_err(),
            Error::PrivateMethod {
                class: "DuckDB::Column",
                method: "_type".to_string(),
            }
        );
        assert_eq!(
            registry.call_column(&column, "width", &[]).unwrap_err(),
            Error::no_method("DuckDB::Column", "width")
        );
        assert_eq!(
            registry
                .call_column(&column, "name", &[HostValue::Nil])
                .unwrap_err(),
            Error::ArgumentCount {
                method: "name".to_string(),
                expected: 0,
                given: 1,
            }
        );
    }

    #[test]
    fn test_logical_type_dispatch() {
        let engine = MockEngine::new();
        let registry = init();
        let ty = LogicalType::from_raw(
            &engine,
            engine.alloc_type(TypeSpec::structure([
                ("a", TypeSpec::of(TypeId::Integer)),
                ("b", TypeSpec::list(TypeSpec::of(TypeId::Varchar))),
            ])),
        );

        let count = registry.call_logical_type(&ty, "child_count", &[]).unwrap();
        assert_eq!(count.as_integer(), Some(2));
        let name = registry
            .call_logical_type(&ty, "child_name_at", &[HostValue::Integer(1)])
            .unwrap();
        assert_eq!(name.as_str(), Some("b"));

        let child = registry
            .call_logical_type(&ty, "child_type_at", &[HostValue::Integer(1)])
            .unwrap()
            .into_logical_type()
            .unwrap();
        let inner = registry.call_logical_type(&child, "child_type", &[]).unwrap();
        assert_eq!(format!("{:?}", inner), "#<DuckDB::LogicalType VARCHAR>");
        drop(inner);
        drop(child);

        let names = registry.call_logical_type(&ty, "each_child_name", &[]).unwrap();
        let names: Vec<_> = names.as_array().unwrap().iter().filter_map(|v| v.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        let s = registry.call_logical_type(&ty, "to_s", &[]).unwrap();
        assert_eq!(s.as_str(), Some("STRUCT(a INTEGER, b VARCHAR[])"));
        assert!(registry.call_logical_type(&ty, "child_type", &[]).unwrap().is_nil());
        assert!(registry.call_logical_type(&ty, "size", &[]).unwrap().is_nil());

        assert_eq!(
            registry
                .call_logical_type(&ty, "child_name_at", &[HostValue::Integer(5)])
                .unwrap_err(),
            Error::ChildIndexOutOfBounds { index: 5, count: 2 }
        );
        assert!(matches!(
            registry.call_logical_type(&ty, "child_name_at", &[HostValue::Symbol("a")]),
            Err(Error::TypeConversion { .. })
        ));

        drop(ty);
        assert_eq!(engine.live_handles(), 0);
        assert_eq!(engine.live_strings(), 0);
    }

    #[test]
    fn test_logical_type_dispatch_decimal() {
        let engine = MockEngine::new();
        let registry = init();
        let ty = LogicalType::from_raw(&engine, engine.alloc_type(TypeSpec::decimal(18, 3)));

        let width = registry.call_logical_type(&ty, "width", &[]).unwrap();
        let scale = registry.call_logical_type(&ty, "scale", &[]).unwrap();
        assert_eq!((width.as_integer(), scale.as_integer()), (Some(18), Some(3)));
        let code = registry.send_logical_type(&ty, "_type", &[]).unwrap();
        assert_eq!(code.as_integer(), Some(19));
        let sym = registry.call_logical_type(&ty, "type", &[]).unwrap();
        assert_eq!(sym.as_str(), Some("decimal"));
    }
}
