//! Canonical type names for logical type handles.
//!
//! | Type    | Rendering                       |
//! |---------|---------------------------------|
//! | DECIMAL | `DECIMAL(width,scale)`          |
//! | LIST    | `<child>[]`                     |
//! | ARRAY   | `<child>[size]`                 |
//! | STRUCT  | `STRUCT(name type, ...)`        |
//! | MAP     | `MAP(key, value)`               |
//! | other   | the tag literal, e.g. `BIGINT`  |
//!
//! Every child handle and child name fetched while rendering is held by an
//! owning guard, so it is released even if a nested engine call panics.

use std::fmt::Write;

use crate::engine::{Engine, EngineString};

use super::logical_type::LogicalType;
use super::type_id::{TypeId, UNKNOWN_TYPE_NAME};

/// Options for rendering type names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Literal used for type codes outside the known set.
    pub unknown_literal: &'static str,
    /// Render a top-level INVALID type as `INVALID` instead of `None`.
    pub invalid_literal: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            unknown_literal: UNKNOWN_TYPE_NAME,
            invalid_literal: false,
        }
    }
}

impl RenderOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the literal used for unknown type codes.
    pub fn with_unknown_literal(mut self, literal: &'static str) -> Self {
        self.unknown_literal = literal;
        self
    }

    /// Render INVALID types as the `INVALID` literal.
    pub fn with_invalid_literal(mut self, enabled: bool) -> Self {
        self.invalid_literal = enabled;
        self
    }
}

/// Render the canonical name of a logical type.
///
/// The handle is borrowed; the caller keeps ownership. Returns `None` when
/// the type is INVALID.
pub fn render_name<E: Engine>(engine: &E, handle: E::LogicalType) -> Option<String> {
    render_name_with(engine, handle, &RenderOptions::default())
}

/// Render the canonical name of a logical type with explicit options.
pub fn render_name_with<E: Engine>(
    engine: &E,
    handle: E::LogicalType,
    options: &RenderOptions,
) -> Option<String> {
    if engine.type_id(handle) == TypeId::Invalid.code() && !options.invalid_literal {
        return None;
    }

    let mut out = String::new();
    Renderer { engine, options }.write_type(&mut out, handle);
    Some(out)
}

struct Renderer<'a, E: Engine> {
    engine: &'a E,
    options: &'a RenderOptions,
}

impl<'a, E: Engine> Renderer<'a, E> {
    fn write_type(&self, out: &mut String, handle: E::LogicalType) {
        let Some(type_id) = TypeId::from_raw(self.engine.type_id(handle)) else {
            out.push_str(self.options.unknown_literal);
            return;
        };

        match type_id {
            // Nested INVALID children contribute nothing.
            TypeId::Invalid => {
                if self.options.invalid_literal {
                    out.push_str(TypeId::Invalid.name());
                }
            }
            TypeId::Decimal => {
                let width = self.engine.decimal_width(handle);
                let scale = self.engine.decimal_scale(handle);
                let _ = write!(out, "DECIMAL({},{})", width, scale);
            }
            TypeId::List => {
                let child = self.child(self.engine.list_child_type(handle));
                self.write_child(out, &child);
                out.push_str("[]");
            }
            TypeId::Array => {
                let size = self.engine.array_size(handle);
                let child = self.child(self.engine.array_child_type(handle));
                self.write_child(out, &child);
                let _ = write!(out, "[{}]", size);
            }
            TypeId::Struct => self.write_struct(out, handle),
            TypeId::Map => {
                let key = self.child(self.engine.map_key_type(handle));
                let value = self.child(self.engine.map_value_type(handle));
                out.push_str("MAP(");
                self.write_child(out, &key);
                out.push_str(", ");
                self.write_child(out, &value);
                out.push(')');
            }
            flat => out.push_str(flat.name()),
        }
    }

    fn write_struct(&self, out: &mut String, handle: E::LogicalType) {
        let count = self.engine.struct_child_count(handle);

        out.push_str("STRUCT(");
        for i in 0..count {
            let name = EngineString::new(self.engine, self.engine.struct_child_name(handle, i));
            let child = self.child(self.engine.struct_child_type(handle, i));

            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&name.as_str());
            out.push(' ');
            self.write_child(out, &child);
        }
        out.push(')');
    }

    fn child(&self, handle: E::LogicalType) -> LogicalType<'a, E> {
        LogicalType::from_raw(self.engine, handle)
    }

    fn write_child(&self, out: &mut String, child: &LogicalType<'_, E>) {
        if let Some(handle) = child.handle {
            self.write_type(out, handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockEngine, TypeSpec};

    fn name_of(spec: TypeSpec) -> Option<String> {
        let engine = MockEngine::new();
        let ty = LogicalType::from_raw(&engine, engine.alloc_type(spec));
        let name = render_name(&engine, ty.as_raw().unwrap());
        drop(ty);
        assert_eq!(engine.live_handles(), 0);
        assert_eq!(engine.live_strings(), 0);
        name
    }

    #[test]
    fn test_flat_types_render_their_literal() {
        for &id in TypeId::ALL {
            let expected = match id {
                TypeId::Invalid => None,
                TypeId::Decimal => Some("DECIMAL(0,0)".to_string()),
                TypeId::List => Some("[]".to_string()),
                TypeId::Array => Some("[0]".to_string()),
                TypeId::Struct => Some("STRUCT()".to_string()),
                TypeId::Map => Some("MAP(, )".to_string()),
                other => Some(other.name().to_string()),
            };
            assert_eq!(name_of(TypeSpec::of(id)), expected, "{:?}", id);
        }
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(name_of(TypeSpec::Primitive(200)).unwrap(), "UNKNOWN");
        assert_eq!(name_of(TypeSpec::Primitive(-3)).unwrap(), "UNKNOWN");
    }

    #[test]
    fn test_decimal() {
        assert_eq!(name_of(TypeSpec::decimal(10, 2)).unwrap(), "DECIMAL(10,2)");
    }

    #[test]
    fn test_list() {
        let spec = TypeSpec::list(TypeSpec::of(TypeId::Integer));
        assert_eq!(name_of(spec).unwrap(), "INTEGER[]");
    }

    #[test]
    fn test_array() {
        let spec = TypeSpec::array(TypeSpec::of(TypeId::Double), 4);
        assert_eq!(name_of(spec).unwrap(), "DOUBLE[4]");
    }

    #[test]
    fn test_struct_preserves_field_order() {
        let spec = TypeSpec::structure([
            ("b", TypeSpec::of(TypeId::Varchar)),
            ("a", TypeSpec::of(TypeId::Integer)),
            ("a", TypeSpec::of(TypeId::Integer)),
        ]);
        assert_eq!(
            name_of(spec).unwrap(),
            "STRUCT(b VARCHAR, a INTEGER, a INTEGER)"
        );

        let spec = TypeSpec::structure([
            ("a", TypeSpec::of(TypeId::Integer)),
            ("b", TypeSpec::of(TypeId::Varchar)),
        ]);
        assert_eq!(name_of(spec).unwrap(), "STRUCT(a INTEGER, b VARCHAR)");
    }

    #[test]
    fn test_empty_struct() {
        let spec = TypeSpec::structure(Vec::<(&str, TypeSpec)>::new());
        assert_eq!(name_of(spec).unwrap(), "STRUCT()");
    }

    #[test]
    fn test_map() {
        let spec = TypeSpec::map(TypeSpec::of(TypeId::Varchar), TypeSpec::of(TypeId::BigInt));
        assert_eq!(name_of(spec).unwrap(), "MAP(VARCHAR, BIGINT)");
    }

    #[test]
    fn test_deeply_nested() {
        let spec = TypeSpec::map(
            TypeSpec::of(TypeId::Varchar),
            TypeSpec::list(TypeSpec::structure([
                ("ts", TypeSpec::of(TypeId::TimestampNs)),
                ("v", TypeSpec::array(TypeSpec::decimal(18, 3), 2)),
            ])),
        );
        assert_eq!(
            name_of(spec).unwrap(),
            "MAP(VARCHAR, STRUCT(ts TIMESTAMP_NS, v DECIMAL(18,3)[2])[])"
        );
    }

    #[test]
    fn test_invalid_top_level_is_absent() {
        assert_eq!(name_of(TypeSpec::of(TypeId::Invalid)), None);
    }

    #[test]
    fn test_nested_invalid_renders_empty() {
        let spec = TypeSpec::list(TypeSpec::of(TypeId::Invalid));
        assert_eq!(name_of(spec).unwrap(), "[]");
    }

    #[test]
    fn test_render_options() {
        let engine = MockEngine::new();
        let options = RenderOptions::new()
            .with_unknown_literal("?")
            .with_invalid_literal(true);

        let unknown = LogicalType::from_raw(&engine, engine.alloc_type(TypeSpec::Primitive(99)));
        let name = render_name_with(&engine, unknown.as_raw().unwrap(), &options);
        assert_eq!(name.unwrap(), "?");

        let invalid = LogicalType::from_raw(
            &engine,
            engine.alloc_type(TypeSpec::list(TypeSpec::of(TypeId::Invalid))),
        );
        let name = render_name_with(&engine, invalid.as_raw().unwrap(), &options);
        assert_eq!(name.unwrap(), "INVALID[]");
    }

    #[test]
    fn test_input_handle_is_not_released() {
        let engine = MockEngine::new();
        let ty = LogicalType::from_raw(
            &engine,
            engine.alloc_type(TypeSpec::list(TypeSpec::of(TypeId::Integer))),
        );

        let _ = render_name(&engine, ty.as_raw().unwrap());
        assert_eq!(engine.live_handles(), 1);
        assert_eq!(engine.handles_allocated(), 2);
    }
}
