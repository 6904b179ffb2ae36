//! Column and logical type introspection for an embedded analytical database.
//!
//! This crate sits between the database engine's native metadata API and a
//! host scripting environment. Given a result produced by the engine it
//! exposes, per column, the primitive type tag, the full (possibly nested)
//! logical type, a canonical type name and the column name.
//!
//! Native logical type handles are never left unowned: each one is wrapped in
//! a [`LogicalType`] that releases it on drop, including handles fetched
//! transiently while rendering a nested type name.
//!
//! # Example
//!
//! ```
//! use duckdb_coltype::mock::{MockEngine, MockResult, TypeSpec};
//! use duckdb_coltype::{ResultSet, TypeId};
//!
//! let engine = MockEngine::new();
//! let result = ResultSet::new(
//!     &engine,
//!     MockResult::new()
//!         .with_column("id", TypeSpec::of(TypeId::Integer))
//!         .with_column(
//!             "point",
//!             TypeSpec::structure([
//!                 ("x", TypeSpec::of(TypeId::Double)),
//!                 ("y", TypeSpec::of(TypeId::Double)),
//!             ]),
//!         ),
//! );
//!
//! for column in result.columns() {
//!     println!("{} {}", column.name(), column.logical_type().unwrap_or_default());
//! }
//!
//! let point = result.column(1).unwrap();
//! assert_eq!(point.logical_type().unwrap(), "STRUCT(x DOUBLE, y DOUBLE)");
//! assert_eq!(engine.live_handles(), 0);
//! ```

pub mod engine;
pub mod error;
pub mod host;
pub mod mock;
pub mod result;
pub mod types;

// Re-export main types
pub use engine::{Engine, EngineString};
pub use error::{Error, Result};
pub use result::ResultSet;
pub use types::{
    raw_type_name, render_name, render_name_with, Column, LogicalType, RenderOptions, TypeId,
};
