//! Column and logical type metadata.

mod column;
mod logical_type;
mod name;
mod type_id;

pub use column::Column;
pub use logical_type::LogicalType;
pub use name::{render_name, render_name_with, RenderOptions};
pub use type_id::{raw_type_name, raw_type_symbol, TypeId, UNKNOWN_TYPE_NAME, UNKNOWN_TYPE_SYMBOL};
