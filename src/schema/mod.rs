//! Runtime-discovered schema: column model, type mapping, introspection.

mod introspect;
mod model;
mod type_map;

pub use introspect::discover;
pub use model::{Column, ColumnType, Schema, Table};
pub use type_map::map_type_name;
