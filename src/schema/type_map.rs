//! Native type names to semantic types.
//!
//! A closed lookup over type families. Extending coverage means adding a
//! family here; validation and decoding never change.

use super::model::ColumnType;

/// Map an INFORMATION_SCHEMA `DATA_TYPE` (bare name, no display width) to a
/// semantic column type.
pub fn map_type_name(data_type: &str) -> ColumnType {
    match data_type.to_lowercase().as_str() {
        "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint" => ColumnType::Integer,
        "char" | "varchar" | "tinytext" | "text" | "mediumtext" | "longtext" => ColumnType::Text,
        "bool" | "boolean" => ColumnType::Boolean,
        _ => ColumnType::Unknown,
    }
}
