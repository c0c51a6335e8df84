//! Introspected schema model: tables, columns, semantic types.

use serde_json::Value;
use std::collections::BTreeMap;

/// Engine-side simplification of native column types. Anything outside the
/// mapped families collapses to `Unknown`, which skips type checking and
/// decodes best-effort.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    Boolean,
    Unknown,
}

impl ColumnType {
    /// Zero value substituted for omitted non-nullable columns on insert.
    /// `Unknown` has no zero value and falls back to NULL.
    pub fn zero_value(self) -> Value {
        match self {
            ColumnType::Integer => Value::from(0),
            ColumnType::Text => Value::from(""),
            ColumnType::Boolean => Value::from(false),
            ColumnType::Unknown => Value::Null,
        }
    }
}

/// One column as reported by the database.
#[derive(Clone, Debug)]
pub struct Column {
    /// Position among the table's columns; indexes result rows.
    pub ordinal: usize,
    pub name: String,
    pub data_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
}

/// A table and its columns in database order.
#[derive(Clone, Debug)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    /// The column flagged as primary key by the database, if any.
    pub fn primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.primary_key)
    }

    /// Key column for single-record reads: the first column whose name
    /// contains "id". May differ from `primary_key()`; reads resolve through
    /// this, update and delete through the true primary key.
    pub fn key_column(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.contains("id"))
    }
}

/// Snapshot of the discovered schema, built once at startup and shared
/// read-only for the process lifetime.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    pub tables: BTreeMap<String, Table>,
}

impl Schema {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Table names in listing order.
    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(ordinal: usize, name: &str, primary_key: bool) -> Column {
        Column {
            ordinal,
            name: name.to_string(),
            data_type: ColumnType::Integer,
            nullable: false,
            primary_key,
        }
    }

    #[test]
    fn key_column_is_first_name_containing_id() {
        let table = Table {
            name: "orders".into(),
            columns: vec![column(0, "order_uid", false), column(1, "id", true)],
        };
        // "order_uid" contains "id" and comes first, so reads key on it even
        // though "id" is the primary key.
        assert_eq!(table.key_column().unwrap().name, "order_uid");
        assert_eq!(table.primary_key().unwrap().name, "id");
    }

    #[test]
    fn key_column_absent_when_no_name_matches() {
        let table = Table {
            name: "notes".into(),
            columns: vec![column(0, "body", false)],
        };
        assert!(table.key_column().is_none());
    }

    #[test]
    fn table_names_are_sorted() {
        let mut schema = Schema::default();
        for name in ["users", "items", "orders"] {
            schema.tables.insert(
                name.to_string(),
                Table {
                    name: name.to_string(),
                    columns: vec![],
                },
            );
        }
        assert_eq!(schema.table_names(), ["items", "orders", "users"]);
    }

    #[test]
    fn zero_values() {
        assert_eq!(ColumnType::Integer.zero_value(), Value::from(0));
        assert_eq!(ColumnType::Text.zero_value(), Value::from(""));
        assert_eq!(ColumnType::Boolean.zero_value(), Value::from(false));
        assert_eq!(ColumnType::Unknown.zero_value(), Value::Null);
    }
}
