//! Builds SELECT, INSERT, UPDATE, DELETE for a discovered table.
//!
//! Pure functions: callers execute the result. Identifiers come only from the
//! introspected schema; request values bind as parameters, except UPDATE SET
//! values which render as literals from already-validated fields.

use crate::error::AppError;
use crate::schema::Table;
use crate::sql::params::BindValue;
use serde_json::{Map, Value};

/// Quote identifier for MySQL (safe: only from the introspected schema).
fn quoted(s: &str) -> String {
    format!("`{}`", s.replace('`', "``"))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

/// Column list in ordinal order, which also fixes result-row positions.
fn column_list(table: &Table) -> String {
    table
        .columns
        .iter()
        .map(|c| quoted(&c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT one page in natural row order. Binds offset, then limit.
pub fn select_page(table: &Table, offset: i64, limit: i64) -> QueryBuf {
    QueryBuf {
        sql: format!(
            "SELECT {} FROM {} LIMIT ?, ?",
            column_list(table),
            quoted(&table.name)
        ),
        params: vec![BindValue::I64(offset), BindValue::I64(limit)],
    }
}

/// SELECT one row by the read-key column, which may differ from the primary
/// key (see `Table::key_column`).
pub fn select_by_key(table: &Table, key: i64) -> Result<QueryBuf, AppError> {
    let key_col = table.key_column().ok_or_else(|| {
        AppError::Internal(format!("table '{}' has no key column", table.name))
    })?;
    Ok(QueryBuf {
        sql: format!(
            "SELECT {} FROM {} WHERE {} = ?",
            column_list(table),
            quoted(&table.name),
            quoted(&key_col.name)
        ),
        params: vec![BindValue::I64(key)],
    })
}

/// INSERT with exactly one placeholder per column, in ordinal order. Omitted
/// non-nullable columns take their type's zero value; omitted nullable
/// columns bind NULL. A zero or NULL on an auto-increment key still yields a
/// generated id.
pub fn insert(table: &Table, payload: &Map<String, Value>) -> QueryBuf {
    let mut params = Vec::with_capacity(table.columns.len());
    for col in &table.columns {
        let value = match payload.get(&col.name) {
            Some(v) => BindValue::from_json(v),
            None if !col.nullable => BindValue::from_json(&col.data_type.zero_value()),
            None => BindValue::Null,
        };
        params.push(value);
    }
    let placeholders = vec!["?"; table.columns.len()].join(", ");
    QueryBuf {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quoted(&table.name),
            column_list(table),
            placeholders
        ),
        params,
    }
}

/// UPDATE by primary key: one SET assignment per supplied field that names a
/// non-key column, in ordinal order, rendered as literals. Fields naming no
/// column are dropped; a payload that leaves nothing to set is rejected
/// before any SQL is built.
pub fn update(table: &Table, key: i64, fields: &Map<String, Value>) -> Result<QueryBuf, AppError> {
    let pk = table.primary_key().ok_or_else(|| {
        AppError::Internal(format!("table '{}' has no primary key", table.name))
    })?;
    let mut sets = Vec::new();
    for col in &table.columns {
        if col.primary_key {
            continue;
        }
        let Some(value) = fields.get(&col.name) else {
            continue;
        };
        sets.push(format!("{} = {}", quoted(&col.name), literal(value)));
    }
    if sets.is_empty() {
        return Err(AppError::BadRequest(
            "update requires at least one field".into(),
        ));
    }
    Ok(QueryBuf {
        sql: format!(
            "UPDATE {} SET {} WHERE {} = ?",
            quoted(&table.name),
            sets.join(", "),
            quoted(&pk.name)
        ),
        params: vec![BindValue::I64(key)],
    })
}

/// DELETE by primary key.
pub fn delete(table: &Table, key: i64) -> Result<QueryBuf, AppError> {
    let pk = table.primary_key().ok_or_else(|| {
        AppError::Internal(format!("table '{}' has no primary key", table.name))
    })?;
    Ok(QueryBuf {
        sql: format!(
            "DELETE FROM {} WHERE {} = ?",
            quoted(&table.name),
            quoted(&pk.name)
        ),
        params: vec![BindValue::I64(key)],
    })
}

/// Render one validated JSON value as a MySQL literal.
fn literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote_text(s),
        // Composites only reach unmapped columns; store their JSON text.
        other => quote_text(&other.to_string()),
    }
}

/// Single-quoted string literal with quote and backslash escapes.
fn quote_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ColumnType};
    use serde_json::json;

    fn col(ordinal: usize, name: &str, data_type: ColumnType, nullable: bool, pk: bool) -> Column {
        Column {
            ordinal,
            name: name.to_string(),
            data_type,
            nullable,
            primary_key: pk,
        }
    }

    fn users() -> Table {
        Table {
            name: "users".into(),
            columns: vec![
                col(0, "id", ColumnType::Integer, false, true),
                col(1, "name", ColumnType::Text, false, false),
                col(2, "about", ColumnType::Text, true, false),
            ],
        }
    }

    #[test]
    fn select_page_binds_offset_then_limit() {
        let q = select_page(&users(), 10, 5);
        assert_eq!(q.sql, "SELECT `id`, `name`, `about` FROM `users` LIMIT ?, ?");
        assert_eq!(q.params, vec![BindValue::I64(10), BindValue::I64(5)]);
    }

    #[test]
    fn select_by_key_uses_read_key_not_primary_key() {
        let table = Table {
            name: "orders".into(),
            columns: vec![
                col(0, "order_uid", ColumnType::Integer, false, false),
                col(1, "id", ColumnType::Integer, false, true),
            ],
        };
        let q = select_by_key(&table, 7).unwrap();
        assert_eq!(
            q.sql,
            "SELECT `order_uid`, `id` FROM `orders` WHERE `order_uid` = ?"
        );
        assert_eq!(q.params, vec![BindValue::I64(7)]);
    }

    #[test]
    fn select_by_key_requires_a_key_column() {
        let table = Table {
            name: "notes".into(),
            columns: vec![col(0, "body", ColumnType::Text, false, false)],
        };
        assert!(matches!(
            select_by_key(&table, 1),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn insert_covers_every_column() {
        let mut payload = Map::new();
        payload.insert("name".into(), json!("Ann"));
        let q = insert(&users(), &payload);
        assert_eq!(
            q.sql,
            "INSERT INTO `users` (`id`, `name`, `about`) VALUES (?, ?, ?)"
        );
        // Omitted non-nullable id takes its zero value; nullable about is NULL.
        assert_eq!(
            q.params,
            vec![
                BindValue::I64(0),
                BindValue::Text("Ann".into()),
                BindValue::Null
            ]
        );
    }

    #[test]
    fn insert_ignores_fields_naming_no_column() {
        let mut payload = Map::new();
        payload.insert("name".into(), json!("Ann"));
        payload.insert("ghost".into(), json!(1));
        let q = insert(&users(), &payload);
        assert_eq!(q.params.len(), 3);
    }

    #[test]
    fn insert_zero_value_for_unknown_is_null() {
        let table = Table {
            name: "events".into(),
            columns: vec![
                col(0, "id", ColumnType::Integer, false, true),
                col(1, "created_at", ColumnType::Unknown, false, false),
            ],
        };
        let q = insert(&table, &Map::new());
        assert_eq!(q.params, vec![BindValue::I64(0), BindValue::Null]);
    }

    #[test]
    fn update_renders_literals_in_ordinal_order() {
        let mut fields = Map::new();
        fields.insert("about".into(), json!("likes Rust"));
        fields.insert("name".into(), json!("Bob"));
        let q = update(&users(), 3, &fields).unwrap();
        assert_eq!(
            q.sql,
            "UPDATE `users` SET `name` = 'Bob', `about` = 'likes Rust' WHERE `id` = ?"
        );
        assert_eq!(q.params, vec![BindValue::I64(3)]);
    }

    #[test]
    fn update_literal_kinds() {
        let table = Table {
            name: "t".into(),
            columns: vec![
                col(0, "id", ColumnType::Integer, false, true),
                col(1, "n", ColumnType::Integer, false, false),
                col(2, "flag", ColumnType::Boolean, false, false),
                col(3, "note", ColumnType::Text, true, false),
            ],
        };
        let mut fields = Map::new();
        fields.insert("n".into(), json!(42));
        fields.insert("flag".into(), json!(true));
        fields.insert("note".into(), Value::Null);
        let q = update(&table, 1, &fields).unwrap();
        assert_eq!(
            q.sql,
            "UPDATE `t` SET `n` = 42, `flag` = TRUE, `note` = NULL WHERE `id` = ?"
        );
    }

    #[test]
    fn update_escapes_text() {
        let mut fields = Map::new();
        fields.insert("name".into(), json!(r"O'Brien \ co"));
        let q = update(&users(), 1, &fields).unwrap();
        assert_eq!(
            q.sql,
            r"UPDATE `users` SET `name` = 'O''Brien \\ co' WHERE `id` = ?"
        );
    }

    #[test]
    fn update_rejects_empty_set() {
        assert!(matches!(
            update(&users(), 1, &Map::new()),
            Err(AppError::BadRequest(_))
        ));
        // Fields naming no column leave nothing to set.
        let mut fields = Map::new();
        fields.insert("ghost".into(), json!(1));
        assert!(matches!(
            update(&users(), 1, &fields),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn delete_keys_on_primary_key() {
        let q = delete(&users(), 9).unwrap();
        assert_eq!(q.sql, "DELETE FROM `users` WHERE `id` = ?");
        assert_eq!(q.params, vec![BindValue::I64(9)]);
    }

    #[test]
    fn quoting_doubles_backticks() {
        assert_eq!(quoted("weird`name"), "`weird``name`");
    }
}
