//! Request validation against a table's column model.

use crate::error::AppError;
use crate::schema::{Column, ColumnType};
use serde_json::{Map, Value};

pub struct RequestValidator;

impl RequestValidator {
    /// Check payload fields against the columns in ordinal order, stopping at
    /// the first violation. Columns absent from the payload are never
    /// checked; payload fields naming no column are ignored.
    ///
    /// With `drop_primary_key` a primary-key field is removed from the
    /// payload (insert paths, where the database generates the key); without
    /// it, a primary-key field is a violation (the key is immutable).
    pub fn validate(
        payload: &mut Map<String, Value>,
        columns: &[Column],
        drop_primary_key: bool,
    ) -> Result<(), AppError> {
        for col in columns {
            if col.primary_key && payload.contains_key(&col.name) {
                if drop_primary_key {
                    payload.remove(&col.name);
                    continue;
                }
                return Err(AppError::Validation(col.name.clone()));
            }
            let Some(value) = payload.get(&col.name) else {
                continue;
            };
            if value.is_null() {
                if !col.nullable {
                    return Err(AppError::Validation(col.name.clone()));
                }
            } else if !kind_matches(col.data_type, value) {
                return Err(AppError::Validation(col.name.clone()));
            }
        }
        Ok(())
    }
}

/// JSON tag against semantic type. Unknown accepts any tag.
fn kind_matches(data_type: ColumnType, value: &Value) -> bool {
    match data_type {
        ColumnType::Integer => value.is_number(),
        ColumnType::Text => value.is_string(),
        ColumnType::Boolean => value.is_boolean(),
        ColumnType::Unknown => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn users_columns() -> Vec<Column> {
        vec![
            Column {
                ordinal: 0,
                name: "id".into(),
                data_type: ColumnType::Integer,
                nullable: false,
                primary_key: true,
            },
            Column {
                ordinal: 1,
                name: "name".into(),
                data_type: ColumnType::Text,
                nullable: false,
                primary_key: false,
            },
            Column {
                ordinal: 2,
                name: "about".into(),
                data_type: ColumnType::Text,
                nullable: true,
                primary_key: false,
            },
        ]
    }

    fn payload(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn accepts_matching_kinds() {
        let mut body = payload(json!({"name": "Ann", "about": "hi"}));
        assert!(RequestValidator::validate(&mut body, &users_columns(), false).is_ok());
    }

    #[test]
    fn rejects_wrong_kind_naming_the_field() {
        let mut body = payload(json!({"name": 7}));
        let err = RequestValidator::validate(&mut body, &users_columns(), false).unwrap_err();
        assert_eq!(err.to_string(), "field 'name' has invalid type");
    }

    #[test]
    fn null_needs_a_nullable_column() {
        let mut body = payload(json!({"about": null}));
        assert!(RequestValidator::validate(&mut body, &users_columns(), false).is_ok());

        let mut body = payload(json!({"name": null}));
        let err = RequestValidator::validate(&mut body, &users_columns(), false).unwrap_err();
        assert_eq!(err.to_string(), "field 'name' has invalid type");
    }

    #[test]
    fn primary_key_is_dropped_on_insert() {
        let mut body = payload(json!({"id": 42, "name": "Ann"}));
        RequestValidator::validate(&mut body, &users_columns(), true).unwrap();
        assert!(!body.contains_key("id"));
        assert!(body.contains_key("name"));
    }

    #[test]
    fn primary_key_is_rejected_on_update() {
        let mut body = payload(json!({"id": 42, "name": "Ann"}));
        let err = RequestValidator::validate(&mut body, &users_columns(), false).unwrap_err();
        assert_eq!(err.to_string(), "field 'id' has invalid type");
    }

    #[test]
    fn primary_key_kind_is_not_checked_when_dropped() {
        // The field is removed before any type check.
        let mut body = payload(json!({"id": "not a number", "name": "Ann"}));
        assert!(RequestValidator::validate(&mut body, &users_columns(), true).is_ok());
    }

    #[test]
    fn fields_naming_no_column_pass_through() {
        let mut body = payload(json!({"ghost": {"any": "shape"}}));
        assert!(RequestValidator::validate(&mut body, &users_columns(), false).is_ok());
    }

    #[test]
    fn first_violation_in_ordinal_order_wins() {
        let mut body = payload(json!({"name": 1, "about": 2}));
        let err = RequestValidator::validate(&mut body, &users_columns(), false).unwrap_err();
        assert_eq!(err.to_string(), "field 'name' has invalid type");
    }

    #[test]
    fn unknown_columns_accept_any_kind() {
        let columns = vec![Column {
            ordinal: 0,
            name: "payload".into(),
            data_type: ColumnType::Unknown,
            nullable: false,
            primary_key: false,
        }];
        for value in [json!(1), json!("x"), json!(true), json!([1]), json!({"k": 1})] {
            let mut body = Map::new();
            body.insert("payload".into(), value);
            assert!(RequestValidator::validate(&mut body, &columns, false).is_ok());
        }
    }

    #[test]
    fn boolean_column_wants_a_boolean() {
        let columns = vec![Column {
            ordinal: 0,
            name: "active".into(),
            data_type: ColumnType::Boolean,
            nullable: false,
            primary_key: false,
        }];
        let mut body = payload(json!({"active": true}));
        assert!(RequestValidator::validate(&mut body, &columns, false).is_ok());
        let mut body = payload(json!({"active": 1}));
        assert!(RequestValidator::validate(&mut body, &columns, false).is_err());
    }
}
