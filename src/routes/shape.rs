//! Pure request classification over the discovered table set.
//!
//! The table set is runtime data, so dispatch is a shape match against the
//! snapshot rather than a static route table.

use crate::error::AppError;
use crate::schema::Schema;
use axum::http::Method;

/// The operation a request resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteMatch {
    Tables,
    List { table: String },
    Create { table: String },
    Read { table: String, id: i64 },
    Replace { table: String, id: i64 },
    Delete { table: String, id: i64 },
}

/// Classify (method, path) against the snapshot. Recognized shapes, in
/// order: `/`, `/{table}`, `/{table}/`, `/{table}/{numeric-id}`. A matched
/// shape with a method outside its set is 405; everything else, including
/// unknown tables and non-numeric ids, is 404. The trailing slash is
/// significant: `/{table}/` is the create shape, not the list shape.
pub fn classify(method: &Method, path: &str, schema: &Schema) -> Result<RouteMatch, AppError> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return if *method == Method::GET {
            Ok(RouteMatch::Tables)
        } else {
            Err(AppError::MethodNotAllowed)
        };
    }
    let segments: Vec<&str> = trimmed.split('/').collect();
    match segments.as_slice() {
        [table] if schema.contains(table) => {
            if *method == Method::GET {
                Ok(RouteMatch::List {
                    table: table.to_string(),
                })
            } else {
                Err(AppError::MethodNotAllowed)
            }
        }
        [table, ""] if schema.contains(table) => {
            if *method == Method::PUT || *method == Method::POST {
                Ok(RouteMatch::Create {
                    table: table.to_string(),
                })
            } else {
                Err(AppError::MethodNotAllowed)
            }
        }
        [table, id_str] if schema.contains(table) => {
            let Some(id) = parse_id(id_str) else {
                return Err(AppError::UnknownTable);
            };
            let table = table.to_string();
            if *method == Method::GET {
                Ok(RouteMatch::Read { table, id })
            } else if *method == Method::PUT || *method == Method::POST {
                Ok(RouteMatch::Replace { table, id })
            } else if *method == Method::DELETE {
                Ok(RouteMatch::Delete { table, id })
            } else {
                Err(AppError::MethodNotAllowed)
            }
        }
        _ => Err(AppError::UnknownTable),
    }
}

/// Numeric path id: ASCII digits that fit an i64.
fn parse_id(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
