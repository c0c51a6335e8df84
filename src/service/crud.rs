//! Generic CRUD execution against MySQL.

use crate::error::AppError;
use crate::schema::{Column, ColumnType, Table};
use crate::service::validation::RequestValidator;
use crate::sql::{self, QueryBuf};
use serde_json::{Map, Value};
use sqlx::mysql::{MySqlQueryResult, MySqlRow};
use sqlx::{MySqlPool, Row};

/// One result row as a name-to-value map.
pub type Record = Map<String, Value>;

pub struct CrudService;

impl CrudService {
    /// List one page of rows. Offset defaults to 0, limit to 5.
    pub async fn list(
        pool: &MySqlPool,
        table: &Table,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<Record>, AppError> {
        let (offset, limit) = page(offset, limit);
        let q = sql::select_page(table, offset, limit);
        let rows = Self::fetch_all(pool, &q).await?;
        Ok(rows.iter().map(|r| row_to_record(table, r)).collect())
    }

    /// Fetch one row by the read-key column.
    pub async fn get_by_key(pool: &MySqlPool, table: &Table, key: i64) -> Result<Record, AppError> {
        let q = sql::select_by_key(table, key)?;
        let row = Self::fetch_optional(pool, &q)
            .await?
            .ok_or(AppError::RecordNotFound)?;
        Ok(row_to_record(table, &row))
    }

    /// Validate (primary key dropped), insert, and report the generated key
    /// under the primary-key column's name.
    pub async fn create(
        pool: &MySqlPool,
        table: &Table,
        mut payload: Map<String, Value>,
    ) -> Result<Record, AppError> {
        RequestValidator::validate(&mut payload, &table.columns, true)?;
        let q = sql::insert(table, &payload);
        let result = Self::execute(pool, &q).await?;
        let key_name = table
            .primary_key()
            .map(|c| c.name.as_str())
            .unwrap_or("id");
        let mut out = Record::new();
        out.insert(key_name.to_string(), Value::from(result.last_insert_id()));
        Ok(out)
    }

    /// Validate (primary key forbidden) and update by primary key. Returns
    /// the number of rows changed; 0 means no such key and is not an error.
    pub async fn replace(
        pool: &MySqlPool,
        table: &Table,
        key: i64,
        mut payload: Map<String, Value>,
    ) -> Result<u64, AppError> {
        RequestValidator::validate(&mut payload, &table.columns, false)?;
        let q = sql::update(table, key, &payload)?;
        let result = Self::execute(pool, &q).await?;
        Ok(result.rows_affected())
    }

    /// Delete by primary key. A table without one deletes nothing.
    pub async fn delete(pool: &MySqlPool, table: &Table, key: i64) -> Result<u64, AppError> {
        if table.primary_key().is_none() {
            return Ok(0);
        }
        let q = sql::delete(table, key)?;
        let result = Self::execute(pool, &q).await?;
        Ok(result.rows_affected())
    }

    async fn fetch_all(pool: &MySqlPool, q: &QueryBuf) -> Result<Vec<MySqlRow>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        query
            .fetch_all(pool)
            .await
            .map_err(|e| Self::db_error(&q.sql, e))
    }

    async fn fetch_optional(pool: &MySqlPool, q: &QueryBuf) -> Result<Option<MySqlRow>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        query
            .fetch_optional(pool)
            .await
            .map_err(|e| Self::db_error(&q.sql, e))
    }

    async fn execute(pool: &MySqlPool, q: &QueryBuf) -> Result<MySqlQueryResult, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        query
            .execute(pool)
            .await
            .map_err(|e| Self::db_error(&q.sql, e))
    }

    fn db_error(sql: &str, e: sqlx::Error) -> AppError {
        tracing::error!(sql = %sql, error = %e, "statement failed");
        AppError::Db(e)
    }
}

const DEFAULT_LIMIT: i64 = 5;

/// Paging defaults for absent query parameters.
fn page(offset: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    (offset.unwrap_or(0), limit.unwrap_or(DEFAULT_LIMIT))
}

/// Decode one row positionally into a Record, driven by each column's
/// semantic type.
fn row_to_record(table: &Table, row: &MySqlRow) -> Record {
    let mut record = Record::new();
    for col in &table.columns {
        record.insert(col.name.clone(), cell_to_value(row, col));
    }
    record
}

fn cell_to_value(row: &MySqlRow, col: &Column) -> Value {
    match col.data_type {
        ColumnType::Integer => {
            if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(col.ordinal) {
                return Value::from(n);
            }
            if let Ok(Some(n)) = row.try_get::<Option<u64>, _>(col.ordinal) {
                return Value::from(n);
            }
            Value::Null
        }
        ColumnType::Text => match row.try_get::<Option<String>, _>(col.ordinal) {
            Ok(Some(s)) => Value::String(s),
            _ => Value::Null,
        },
        ColumnType::Boolean => match row.try_get::<Option<bool>, _>(col.ordinal) {
            Ok(Some(b)) => Value::Bool(b),
            _ => Value::Null,
        },
        ColumnType::Unknown => opaque_to_value(row, col.ordinal),
    }
}

/// Best-effort decode for unmapped column types. Temporal values become
/// display strings, raw bytes become lossy UTF-8, anything undecodable
/// becomes null.
fn opaque_to_value(row: &MySqlRow, idx: usize) -> Value {
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(idx) {
        return Value::from(n);
    }
    if let Ok(Some(n)) = row.try_get::<Option<u64>, _>(idx) {
        return Value::from(n);
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(idx) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(idx) {
        return Value::Bool(b);
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(idx) {
        return Value::String(d.format("%Y-%m-%d %H:%M:%S").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(idx) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(t)) = row.try_get::<Option<chrono::NaiveTime>, _>(idx) {
        return Value::String(t.format("%H:%M:%S").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(idx) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(idx) {
        return j;
    }
    if let Ok(Some(b)) = row.try_get::<Option<Vec<u8>>, _>(idx) {
        return Value::String(String::from_utf8_lossy(&b).into_owned());
    }
    // DECIMAL and friends have no checked decode here, but their wire form
    // is textual; take it as a display string before giving up.
    if let Ok(Some(s)) = row.try_get_unchecked::<Option<String>, _>(idx) {
        return Value::String(s);
    }
    Value::Null
}
