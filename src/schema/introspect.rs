//! Startup schema discovery from INFORMATION_SCHEMA.
//!
//! Two passes: list the base tables of the connected database, then describe
//! each table's columns in ordinal order. Runs once; the snapshot never
//! reloads.

use super::model::{Column, Schema, Table};
use super::type_map::map_type_name;
use crate::error::IntrospectionError;
use sqlx::{MySqlPool, Row};
use std::collections::BTreeMap;

// CAST to CHAR so MySQL 8 hands back strings, not VARBINARY metadata.
const LIST_TABLES: &str = "\
    SELECT CAST(TABLE_NAME AS CHAR) AS TABLE_NAME \
    FROM INFORMATION_SCHEMA.TABLES \
    WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE' \
    ORDER BY TABLE_NAME";

const DESCRIBE_COLUMNS: &str = "\
    SELECT \
        CAST(COLUMN_NAME AS CHAR) AS COLUMN_NAME, \
        CAST(DATA_TYPE AS CHAR) AS DATA_TYPE, \
        CAST(IS_NULLABLE AS CHAR) AS IS_NULLABLE, \
        CAST(COLUMN_KEY AS CHAR) AS COLUMN_KEY \
    FROM INFORMATION_SCHEMA.COLUMNS \
    WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? \
    ORDER BY ORDINAL_POSITION";

/// Discover every base table of the connected database. Any failure is fatal:
/// the service has nothing to serve without a complete snapshot.
pub async fn discover(pool: &MySqlPool) -> Result<Schema, IntrospectionError> {
    let table_rows = sqlx::query(LIST_TABLES)
        .fetch_all(pool)
        .await
        .map_err(IntrospectionError::ListTables)?;

    let mut tables = BTreeMap::new();
    for row in &table_rows {
        let name: String = row
            .try_get("TABLE_NAME")
            .map_err(IntrospectionError::ListTables)?;
        let columns = describe_columns(pool, &name).await?;
        tracing::debug!(table = %name, columns = columns.len(), "described table");
        tables.insert(name.clone(), Table { name, columns });
    }
    tracing::info!(tables = tables.len(), "schema discovered");
    Ok(Schema { tables })
}

async fn describe_columns(
    pool: &MySqlPool,
    table: &str,
) -> Result<Vec<Column>, IntrospectionError> {
    let describe_err = |source| IntrospectionError::DescribeColumns {
        table: table.to_string(),
        source,
    };
    let rows = sqlx::query(DESCRIBE_COLUMNS)
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(describe_err)?;

    let mut columns = Vec::with_capacity(rows.len());
    for (ordinal, row) in rows.iter().enumerate() {
        let name: String = row.try_get("COLUMN_NAME").map_err(describe_err)?;
        let data_type: String = row.try_get("DATA_TYPE").map_err(describe_err)?;
        let is_nullable: String = row.try_get("IS_NULLABLE").map_err(describe_err)?;
        let column_key: String = row.try_get("COLUMN_KEY").map_err(describe_err)?;
        columns.push(build_column(ordinal, name, &data_type, &is_nullable, &column_key));
    }
    Ok(columns)
}

/// Assemble one column from its INFORMATION_SCHEMA row.
fn build_column(
    ordinal: usize,
    name: String,
    data_type: &str,
    is_nullable: &str,
    column_key: &str,
) -> Column {
    Column {
        ordinal,
        name,
        data_type: map_type_name(data_type),
        nullable: is_nullable.eq_ignore_ascii_case("YES"),
        primary_key: column_key == "PRI",
    }
}
