//! Operation handlers: resolve the table, run the engine, wrap the envelope.

use crate::error::AppError;
use crate::response;
use crate::schema::Table;
use crate::service::{CrudService, Record};
use crate::state::AppState;
use axum::response::{IntoResponse, Response};

fn table<'a>(state: &'a AppState, name: &str) -> Result<&'a Table, AppError> {
    state.schema.table(name).ok_or(AppError::UnknownTable)
}

pub fn tables(state: &AppState) -> Result<Response, AppError> {
    Ok(response::tables(state.schema.table_names()).into_response())
}

pub async fn list(
    state: &AppState,
    name: &str,
    offset: Option<i64>,
    limit: Option<i64>,
) -> Result<Response, AppError> {
    let table = table(state, name)?;
    let records = CrudService::list(&state.pool, table, offset, limit).await?;
    Ok(response::records(records).into_response())
}

pub async fn read(state: &AppState, name: &str, id: i64) -> Result<Response, AppError> {
    let table = table(state, name)?;
    let record = CrudService::get_by_key(&state.pool, table, id).await?;
    Ok(response::record(record).into_response())
}

pub async fn create(
    state: &AppState,
    name: &str,
    payload: Record,
) -> Result<Response, AppError> {
    let table = table(state, name)?;
    let key = CrudService::create(&state.pool, table, payload).await?;
    Ok(response::created(key).into_response())
}

pub async fn replace(
    state: &AppState,
    name: &str,
    id: i64,
    payload: Record,
) -> Result<Response, AppError> {
    let table = table(state, name)?;
    let count = CrudService::replace(&state.pool, table, id, payload).await?;
    Ok(response::updated(count).into_response())
}

pub async fn delete(state: &AppState, name: &str, id: i64) -> Result<Response, AppError> {
    let table = table(state, name)?;
    let count = CrudService::delete(&state.pool, table, id).await?;
    Ok(response::deleted(count).into_response())
}
