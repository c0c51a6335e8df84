//! Response envelope helpers: every success body is `{"response": ...}`
//! with status 200.

use crate::service::Record;
use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct Envelope<T> {
    pub response: T,
}

#[derive(Serialize)]
pub struct TableNames {
    pub tables: Vec<String>,
}

#[derive(Serialize)]
pub struct RecordPage {
    pub records: Vec<Record>,
}

#[derive(Serialize)]
pub struct OneRecord {
    pub record: Record,
}

#[derive(Serialize)]
pub struct Updated {
    pub updated: u64,
}

#[derive(Serialize)]
pub struct Deleted {
    pub deleted: u64,
}

pub fn tables(names: Vec<String>) -> Json<Envelope<TableNames>> {
    Json(Envelope {
        response: TableNames { tables: names },
    })
}

pub fn records(records: Vec<Record>) -> Json<Envelope<RecordPage>> {
    Json(Envelope {
        response: RecordPage { records },
    })
}

pub fn record(record: Record) -> Json<Envelope<OneRecord>> {
    Json(Envelope {
        response: OneRecord { record },
    })
}

/// The created-key map already carries the primary-key column's name, so it
/// goes out as-is.
pub fn created(key: Record) -> Json<Envelope<Record>> {
    Json(Envelope { response: key })
}

pub fn updated(count: u64) -> Json<Envelope<Updated>> {
    Json(Envelope {
        response: Updated { updated: count },
    })
}

pub fn deleted(count: u64) -> Json<Envelope<Deleted>> {
    Json(Envelope {
        response: Deleted { deleted: count },
    })
}
