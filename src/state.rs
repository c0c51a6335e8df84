//! Shared application state for all request handlers.

use crate::schema::Schema;
use sqlx::MySqlPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: MySqlPool,
    /// Snapshot built once at startup; never reloaded.
    pub schema: Arc<Schema>,
}
