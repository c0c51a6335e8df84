//! Tablegate: schema-driven REST backend library.
//!
//! Discovers every base table of the connected MySQL database at startup and
//! serves uniform CRUD over each one, no per-table code or configuration.

pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;

pub use error::{AppError, IntrospectionError};
pub use routes::{app, classify, RouteMatch};
pub use schema::{discover, Column, ColumnType, Schema, Table};
pub use service::{CrudService, Record, RequestValidator};
pub use state::AppState;
