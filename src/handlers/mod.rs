//! HTTP handlers for table CRUD.

pub mod records;
pub use records::*;
