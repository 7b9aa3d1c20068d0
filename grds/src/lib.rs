//! Core of the grds model generator: connection configuration, the error type,
//! and read access to MySQL catalog metadata.

pub mod catalog;
pub mod config;
pub mod error;

pub use catalog::{Catalog, ColumnDefault, ColumnInfo, MysqlCatalog};
pub use config::DbConfig;
pub use error::{GrdsError, Result};
