use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrdsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error ({host}:{port}): {message}")]
    Connection {
        host: String,
        port: u32,
        message: String,
    },

    #[error("Catalog query failed ({query}): {source}")]
    Catalog {
        query: String,
        #[source]
        source: mysql_async::Error,
    },

    #[error("Unexpected catalog row ({query}): {message}")]
    CatalogRow { query: String, message: String },

    #[error("Cannot derive an identifier from `{source_name}` (got `{identifier}`)")]
    InvalidIdentifier {
        source_name: String,
        identifier: String,
    },

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("MySQL error: {0}")]
    Mysql(#[from] mysql_async::Error),

    #[error("{0}")]
    Other(String),
}

impl GrdsError {
    /// Attach a path to an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GrdsError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GrdsError>;
