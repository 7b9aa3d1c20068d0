use super::types::{ColumnDefault, ColumnInfo};
use super::Catalog;
use crate::config::DbConfig;
use crate::error::{GrdsError, Result};
use mysql_async::prelude::Queryable;
use mysql_async::{from_value_opt, Conn, Row, Value};
use tokio::runtime::Runtime;

const SHOW_TABLES: &str = "SHOW TABLES";

const TABLE_COMMENT_QUERY: &str = "SELECT TABLE_COMMENT FROM information_schema.TABLES \
     WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?";

/// Field, Type, Collation, Null, Key, Default, Extra, Privileges, Comment.
const SHOW_FULL_COLUMNS_WIDTH: usize = 9;

/// Back-tick quote a MySQL identifier, doubling embedded back-ticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// [`Catalog`] over a live MySQL server.
///
/// Every operation opens its own connection and closes it before returning;
/// nothing is pooled between calls. The driver is async, so the catalog owns a
/// current-thread runtime and blocks on each operation.
pub struct MysqlCatalog {
    config: DbConfig,
    runtime: Runtime,
}

impl MysqlCatalog {
    /// Validate `config` and prepare the runtime. No connection is made yet.
    pub fn new(config: DbConfig) -> Result<Self> {
        config.validate()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| GrdsError::Other(format!("failed to start runtime: {e}")))?;
        Ok(MysqlCatalog { config, runtime })
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    async fn connect(&self) -> Result<Conn> {
        log::debug!("connecting to {}", self.config.display_target());
        match tokio::time::timeout(self.config.timeout(), Conn::new(self.config.to_opts())).await
        {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(self.connection_error(e.to_string())),
            Err(_) => Err(self.connection_error(format!(
                "timed out after {}s",
                self.config.timeout_secs
            ))),
        }
    }

    async fn disconnect(&self, conn: Conn) {
        if let Err(e) = conn.disconnect().await {
            log::warn!("failed to close connection cleanly: {e}");
        }
    }

    fn connection_error(&self, message: String) -> GrdsError {
        GrdsError::Connection {
            host: self.config.host.clone(),
            port: self.config.port,
            message,
        }
    }
}

impl Catalog for MysqlCatalog {
    fn list_tables(&self) -> Result<Vec<String>> {
        self.runtime.block_on(async {
            let mut conn = self.connect().await?;
            let tables: std::result::Result<Vec<String>, _> = conn.query(SHOW_TABLES).await;
            let tables = tables.map_err(|source| GrdsError::Catalog {
                query: SHOW_TABLES.to_string(),
                source,
            });
            self.disconnect(conn).await;
            tables
        })
    }

    fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let query = format!("SHOW FULL COLUMNS FROM {}", quote_identifier(table));
        self.runtime.block_on(async {
            let mut conn = self.connect().await?;
            let rows: std::result::Result<Vec<Row>, _> = conn.query(query.as_str()).await;
            let rows = rows.map_err(|source| GrdsError::Catalog {
                query: query.clone(),
                source,
            });
            self.disconnect(conn).await;
            rows?
                .into_iter()
                .map(|row| column_from_row(row, &query))
                .collect::<Result<Vec<_>>>()
        })
    }

    fn table_comment(&self, table: &str) -> Result<String> {
        self.runtime.block_on(async {
            let mut conn = self.connect().await?;
            let comment: std::result::Result<Option<Option<String>>, _> = conn
                .exec_first(
                    TABLE_COMMENT_QUERY,
                    (self.config.database.clone(), table.to_string()),
                )
                .await;
            let comment = comment.map_err(|source| GrdsError::Catalog {
                query: TABLE_COMMENT_QUERY.to_string(),
                source,
            });
            self.disconnect(conn).await;
            Ok(comment?.flatten().unwrap_or_default())
        })
    }
}

fn column_from_row(row: Row, query: &str) -> Result<ColumnInfo> {
    column_from_values(row.unwrap(), query)
}

/// Map one `SHOW FULL COLUMNS` row. Collation (2) and Privileges (7) are not
/// kept.
fn column_from_values(mut values: Vec<Value>, query: &str) -> Result<ColumnInfo> {
    if values.len() < SHOW_FULL_COLUMNS_WIDTH {
        return Err(GrdsError::CatalogRow {
            query: query.to_string(),
            message: format!(
                "expected {SHOW_FULL_COLUMNS_WIDTH} columns, got {}",
                values.len()
            ),
        });
    }

    Ok(ColumnInfo {
        field: take_text(&mut values, 0, query)?,
        db_type: take_text(&mut values, 1, query)?,
        null: take_text(&mut values, 3, query)?,
        key: take_text(&mut values, 4, query)?,
        default: ColumnDefault::from(std::mem::replace(&mut values[5], Value::NULL)),
        extra: take_text(&mut values, 6, query)?,
        comment: take_text(&mut values, 8, query)?,
    })
}

/// A textual cell; SQL NULL reads as an empty string.
fn take_text(values: &mut [Value], index: usize, query: &str) -> Result<String> {
    let value = std::mem::replace(&mut values[index], Value::NULL);
    from_value_opt::<Option<String>>(value)
        .map(Option::unwrap_or_default)
        .map_err(|e| GrdsError::CatalogRow {
            query: query.to_string(),
            message: format!("column {index}: {e}"),
        })
}
