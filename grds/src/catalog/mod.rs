mod mysql;
mod types;

pub use mysql::{quote_identifier, MysqlCatalog};
pub use types::{ColumnDefault, ColumnInfo};

use crate::error::Result;

/// Read access to the catalog metadata of one database.
pub trait Catalog {
    /// All table names, in the order the server returns them.
    fn list_tables(&self) -> Result<Vec<String>>;

    /// Columns of `table`, in declaration order.
    fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>>;

    /// The table comment, empty when the table has none.
    fn table_comment(&self, table: &str) -> Result<String>;
}
