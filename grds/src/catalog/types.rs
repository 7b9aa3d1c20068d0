use serde::{Deserialize, Serialize};
use std::fmt;

/// Default value of a column as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnDefault {
    #[default]
    Absent,
    Text(String),
}

impl ColumnDefault {
    /// The default as text, if the column has one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ColumnDefault::Absent => None,
            ColumnDefault::Text(s) => Some(s),
        }
    }

    /// Whether the default should be carried into generated tags.
    /// Empty strings and a literal `NULL` count as no default.
    pub fn is_meaningful(&self) -> bool {
        matches!(self.as_text(), Some(s) if !s.is_empty() && s != "NULL")
    }
}

impl From<mysql_async::Value> for ColumnDefault {
    fn from(value: mysql_async::Value) -> Self {
        match value {
            mysql_async::Value::NULL => ColumnDefault::Absent,
            mysql_async::Value::Bytes(bytes) => {
                ColumnDefault::Text(String::from_utf8_lossy(&bytes).into_owned())
            }
            mysql_async::Value::Int(n) => ColumnDefault::Text(n.to_string()),
            mysql_async::Value::UInt(n) => ColumnDefault::Text(n.to_string()),
            mysql_async::Value::Float(n) => ColumnDefault::Text(n.to_string()),
            mysql_async::Value::Double(n) => ColumnDefault::Text(n.to_string()),
            other => ColumnDefault::Text(other.as_sql(true).trim_matches('\'').to_string()),
        }
    }
}

/// One row of `SHOW FULL COLUMNS`, minus collation and privileges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub field: String,
    pub db_type: String,
    /// `YES` or `NO`.
    pub null: String,
    /// `PRI`, `UNI`, `MUL` or empty.
    pub key: String,
    pub default: ColumnDefault,
    pub extra: String,
    pub comment: String,
}

impl ColumnInfo {
    pub fn is_nullable(&self) -> bool {
        self.null == "YES"
    }

    pub fn is_primary_key(&self) -> bool {
        self.key == "PRI"
    }

    pub fn is_auto_increment(&self) -> bool {
        self.extra.contains("auto_increment")
    }
}

impl fmt::Display for ColumnInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![
            format!("Field: {}", self.field),
            format!("Type: {}", self.db_type),
        ];
        if self.is_nullable() {
            parts.push("Nullable".to_string());
        }
        if !self.key.is_empty() {
            parts.push(format!("Key: {}", self.key));
        }
        if let Some(default) = self.default.as_text() {
            parts.push(format!("Default: {default}"));
        }
        if !self.extra.is_empty() {
            parts.push(format!("Extra: {}", self.extra));
        }
        if !self.comment.is_empty() {
            parts.push(format!("Comment: {}", self.comment));
        }
        write!(f, "{}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_column() -> ColumnInfo {
        ColumnInfo {
            field: "id".into(),
            db_type: "int(11) unsigned".into(),
            null: "NO".into(),
            key: "PRI".into(),
            default: ColumnDefault::Absent,
            extra: "auto_increment".into(),
            comment: "primary id".into(),
        }
    }

    #[test]
    fn test_default_from_driver_values() {
        assert_eq!(
            ColumnDefault::from(mysql_async::Value::NULL),
            ColumnDefault::Absent
        );
        assert_eq!(
            ColumnDefault::from(mysql_async::Value::Bytes(b"CURRENT_TIMESTAMP".to_vec())),
            ColumnDefault::Text("CURRENT_TIMESTAMP".into())
        );
        assert_eq!(
            ColumnDefault::from(mysql_async::Value::Int(-3)),
            ColumnDefault::Text("-3".into())
        );
    }

    #[test]
    fn test_meaningful_default() {
        assert!(!ColumnDefault::Absent.is_meaningful());
        assert!(!ColumnDefault::Text(String::new()).is_meaningful());
        assert!(!ColumnDefault::Text("NULL".into()).is_meaningful());
        assert!(ColumnDefault::Text("0".into()).is_meaningful());
    }

    #[test]
    fn test_column_flags() {
        let col = id_column();
        assert!(col.is_primary_key());
        assert!(col.is_auto_increment());
        assert!(!col.is_nullable());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            id_column().to_string(),
            "Field: id, Type: int(11) unsigned, Key: PRI, Extra: auto_increment, Comment: primary id"
        );

        let col = ColumnInfo {
            field: "nickname".into(),
            db_type: "varchar(32)".into(),
            null: "YES".into(),
            key: String::new(),
            default: ColumnDefault::Text("anon".into()),
            extra: String::new(),
            comment: String::new(),
        };
        assert_eq!(
            col.to_string(),
            "Field: nickname, Type: varchar(32), Nullable, Default: anon"
        );
    }
}
