use grds::{ColumnInfo, GrdsError};
use std::fmt;
use std::str::FromStr;

use crate::type_utils::to_lower_camel;

/// Naming style for the `json` tag.
///
/// `SnakeCase` and `Original` produce identical output: the column name is
/// passed through as-is in both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonTagStyle {
    #[default]
    SnakeCase,
    CamelCase,
    Original,
}

impl JsonTagStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonTagStyle::SnakeCase => "snake_case",
            JsonTagStyle::CamelCase => "camelCase",
            JsonTagStyle::Original => "original",
        }
    }

    pub fn format(&self, column: &str) -> String {
        match self {
            JsonTagStyle::CamelCase => to_lower_camel(column),
            JsonTagStyle::SnakeCase | JsonTagStyle::Original => column.to_string(),
        }
    }
}

impl fmt::Display for JsonTagStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JsonTagStyle {
    type Err = GrdsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "snake_case" | "" => Ok(JsonTagStyle::SnakeCase),
            "camelCase" => Ok(JsonTagStyle::CamelCase),
            "original" => Ok(JsonTagStyle::Original),
            other => Err(GrdsError::Config(format!(
                "unknown json tag style `{other}` (expected snake_case, camelCase or original)"
            ))),
        }
    }
}

/// Which tag categories to emit, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagOptions {
    pub gorm: bool,
    pub json: bool,
    pub json_style: JsonTagStyle,
}

impl Default for TagOptions {
    fn default() -> Self {
        TagOptions {
            gorm: true,
            json: true,
            json_style: JsonTagStyle::SnakeCase,
        }
    }
}

/// Build the struct tag for a column, back-ticks included.
/// Returns an empty string when no tag category is enabled.
pub fn build_tags(col: &ColumnInfo, options: &TagOptions) -> String {
    let mut tags = Vec::new();

    if options.gorm {
        tags.push(format!("gorm:\"{}\"", escape_tag_value(&gorm_clauses(col).join(";"))));
    }

    if options.json {
        tags.push(format!(
            "json:\"{}\"",
            escape_tag_value(&options.json_style.format(&col.field))
        ));
    }

    if tags.is_empty() {
        return String::new();
    }

    format!("`{}`", tags.join(" "))
}

/// gorm clauses in emission order.
pub fn gorm_clauses(col: &ColumnInfo) -> Vec<String> {
    let mut clauses = vec![
        format!("column:{}", col.field),
        format!("type:{}", col.db_type),
    ];

    if col.is_primary_key() {
        clauses.push("primaryKey".to_string());
    }
    if col.is_auto_increment() {
        clauses.push("autoIncrement".to_string());
    }
    if col.null == "NO" {
        clauses.push("not null".to_string());
    }
    if col.default.is_meaningful() {
        if let Some(default) = col.default.as_text() {
            clauses.push(format!("default:{default}"));
        }
    }
    if !col.comment.is_empty() {
        clauses.push(format!("comment:{}", flatten_line(&col.comment)));
    }

    clauses
}

/// Keep a value inside a Go raw-string struct tag: quotes are escaped and
/// back-ticks, which would end the raw string, become single quotes.
fn escape_tag_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('`', "'")
}

/// Collapse line breaks so a value fits on one source line.
pub(crate) fn flatten_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
