use grds::{ColumnInfo, GrdsError, Result};
use std::collections::HashSet;
use std::fmt::Write;

use crate::tag_gen::{build_tags, flatten_line};
use crate::type_utils::{is_exported_identifier, to_upper_camel};
use crate::GeneratorConfig;

/// One field of a generated struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: String,
    pub ty: String,
    pub column: String,
    pub comment: String,
    pub tags: String,
}

impl FieldInfo {
    pub fn from_column(col: &ColumnInfo, config: &GeneratorConfig) -> Result<Self> {
        Ok(FieldInfo {
            name: identifier_for(&col.field)?,
            ty: config.type_mapping.resolve(&col.db_type),
            column: col.field.clone(),
            comment: flatten_line(&col.comment),
            tags: build_tags(col, &config.tag_options()),
        })
    }
}

/// Struct name for a table: the configured prefix is stripped, then the rest
/// is converted to upper camel case.
/// e.g. ("t_user_roles", "t_") -> "UserRoles"
pub fn struct_name(table: &str, prefix: &str) -> Result<String> {
    let stripped = if prefix.is_empty() {
        table
    } else {
        table.strip_prefix(prefix).unwrap_or(table)
    };
    let name = to_upper_camel(stripped);
    if !is_exported_identifier(&name) {
        return Err(GrdsError::InvalidIdentifier {
            source_name: table.to_string(),
            identifier: name,
        });
    }
    Ok(name)
}

fn identifier_for(column: &str) -> Result<String> {
    let name = to_upper_camel(column);
    if !is_exported_identifier(&name) {
        return Err(GrdsError::InvalidIdentifier {
            source_name: column.to_string(),
            identifier: name,
        });
    }
    Ok(name)
}

/// Render the model for one table: the struct, its `TableName` method and,
/// when enabled, a `ToJsonString` helper.
pub fn render_model(
    table: &str,
    table_comment: &str,
    columns: &[ColumnInfo],
    config: &GeneratorConfig,
) -> Result<String> {
    let name = struct_name(table, &config.table_prefix)?;
    let fields = columns
        .iter()
        .map(|col| FieldInfo::from_column(col, config))
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::with_capacity(fields.len());
    for field in &fields {
        if !seen.insert(field.name.as_str()) {
            return Err(GrdsError::InvalidIdentifier {
                source_name: format!("{table}.{}", field.column),
                identifier: format!("{} (duplicate field)", field.name),
            });
        }
    }

    let mut out = String::new();
    let table_comment = flatten_line(table_comment);
    if table_comment.is_empty() {
        let _ = writeln!(out, "// {name}");
    } else {
        let _ = writeln!(out, "// {name} {table_comment}");
    }

    let _ = writeln!(out, "type {name} struct {{");
    for field in &fields {
        let _ = write!(out, "\t{} {}", field.name, field.ty);
        if !field.tags.is_empty() {
            let _ = write!(out, " {}", field.tags);
        }
        if !field.comment.is_empty() {
            let _ = write!(out, " // {}", field.comment);
        }
        out.push('\n');
    }
    out.push_str("}\n\n");

    let _ = writeln!(out, "// TableName returns the table name");
    let _ = writeln!(out, "func ({name}) TableName() string {{");
    let _ = writeln!(out, "\treturn {}", go_string_literal(table));
    out.push_str("}\n");

    if config.generate_to_json {
        out.push('\n');
        let _ = writeln!(out, "// ToJsonString returns the JSON encoding of the model");
        let _ = writeln!(out, "func (m *{name}) ToJsonString() (string, error) {{");
        out.push_str("\tdata, err := json.Marshal(m)\n");
        out.push_str("\tif err != nil {\n");
        out.push_str("\t\treturn \"\", err\n");
        out.push_str("\t}\n");
        out.push_str("\treturn string(data), nil\n");
        out.push_str("}\n");
    }

    Ok(out)
}

fn go_string_literal(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
