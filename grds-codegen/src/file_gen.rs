use grds::{GrdsError, Result};
use std::path::Path;

const TIME_MARKER: &str = "time.Time";
const JSON_MARKER: &str = "json.Marshal";

/// Assemble rendered models into one Go source file.
///
/// Imports are derived from the content: `encoding/json` when a model calls
/// `json.Marshal` (or `generate_to_json` is set), `time` when a field uses
/// `time.Time`.
pub fn build_file_content(package: &str, units: &[String], generate_to_json: bool) -> String {
    let need_time = units.iter().any(|u| u.contains(TIME_MARKER));
    let need_json = generate_to_json || units.iter().any(|u| u.contains(JSON_MARKER));

    let mut out = format!("package {package}\n\n");

    if need_time || need_json {
        out.push_str("import (\n");
        if need_json {
            out.push_str("\t\"encoding/json\"\n");
        }
        if need_time {
            out.push_str("\t\"time\"\n");
        }
        out.push_str(")\n\n");
    }

    for unit in units {
        out.push_str(unit);
        out.push('\n');
    }

    out
}

/// File name used for a table in per-table mode. Table names that could
/// escape the output directory are rejected.
pub fn model_file_name(table: &str) -> Result<String> {
    if table.is_empty() || table.contains(['/', '\\', '\0']) {
        return Err(GrdsError::InvalidIdentifier {
            source_name: table.to_string(),
            identifier: format!("{table}_model.go (not a plain file name)"),
        });
    }
    Ok(format!("{table}_model.go"))
}

/// Write `content` to `path`, creating the parent directory if needed.
/// Existing files are overwritten; the write is not atomic.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| GrdsError::io(parent, e))?;
        }
    }
    std::fs::write(path, content).map_err(|e| GrdsError::io(path, e))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_imports() {
        let units = vec!["type A struct {\n}\n".to_string()];
        assert_eq!(
            build_file_content("models", &units, false),
            "package models\n\ntype A struct {\n}\n\n"
        );
    }

    #[test]
    fn test_single_time_import_for_many_units() {
        let units = vec![
            "type A struct {\n\tAt time.Time\n}\n".to_string(),
            "type B struct {\n\tName string\n}\n".to_string(),
            "type C struct {\n\tAt time.Time\n}\n".to_string(),
        ];
        let content = build_file_content("models", &units, false);
        assert_eq!(content.matches("\"time\"").count(), 1);
        assert!(!content.contains("encoding/json"));
        assert!(content.starts_with("package models\n\nimport (\n\t\"time\"\n)\n\n"));
    }

    #[test]
    fn test_json_and_time_imports() {
        let units = vec!["data, err := json.Marshal(m) time.Time".to_string()];
        let content = build_file_content("dao", &units, false);
        assert!(content.starts_with(
            "package dao\n\nimport (\n\t\"encoding/json\"\n\t\"time\"\n)\n\n"
        ));
    }

    #[test]
    fn test_to_json_flag_forces_json_import() {
        let content = build_file_content("models", &[], true);
        assert_eq!(
            content,
            "package models\n\nimport (\n\t\"encoding/json\"\n)\n\n"
        );
    }

    #[test]
    fn test_model_file_name() {
        assert_eq!(model_file_name("t_users").unwrap(), "t_users_model.go");
        assert_eq!(model_file_name("..").unwrap(), ".._model.go");
    }

    #[test]
    fn test_model_file_name_rejects_paths() {
        for table in ["../etc/passwd", "a/b", "a\\b", ""] {
            let err = model_file_name(table).unwrap_err();
            assert!(matches!(err, GrdsError::InvalidIdentifier { .. }), "{table}");
        }
    }

    #[test]
    fn test_write_file_creates_dirs_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/models.go");

        write_file(&path, "first").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");

        write_file(&path, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_write_file_error_carries_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let err = write_file(&blocker.join("models.go"), "x").unwrap_err();
        assert!(matches!(err, GrdsError::Io { .. }));
        assert!(err.to_string().contains("blocker"));
    }
}
