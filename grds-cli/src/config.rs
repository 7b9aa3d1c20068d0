use grds::{DbConfig, GrdsError, Result};
use grds_codegen::{GeneratorConfig, JsonTagStyle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Config files looked for in the working directory, in priority order.
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    ".grds.yaml",
    ".grds.yml",
    "grds.yaml",
    "grds.yml",
    ".grds.json",
    "grds.json",
];

/// Name of the file written by `--init`.
pub const INIT_CONFIG_FILE: &str = ".grds.yaml";

/// On-disk configuration: a `database` and a `generator` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub database: DbConfig,
    pub generator: GeneratorSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSection {
    pub out_dir: String,
    #[serde(rename = "out_file")]
    pub out_file_name: String,
    pub package_name: String,
    pub tables: Vec<String>,
    pub table_prefix: String,
    pub separate_file: bool,
    pub type_mapping: BTreeMap<String, String>,
    pub enable_json_tag: bool,
    pub enable_gorm_tag: bool,
    pub json_tag_style: String,
    pub generate_to_json: bool,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        GeneratorSection {
            out_dir: "./models".to_string(),
            out_file_name: "models.go".to_string(),
            package_name: "models".to_string(),
            tables: Vec::new(),
            table_prefix: String::new(),
            separate_file: false,
            type_mapping: BTreeMap::new(),
            enable_json_tag: true,
            enable_gorm_tag: true,
            json_tag_style: "snake_case".to_string(),
            generate_to_json: false,
        }
    }
}

impl ConfigFile {
    /// Parse a config file. `.yaml`/`.yml` and `.json` are parsed by extension;
    /// anything else is tried as YAML, then as JSON.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "yaml" | "yml" => Ok(serde_yaml::from_str(content)?),
            "json" => Ok(serde_json::from_str(content)?),
            _ => match serde_yaml::from_str(content) {
                Ok(config) => Ok(config),
                Err(_) => Ok(serde_json::from_str(content)?),
            },
        }
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GrdsError::io(path, e))?;
        Self::parse(path, &content)
    }

    /// Resolve the configuration: an explicit path if given, else the first
    /// default file in `dir` that loads. Files that fail to load are skipped
    /// and recorded in [`Discovery::failures`].
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Discovery {
        let mut discovery = Discovery::default();

        if let Some(path) = explicit {
            match Self::load_file(path) {
                Ok(config) => {
                    discovery.config = config;
                    discovery.source = Some(path.to_path_buf());
                }
                Err(e) => discovery.failures.push((path.to_path_buf(), e)),
            }
            return discovery;
        }

        for name in DEFAULT_CONFIG_FILES {
            let path = dir.join(name);
            if !path.is_file() {
                continue;
            }
            match Self::load_file(&path) {
                Ok(config) => {
                    discovery.config = config;
                    discovery.source = Some(path);
                    return discovery;
                }
                Err(e) => discovery.failures.push((path, e)),
            }
        }

        discovery
    }

    /// Turn the merged configuration into a generator configuration.
    pub fn to_generator_config(&self) -> Result<GeneratorConfig> {
        let g = &self.generator;
        let style: JsonTagStyle = g.json_tag_style.parse()?;
        Ok(GeneratorConfig::new(self.database.clone())
            .with_out_dir(&g.out_dir)
            .with_out_file_name(&g.out_file_name)
            .with_package_name(&g.package_name)
            .with_tables(g.tables.iter().cloned())
            .with_table_prefix(&g.table_prefix)
            .with_separate_file(g.separate_file)
            .with_type_mapping(g.type_mapping.clone())
            .with_enable_json_tag(g.enable_json_tag)
            .with_enable_gorm_tag(g.enable_gorm_tag)
            .with_json_tag_style(style)
            .with_generate_to_json(g.generate_to_json))
    }
}

/// Outcome of [`ConfigFile::discover`].
#[derive(Debug, Default)]
pub struct Discovery {
    pub config: ConfigFile,
    /// The file `config` was loaded from; `None` means defaults.
    pub source: Option<PathBuf>,
    /// Files that exist but could not be loaded, in the order tried.
    pub failures: Vec<(PathBuf, GrdsError)>,
}

/// Split a comma-separated table list, trimming blanks.
pub fn parse_table_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Template written by `--init`.
pub const INIT_TEMPLATE: &str = r#"# grds model generator configuration
# Run 'grds-gen' to generate models.

database:
  host: 127.0.0.1
  port: 3306
  username: root
  password: your_password
  database: your_database
  # charset: utf8mb4
  # collation: utf8mb4_general_ci
  # connect timeout in seconds
  # timeout_secs: 10

generator:
  # output directory
  out_dir: ./models
  # output file name (used when separate_file is false)
  out_file: models.go
  # Go package name
  package_name: models
  # tables to generate (empty means all tables)
  tables: []
  # table prefix, stripped from struct names
  table_prefix: ""
  # true: one file per table, named <table>_model.go
  # false: all tables in out_file
  separate_file: true

  # custom type mapping (optional), e.g.
  # type_mapping:
  #   datetime: time.Time
  #   decimal: decimal.Decimal
  type_mapping: {}

  # emit json tags (default: true)
  enable_json_tag: true
  # emit gorm tags (default: true)
  enable_gorm_tag: true
  # json tag naming: snake_case, camelCase, original (default: snake_case)
  json_tag_style: snake_case
  # emit a ToJsonString() method on every model (default: false)
  generate_to_json: false
"#;

/// Write [`INIT_TEMPLATE`] to `dir`, overwriting any existing file.
pub fn write_init_config(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(INIT_CONFIG_FILE);
    std::fs::write(&path, INIT_TEMPLATE).map_err(|e| GrdsError::io(&path, e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.database.host, "127.0.0.1");
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.database.username, "root");
        assert_eq!(config.generator.out_dir, "./models");
        assert_eq!(config.generator.out_file_name, "models.go");
        assert!(config.generator.enable_gorm_tag);
    }

    #[test]
    fn test_parse_yaml_partial() {
        let yaml = "database:\n  database: shop\ngenerator:\n  table_prefix: t_\n  separate_file: true\n";
        let config = ConfigFile::parse(Path::new("grds.yaml"), yaml).unwrap();
        assert_eq!(config.database.database, "shop");
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.generator.table_prefix, "t_");
        assert!(config.generator.separate_file);
        assert_eq!(config.generator.package_name, "models");
        assert!(config.generator.enable_json_tag);
    }

    #[test]
    fn test_parse_json_and_unknown_extension() {
        let json = r#"{"database": {"database": "shop"}, "generator": {"out_file": "all.go"}}"#;
        let config = ConfigFile::parse(Path::new(".grds.json"), json).unwrap();
        assert_eq!(config.generator.out_file_name, "all.go");

        let config = ConfigFile::parse(Path::new("grds.conf"), json).unwrap();
        assert_eq!(config.database.database, "shop");
    }

    #[test]
    fn test_init_template_parses() {
        let config = ConfigFile::parse(Path::new(INIT_CONFIG_FILE), INIT_TEMPLATE).unwrap();
        assert_eq!(config.database.database, "your_database");
        assert!(config.generator.separate_file);
        assert!(config.to_generator_config().is_ok());
    }

    #[test]
    fn test_discover_search_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("grds.json"), r#"{"database":{"database":"from_json"}}"#)
            .unwrap();
        std::fs::write(dir.path().join("grds.yml"), "database:\n  database: from_yml\n").unwrap();

        let found = ConfigFile::discover(None, dir.path());
        assert_eq!(found.config.database.database, "from_yml");
        assert_eq!(found.source, Some(dir.path().join("grds.yml")));
        assert!(found.failures.is_empty());
    }

    #[test]
    fn test_discover_skips_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".grds.yaml"), "database: [not, a, map").unwrap();
        std::fs::write(dir.path().join("grds.yaml"), "database:\n  database: fallback\n").unwrap();

        let found = ConfigFile::discover(None, dir.path());
        assert_eq!(found.config.database.database, "fallback");
        assert_eq!(found.source, Some(dir.path().join("grds.yaml")));
        assert_eq!(found.failures.len(), 1);
        assert_eq!(found.failures[0].0, dir.path().join(".grds.yaml"));
        assert!(matches!(found.failures[0].1, GrdsError::Yaml(_)));
    }

    #[test]
    fn test_discover_without_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let found = ConfigFile::discover(None, dir.path());
        assert_eq!(found.config, ConfigFile::default());
        assert!(found.source.is_none());
        assert!(found.failures.is_empty());
    }

    #[test]
    fn test_discover_explicit_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        let found = ConfigFile::discover(Some(&missing), dir.path());
        assert_eq!(found.config, ConfigFile::default());
        assert!(found.source.is_none());
        assert_eq!(found.failures.len(), 1);
        assert!(matches!(found.failures[0].1, GrdsError::Io { .. }));
    }

    #[test]
    fn test_discover_explicit_broken_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.yaml");
        std::fs::write(&bad, "database: [broken").unwrap();
        // A valid default file must not be used in place of an explicit one.
        std::fs::write(dir.path().join(".grds.yaml"), "database:\n  database: shop\n").unwrap();

        let found = ConfigFile::discover(Some(&bad), dir.path());
        assert!(found.source.is_none());
        assert_eq!(found.config, ConfigFile::default());
        assert_eq!(found.failures.len(), 1);
        assert_eq!(found.failures[0].0, bad);
        assert!(matches!(found.failures[0].1, GrdsError::Yaml(_)));
    }

    #[test]
    fn test_to_generator_config() {
        let mut config = ConfigFile::default();
        config.generator.json_tag_style = "camelCase".into();
        config
            .generator
            .type_mapping
            .insert("decimal".into(), "decimal.Decimal".into());

        let gen = config.to_generator_config().unwrap();
        assert_eq!(gen.json_tag_style, JsonTagStyle::CamelCase);
        assert_eq!(gen.type_mapping.resolve("decimal(10,2)"), "decimal.Decimal");
        assert_eq!(gen.type_mapping.resolve("bigint"), "int64");
    }

    #[test]
    fn test_bad_json_tag_style() {
        let mut config = ConfigFile::default();
        config.generator.json_tag_style = "PascalCase".into();
        assert!(config.to_generator_config().is_err());
    }

    #[test]
    fn test_parse_table_list() {
        assert_eq!(
            parse_table_list(" users, orders ,,tags"),
            vec!["users", "orders", "tags"]
        );
        assert!(parse_table_list("").is_empty());
    }

    #[test]
    fn test_write_init_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_init_config(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(".grds.yaml"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), INIT_TEMPLATE);
    }
}
