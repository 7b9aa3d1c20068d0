//! grds code generation - generates GORM model structs from a live MySQL schema.
//!
//! The main entry point is [`GeneratorConfig::generate`], which introspects the
//! configured database and writes Go source files with one struct per table.
//! [`Generator`] runs the same pipeline against any [`grds::Catalog`].

mod file_gen;
mod generator;
mod struct_gen;
pub mod tag_gen;
pub mod type_utils;

pub use file_gen::{build_file_content, model_file_name, write_file};
pub use generator::Generator;
pub use struct_gen::{render_model, struct_name, FieldInfo};
pub use tag_gen::{build_tags, JsonTagStyle, TagOptions};
pub use type_utils::TypeMapping;

use grds::{DbConfig, MysqlCatalog, Result};
use std::path::PathBuf;

/// Everything one generation run needs. Read-only while generating.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub db: DbConfig,

    /// Output directory, created if missing.
    pub out_dir: PathBuf,
    /// File name used when all models go to a single file.
    pub out_file_name: String,
    pub package_name: String,
    /// Tables to generate; empty means every table in the database.
    pub tables: Vec<String>,
    /// Stripped from table names before deriving struct names.
    pub table_prefix: String,
    /// One `<table>_model.go` per table instead of a single file.
    pub separate_file: bool,

    pub type_mapping: TypeMapping,

    pub enable_json_tag: bool,
    pub enable_gorm_tag: bool,
    pub json_tag_style: JsonTagStyle,
    /// Emit a `ToJsonString` method on every model.
    pub generate_to_json: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            db: DbConfig::default(),
            out_dir: PathBuf::from("./models"),
            out_file_name: "models.go".to_string(),
            package_name: "models".to_string(),
            tables: Vec::new(),
            table_prefix: String::new(),
            separate_file: false,
            type_mapping: TypeMapping::default(),
            enable_json_tag: true,
            enable_gorm_tag: true,
            json_tag_style: JsonTagStyle::SnakeCase,
            generate_to_json: false,
        }
    }
}

impl GeneratorConfig {
    pub fn new(db: DbConfig) -> Self {
        GeneratorConfig {
            db,
            ..GeneratorConfig::default()
        }
    }

    pub fn tag_options(&self) -> TagOptions {
        TagOptions {
            gorm: self.enable_gorm_tag,
            json: self.enable_json_tag,
            json_style: self.json_tag_style,
        }
    }

    /// Connect to the configured database and generate all models.
    /// Returns the paths of the files written.
    pub fn generate(&self) -> Result<Vec<PathBuf>> {
        let catalog = MysqlCatalog::new(self.db.clone())?;
        Generator::new(self, &catalog).generate()
    }

    pub fn with_db(mut self, db: DbConfig) -> Self {
        self.db = db;
        self
    }

    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    pub fn with_out_file_name(mut self, name: impl Into<String>) -> Self {
        self.out_file_name = name.into();
        self
    }

    pub fn with_package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = name.into();
        self
    }

    pub fn with_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables = tables.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    pub fn with_separate_file(mut self, separate: bool) -> Self {
        self.separate_file = separate;
        self
    }

    /// Overlay custom type mappings on the current ones.
    pub fn with_type_mapping<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.type_mapping.extend(overrides);
        self
    }

    pub fn with_json_tag_style(mut self, style: JsonTagStyle) -> Self {
        self.json_tag_style = style;
        self
    }

    pub fn with_enable_json_tag(mut self, enable: bool) -> Self {
        self.enable_json_tag = enable;
        self
    }

    pub fn with_enable_gorm_tag(mut self, enable: bool) -> Self {
        self.enable_gorm_tag = enable;
        self
    }

    pub fn with_generate_to_json(mut self, enable: bool) -> Self {
        self.generate_to_json = enable;
        self
    }
}

/// Generate models for every table of `db` into `out_dir` with default settings.
pub fn generate_models(db: DbConfig, out_dir: impl Into<PathBuf>) -> Result<Vec<PathBuf>> {
    GeneratorConfig::new(db).with_out_dir(out_dir).generate()
}

/// Like [`generate_models`], restricted to `tables`.
pub fn generate_models_for_tables<I, S>(
    db: DbConfig,
    out_dir: impl Into<PathBuf>,
    tables: I,
) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    GeneratorConfig::new(db)
        .with_out_dir(out_dir)
        .with_tables(tables)
        .generate()
}
