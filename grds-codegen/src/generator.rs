use grds::{Catalog, GrdsError, Result};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::file_gen::{build_file_content, model_file_name, write_file};
use crate::struct_gen::{render_model, struct_name};
use crate::GeneratorConfig;

/// Drives one generation run: catalog lookups, rendering, and file output.
pub struct Generator<'a, C: Catalog> {
    config: &'a GeneratorConfig,
    catalog: &'a C,
}

impl<'a, C: Catalog> Generator<'a, C> {
    pub fn new(config: &'a GeneratorConfig, catalog: &'a C) -> Self {
        Generator { config, catalog }
    }

    /// Generate models for the configured tables and return the written paths.
    ///
    /// A failure on any table's columns aborts the run. In per-table mode the
    /// files written before the failure stay on disk.
    pub fn generate(&self) -> Result<Vec<PathBuf>> {
        let out_dir = &self.config.out_dir;
        std::fs::create_dir_all(out_dir).map_err(|e| GrdsError::io(out_dir, e))?;

        let tables = self.resolve_tables()?;
        self.check_struct_names(&tables)?;
        log::info!("generating models for {} table(s)", tables.len());

        if self.config.separate_file {
            self.generate_separate_files(&tables)
        } else {
            self.generate_single_file(&tables)
        }
    }

    fn resolve_tables(&self) -> Result<Vec<String>> {
        if !self.config.tables.is_empty() {
            return Ok(self.config.tables.clone());
        }
        self.catalog.list_tables()
    }

    /// All models land in one Go package, so two tables mapping to the same
    /// struct name cannot both be generated.
    fn check_struct_names(&self, tables: &[String]) -> Result<()> {
        let mut seen: HashMap<String, &str> = HashMap::with_capacity(tables.len());
        for table in tables {
            let name = struct_name(table, &self.config.table_prefix)?;
            if self.config.separate_file {
                model_file_name(table)?;
            }
            if let Some(first) = seen.insert(name.clone(), table) {
                return Err(GrdsError::InvalidIdentifier {
                    source_name: format!("{first}, {table}"),
                    identifier: format!("{name} (duplicate struct)"),
                });
            }
        }
        Ok(())
    }

    fn generate_single_file(&self, tables: &[String]) -> Result<Vec<PathBuf>> {
        let mut units = Vec::with_capacity(tables.len());
        for table in tables {
            units.push(self.render_table(table)?);
        }

        let path = self.config.out_dir.join(&self.config.out_file_name);
        let content = build_file_content(
            &self.config.package_name,
            &units,
            self.config.generate_to_json,
        );
        write_file(&path, &content)?;
        Ok(vec![path])
    }

    fn generate_separate_files(&self, tables: &[String]) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(tables.len());
        for table in tables {
            let unit = self.render_table(table)?;
            let path = self.config.out_dir.join(model_file_name(table)?);
            let content = build_file_content(
                &self.config.package_name,
                std::slice::from_ref(&unit),
                self.config.generate_to_json,
            );
            write_file(&path, &content)?;
            written.push(path);
        }
        Ok(written)
    }

    fn render_table(&self, table: &str) -> Result<String> {
        log::debug!("introspecting table {table}");
        let columns = self.catalog.columns(table)?;
        for col in &columns {
            log::trace!("{table}: {col}");
        }

        let comment = match self.catalog.table_comment(table) {
            Ok(comment) => comment,
            Err(e) => {
                log::warn!("could not read comment for table {table}, continuing without: {e}");
                String::new()
            }
        };

        render_model(table, &comment, &columns, self.config)
    }
}
