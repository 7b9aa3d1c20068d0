use clap::Parser;
use grds::{Catalog, ColumnInfo, GrdsError, MysqlCatalog};
use std::path::PathBuf;
use std::process;

mod config;

use config::{parse_table_list, write_init_config, ConfigFile, Discovery, DEFAULT_CONFIG_FILES};

/// Generate GORM models from a MySQL database
///
/// Settings are read from a config file (--config, else the first of
/// .grds.yaml, .grds.yml, grds.yaml, grds.yml, .grds.json, grds.json in the
/// current directory); command-line flags override file values.
#[derive(Parser, Debug)]
#[command(name = "grds-gen", version, about)]
struct Cli {
    /// Config file path (.yaml, .yml or .json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Database host
    #[arg(long)]
    host: Option<String>,

    /// Database port
    #[arg(long)]
    port: Option<u32>,

    /// Database user
    #[arg(long)]
    user: Option<String>,

    /// Database password
    #[arg(long)]
    password: Option<String>,

    /// Database name
    #[arg(long)]
    database: Option<String>,

    /// Output directory
    #[arg(long)]
    out: Option<String>,

    /// Output file name (single-file mode)
    #[arg(long)]
    file: Option<String>,

    /// Go package name
    #[arg(long)]
    package: Option<String>,

    /// Tables to generate, comma separated (e.g. --tables users,orders)
    #[arg(long)]
    tables: Option<String>,

    /// Table prefix to strip from struct names
    #[arg(long)]
    prefix: Option<String>,

    /// Write one file per table (<table>_model.go)
    #[arg(long)]
    separate: bool,

    /// json tag naming: snake_case, camelCase or original
    #[arg(long)]
    json_tag_style: Option<String>,

    /// Emit a ToJsonString method on every model
    #[arg(long)]
    to_json: bool,

    /// List all tables and exit
    #[arg(long)]
    list: bool,

    /// Show the columns of a table and exit
    #[arg(long, value_name = "TABLE")]
    columns: Option<String>,

    /// Write a starter .grds.yaml to the current directory and exit
    #[arg(long)]
    init: bool,
}

impl Cli {
    /// Layer explicitly passed flags over the file configuration.
    fn apply_overrides(&self, config: &mut ConfigFile) {
        let db = &mut config.database;
        if let Some(host) = &self.host {
            db.host = host.clone();
        }
        if let Some(port) = self.port {
            db.port = port;
        }
        if let Some(user) = &self.user {
            db.username = user.clone();
        }
        if let Some(password) = &self.password {
            db.password = password.clone();
        }
        if let Some(database) = &self.database {
            db.database = database.clone();
        }

        let gen = &mut config.generator;
        if let Some(out) = &self.out {
            gen.out_dir = out.clone();
        }
        if let Some(file) = &self.file {
            gen.out_file_name = file.clone();
        }
        if let Some(package) = &self.package {
            gen.package_name = package.clone();
        }
        if let Some(tables) = &self.tables {
            gen.tables = parse_table_list(tables);
        }
        if let Some(prefix) = &self.prefix {
            gen.table_prefix = prefix.clone();
        }
        if self.separate {
            gen.separate_file = true;
        }
        if let Some(style) = &self.json_tag_style {
            gen.json_tag_style = style.clone();
        }
        if self.to_json {
            gen.generate_to_json = true;
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("ERROR: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;

    if cli.init {
        let path = write_init_config(&cwd)?;
        println!("Config file created: {}", path.display());
        println!("Edit it, then run 'grds-gen' to generate models");
        return Ok(());
    }

    let discovery = ConfigFile::discover(cli.config.as_deref(), &cwd);
    eprint!("{}", format_load_failures(&discovery));
    let Discovery {
        config: mut file_config,
        source,
        ..
    } = discovery;
    if let Some(path) = &source {
        println!("Using config file: {}", path.display());
    } else {
        log::debug!(
            "no config file found (looked for {}), using defaults",
            DEFAULT_CONFIG_FILES.join(", ")
        );
    }
    cli.apply_overrides(&mut file_config);

    if file_config.database.database.is_empty() {
        return Err(GrdsError::Config(
            "database name is required: pass --database or set it in the config file".into(),
        )
        .into());
    }

    let gen_config = file_config.to_generator_config()?;

    if cli.list {
        let catalog = MysqlCatalog::new(gen_config.db.clone())?;
        let tables = catalog.list_tables()?;
        print!("{}", format_table_list(&gen_config.db.database, &tables));
        return Ok(());
    }

    if let Some(table) = &cli.columns {
        let catalog = MysqlCatalog::new(gen_config.db.clone())?;
        let columns = catalog.columns(table)?;
        print!("{}", format_columns(table, &columns));
        return Ok(());
    }

    println!("Generating models...");
    println!("Database: {}", gen_config.db.display_target());
    println!("Output directory: {}", gen_config.out_dir.display());
    if !gen_config.separate_file {
        println!("Output file: {}", gen_config.out_file_name);
    }
    println!("Package: {}", gen_config.package_name);
    if gen_config.tables.is_empty() {
        println!("Tables: all");
    } else {
        println!("Tables: {}", gen_config.tables.join(", "));
    }
    if !gen_config.table_prefix.is_empty() {
        println!("Table prefix: {} (stripped)", gen_config.table_prefix);
    }
    println!("{}", "-".repeat(50));

    let written = gen_config.generate()?;

    println!("Models generated: {} file(s)", written.len());
    for path in &written {
        println!("  {}", path.display());
    }
    Ok(())
}

/// One warning line per config file that could not be loaded.
fn format_load_failures(discovery: &Discovery) -> String {
    let mut out = String::new();
    for (path, e) in &discovery.failures {
        out.push_str(&format!(
            "WARNING: failed to load config file {}: {e}\n",
            path.display()
        ));
    }
    if !discovery.failures.is_empty() && discovery.source.is_none() {
        out.push_str("WARNING: falling back to default settings\n");
    }
    out
}

fn format_table_list(database: &str, tables: &[String]) -> String {
    let mut out = format!(
        "\nTables in '{database}' ({} total):\n{}\n",
        tables.len(),
        "-".repeat(50)
    );
    for (i, table) in tables.iter().enumerate() {
        out.push_str(&format!("{:>3}. {table}\n", i + 1));
    }
    out
}

fn format_columns(table: &str, columns: &[ColumnInfo]) -> String {
    let rule = "-".repeat(100);
    let mut out = format!(
        "\nColumns of '{table}' ({} total):\n{rule}\n",
        columns.len()
    );
    out.push_str(&format!(
        "{:<20} {:<20} {:<10} {:<10} {:<15} {:<20} {}\n",
        "Field", "Type", "Null", "Key", "Default", "Extra", "Comment"
    ));
    out.push_str(&rule);
    out.push('\n');
    for col in columns {
        out.push_str(&format!(
            "{:<20} {:<20} {:<10} {:<10} {:<15} {:<20} {}\n",
            col.field,
            col.db_type,
            col.null,
            col.key,
            col.default.as_text().unwrap_or("NULL"),
            col.extra,
            col.comment
        ));
    }
    out
}
