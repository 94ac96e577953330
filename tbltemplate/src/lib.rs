//! Library module for the tbltemplate binary.
//!
//! Exposes the CLI definition, settings merging and the run pipeline so
//! they can be tested without a terminal. The entry point is in main.rs.

use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;
use tbltemplate_core::{
    Catalog, ConnectionConfig, OutputFormat, Result, SchemaResolver, TableTemplate,
    TemplateConfig, TemplateDocument, TemplateError,
};
use tracing::info;

/// Schema used when neither the CLI nor the config file names one
pub const DEFAULT_SCHEMA: &str = "public";

#[derive(Parser, Debug)]
#[command(name = "tbltemplate")]
#[command(about = "Create spreadsheet templates matching database tables")]
#[command(version)]
#[command(long_about = "
tbltemplate - spreadsheet templates from database tables

Creates a spreadsheet with one sheet per table of a PostgreSQL schema.
Each sheet holds a single header row with the table's column names,
ready for data entry.

The password is always prompted for and never accepted as an option.

TABLE SELECTION:
  Without --tables every table in the schema is used. Entries in --tables
  are exact table names or patterns with '*' (e.g. x_* or *lab*), matched
  case-insensitively. Names that do not exist are skipped.

EXAMPLES:
  tbltemplate -H env3 -d lab -s staging -u cgrant templates.ods
  tbltemplate -d lab -t 'e_*,x_*' -x rev_user,rev_time templates.xlsx
  tbltemplate --config tbltemplate.toml templates.ods
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Output spreadsheet path
    #[arg(value_name = "OUTPUT_FILE", help = "Spreadsheet to create (.ods or .xlsx)")]
    pub output_file: PathBuf,

    /// Server host name
    #[arg(short = 'H', long, env = "PGHOST", help = "Server hostname [default: localhost]")]
    pub host: Option<String>,

    /// Server port
    #[arg(short, long, env = "PGPORT", help = "Server port [default: 5432]")]
    pub port: Option<u16>,

    /// Database name
    #[arg(short, long, env = "PGDATABASE", help = "Database name")]
    pub database: Option<String>,

    /// Database schema
    #[arg(
        short,
        long,
        env = "TBLTEMPLATE_SCHEMA",
        help = "Database schema [default: public]"
    )]
    pub schema: Option<String>,

    /// Database username
    #[arg(short, long, env = "PGUSER", help = "Database username")]
    pub username: Option<String>,

    /// Tables to include
    #[arg(
        short,
        long,
        value_name = "LIST",
        help = "Comma-separated tables or patterns (e.g. x_*,*lab*); all tables when omitted"
    )]
    pub tables: Option<String>,

    /// Columns to leave out
    #[arg(
        short = 'x',
        long,
        value_name = "LIST",
        help = "Comma-separated column names to leave out of every template"
    )]
    pub exclude_columns: Option<String>,

    /// Leave out serial and identity columns
    #[arg(
        long,
        overrides_with = "no_exclude_serial",
        help = "Leave out serial/bigserial and identity columns"
    )]
    pub exclude_serial: bool,

    /// Keep serial and identity columns even if the config file drops them
    #[arg(
        long,
        overrides_with = "exclude_serial",
        help = "Keep serial/bigserial and identity columns (overrides the config file)"
    )]
    pub no_exclude_serial: bool,

    /// Output format
    #[arg(
        short,
        long,
        value_enum,
        help = "Output format [default: from the file extension, else ods]"
    )]
    pub format: Option<FormatArg>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", help = "TOML configuration file")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all output except errors")]
    pub quiet: bool,
}

/// Output format as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// OpenDocument Spreadsheet
    Ods,
    /// Office Open XML workbook
    Xlsx,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Ods => Self::Ods,
            FormatArg::Xlsx => Self::Xlsx,
        }
    }
}

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub connection: ConnectionConfig,
    pub schema: String,
    pub tables: Option<String>,
    pub exclude_columns: Option<String>,
    pub exclude_serial: bool,
    pub output: PathBuf,
    pub format: OutputFormat,
}

impl Settings {
    /// Builds settings from the CLI, reading `--config` when given.
    ///
    /// # Errors
    /// Configuration file errors, or an invalid merged configuration.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => TemplateConfig::load(path)?,
            None => TemplateConfig::default(),
        };
        Self::merge(cli, file)
    }

    /// Merges CLI values over `file` over built-in defaults.
    ///
    /// # Errors
    /// Returns `TemplateError::Configuration` for an empty schema or an
    /// invalid connection target.
    pub fn merge(cli: &Cli, file: TemplateConfig) -> Result<Self> {
        let TemplateConfig {
            connection: file_conn,
            template: file_template,
        } = file;

        let mut connection = ConnectionConfig::default();
        if let Some(host) = cli.host.clone().or(file_conn.host) {
            connection.host = host;
        }
        if let Some(port) = cli.port.or(file_conn.port) {
            connection.port = port;
        }
        connection.database = cli.database.clone().or(file_conn.database);
        connection.username = cli.username.clone().or(file_conn.username);
        connection.validate()?;

        let schema = cli
            .schema
            .clone()
            .or(file_template.schema)
            .unwrap_or_else(|| DEFAULT_SCHEMA.to_string());
        if schema.trim().is_empty() {
            return Err(TemplateError::configuration("schema cannot be empty"));
        }

        let format = cli
            .format
            .map(OutputFormat::from)
            .or(file_template.format)
            .unwrap_or_else(|| OutputFormat::from_path(&cli.output_file));

        Ok(Self {
            connection,
            schema,
            tables: cli.tables.clone().or(file_template.tables),
            exclude_columns: cli.exclude_columns.clone().or(file_template.exclude_columns),
            exclude_serial: match (cli.exclude_serial, cli.no_exclude_serial) {
                (true, _) => true,
                (false, true) => false,
                (false, false) => file_template.exclude_serial.unwrap_or(false),
            },
            output: cli.output_file.clone(),
            format,
        })
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub format: OutputFormat,
    /// False when no table resolved and the file was not created
    pub written: bool,
    pub templates: Vec<TableTemplate>,
}

impl RunSummary {
    /// Number of sheets written.
    pub fn sheet_count(&self) -> usize {
        self.templates.len()
    }

    /// Total header cells across all sheets.
    pub fn column_count(&self) -> usize {
        self.templates.iter().map(TableTemplate::column_count).sum()
    }
}

/// Runs the pipeline against PostgreSQL, asking `credentials` for the password.
///
/// # Errors
/// Connection, query, credential and write failures, unchanged.
#[cfg(feature = "postgresql")]
pub async fn run(
    settings: &Settings,
    credentials: impl tbltemplate_core::security::CredentialProvider + 'static,
) -> Result<RunSummary> {
    use tbltemplate_core::{ConnectionManager, PgCatalog};

    info!("Target: {}", settings.connection);
    let manager = ConnectionManager::new(settings.connection.clone(), credentials);
    run_with_catalog(settings, PgCatalog::new(manager)).await
}

/// Resolves templates through `catalog` and writes the output document.
///
/// The catalog is closed whether or not generation succeeds. When nothing
/// resolves, no file is written and the summary reports zero sheets.
///
/// # Errors
/// Catalog and write failures, unchanged. A generation error takes
/// precedence over a failure to close the catalog.
pub async fn run_with_catalog<C: Catalog>(
    settings: &Settings,
    catalog: C,
) -> Result<RunSummary> {
    info!("Schema: {}", settings.schema);
    info!("Output: {} ({})", settings.output.display(), settings.format);

    let mut resolver = SchemaResolver::new(catalog, settings.schema.as_str())
        .with_exclude_serial(settings.exclude_serial);
    let generated = generate(settings, &mut resolver).await;
    let closed = resolver.into_catalog().close().await;

    let templates = generated?;
    closed?;

    Ok(RunSummary {
        output: settings.output.clone(),
        format: settings.format,
        written: !templates.is_empty(),
        templates,
    })
}

async fn generate<C: Catalog>(
    settings: &Settings,
    resolver: &mut SchemaResolver<C>,
) -> Result<Vec<TableTemplate>> {
    let templates = resolver
        .build_templates(
            settings.tables.as_deref(),
            settings.exclude_columns.as_deref(),
        )
        .await?;

    let mut document = TemplateDocument::create(&settings.output, settings.format);
    document.add_templates(&templates)?;
    let empty = document.is_empty();
    document.save_and_close()?;
    if !empty {
        info!("✓ Templates saved to {}", settings.output.display());
    }

    Ok(templates)
}

/// Human-readable summary printed after a successful run.
pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
    vec![
        "Template generation completed successfully".to_string(),
        if summary.written {
            format!("Output: {}", summary.output.display())
        } else {
            format!(
                "Output: none, no tables matched ({} not created)",
                summary.output.display()
            )
        },
        format!("Format: {}", summary.format),
        format!("Sheets: {}", summary.sheet_count()),
        format!("Columns: {}", summary.column_count()),
    ]
}
