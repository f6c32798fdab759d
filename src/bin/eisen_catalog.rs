//! Scan a directory of EisenScript/JSON example pairs and report which are
//! valid.
//!
//! Exit status: 0 when every example is valid, 1 when any is invalid, 2 when
//! the scan itself could not run (missing root, unreadable schema).

use anyhow::Result;
use clap::Parser;
use eisencat::config::{
    CatalogConfig, DEFAULT_DATA_EXTENSION, DEFAULT_SCRIPT_EXTENSION, FORMAT_ENV, ROOT_ENV,
    SCHEMA_ENV,
};
use eisencat::{ReportFormat, init_logging, run_catalog};
use std::path::PathBuf;
use std::process::ExitCode;

/// Validate paired EisenScript examples and their JSON descriptions.
#[derive(Parser, Debug)]
#[command(name = "eisen-catalog", version)]
struct Cli {
    /// Directory holding the example pairs
    #[arg(value_name = "ROOT", env = ROOT_ENV, default_value = ".")]
    root: PathBuf,

    /// Report format
    #[arg(long, value_enum, env = FORMAT_ENV, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Extension of script files
    #[arg(long, default_value = DEFAULT_SCRIPT_EXTENSION)]
    script_ext: String,

    /// Extension of description files
    #[arg(long, default_value = DEFAULT_DATA_EXTENSION)]
    data_ext: String,

    /// Description schema to use instead of the built-in one
    #[arg(long, env = SCHEMA_ENV)]
    schema: Option<PathBuf>,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("eisen-catalog: {err:#}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether every example passed.
fn run(cli: &Cli) -> Result<bool> {
    let config =
        CatalogConfig::new(&cli.root).with_extensions(&cli.script_ext, &cli.data_ext)?;
    let report = run_catalog(&config, cli.schema.as_deref())?;
    print!("{}", report.render(cli.format)?);
    Ok(report.all_valid())
}
