//! Translate EisenScript into EisenXML (for the Sverchok node) or into the
//! JSON description that pairs with the script in a catalog.
//!
//! A directory input translates every script beneath it; failures are
//! reported per file and the run exits 1 if any file failed.

use anyhow::{Context, Result, bail};
use clap::Parser;
use eisencat::config::DEFAULT_SCRIPT_EXTENSION;
use eisencat::translate::{collect_scripts, mirrored_out_dir, translate_file, translate_source};
use eisencat::{OutputFormat, init_logging};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Translate EisenScript files.
#[derive(Parser, Debug)]
#[command(name = "eisen-translate", version)]
struct Cli {
    /// Script file, or a directory to translate recursively
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Xml)]
    format: OutputFormat,

    /// Write outputs here instead of next to each script; a directory
    /// INPUT keeps its layout under DIR
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Print the translation instead of writing a file (single file only)
    #[arg(long, conflicts_with = "out_dir")]
    stdout: bool,

    /// Extension of script files when INPUT is a directory
    #[arg(long, default_value = DEFAULT_SCRIPT_EXTENSION)]
    script_ext: String,

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
            eprintln!("eisen-translate: {err:#}");
            ExitCode::from(1)
        }
    }
}

/// Returns whether every input translated.
fn run(cli: &Cli) -> Result<bool> {
    if cli.input.is_dir() {
        if cli.stdout {
            bail!("--stdout needs a single script, not a directory");
        }
        return translate_tree(cli);
    }

    if cli.stdout {
        let source = fs::read_to_string(&cli.input)
            .with_context(|| format!("reading {}", cli.input.display()))?;
        let title = cli.input.file_stem().and_then(|stem| stem.to_str());
        let rendered = translate_source(&source, title, cli.format)
            .with_context(|| format!("translating {}", cli.input.display()))?;
        print!("{rendered}");
        return Ok(true);
    }

    let output = translate_file(&cli.input, cli.out_dir.as_deref(), cli.format)?;
    println!("{}", output.display());
    Ok(true)
}

fn translate_tree(cli: &Cli) -> Result<bool> {
    let extension = cli.script_ext.trim_start_matches('.');
    let scripts = collect_scripts(&cli.input, extension)?;
    let mut failed = 0usize;
    for script in &scripts {
        let out_dir = cli
            .out_dir
            .as_deref()
            .map(|dir| mirrored_out_dir(&cli.input, script, dir));
        match translate_file(script, out_dir.as_deref(), cli.format) {
            Ok(output) => println!("{}", output.display()),
            Err(err) => {
                failed += 1;
                eprintln!("failed: {err:#}");
            }
        }
    }
    log::info!(
        "translated {} of {} script(s)",
        scripts.len() - failed,
        scripts.len()
    );
    Ok(failed == 0)
}
