//! tabula CLI - evaluate sheets from CSV files and scripts

mod script;

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tabula::{CsvContents, CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter, Sheet};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tabula")]
#[command(author, version, about = "Spreadsheet evaluation tool")]
struct Cli {
    /// Log edits and evaluations to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a CSV of raw cell inputs and write the computed values
    Eval {
        /// Input CSV file
        input: PathBuf,

        /// Output CSV file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write cell texts instead of values
        #[arg(long)]
        texts: bool,

        /// Field delimiter (default: comma)
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },

    /// Execute a script of sheet commands
    Run {
        /// Script file
        script: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Eval {
            input,
            output,
            texts,
            delimiter,
        } => eval(&input, output.as_deref(), texts, delimiter),
        Commands::Run { script } => run_script(&script),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn eval(input: &Path, output: Option<&Path>, texts: bool, delimiter: char) -> Result<()> {
    ensure!(
        delimiter.is_ascii(),
        "delimiter must be a single ASCII character, got {:?}",
        delimiter
    );
    let delimiter = delimiter as u8;

    let read_options = CsvReadOptions {
        delimiter,
        ..Default::default()
    };
    let sheet = CsvReader::read_file(input, &read_options)
        .with_context(|| format!("Failed to load '{}'", input.display()))?;

    let write_options = CsvWriteOptions {
        delimiter,
        contents: if texts {
            CsvContents::Texts
        } else {
            CsvContents::Values
        },
        ..Default::default()
    };

    match output {
        Some(path) => CsvWriter::write_file(&sheet, path, &write_options)
            .with_context(|| format!("Failed to write '{}'", path.display()))?,
        None => CsvWriter::write(&sheet, io::stdout().lock(), &write_options)
            .context("Failed to write to stdout")?,
    }

    Ok(())
}

fn run_script(path: &Path) -> Result<()> {
    let file =
        File::open(path).with_context(|| format!("Failed to open '{}'", path.display()))?;

    let mut sheet = Sheet::new();
    let failures = script::run(
        &mut sheet,
        BufReader::new(file),
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )?;

    if failures > 0 {
        eprintln!("{} line(s) failed", failures);
    }
    Ok(())
}
