//! tabproc CLI
//!
//! Command-line tool for viewing DSV tables and running transformation pipelines.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tabproc_core::catalog::{self, CatalogEntry};
use tabproc_core::{read_table, DsvOptions, PipelineFile, ProcessStatus, Table};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "tabproc")]
#[command(about = "Delimiter-separated table processor", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display a DSV file
    Show {
        /// Path to the DSV file
        file: PathBuf,

        /// Field separator
        #[arg(short, long, default_value = "\t")]
        separator: String,

        /// Treat the first row as a header
        #[arg(long)]
        header: bool,

        /// Text encoding label
        #[arg(short, long, default_value = "utf-8")]
        encoding: String,

        /// Maximum number of data rows to display
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a pipeline file
    Run {
        /// Path to pipeline file (JSON)
        pipeline: PathBuf,

        /// Output path, overriding the pipeline's output
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a pipeline file without reading any table data
    Validate {
        /// Path to pipeline file (JSON)
        pipeline: PathBuf,
    },

    /// List the available operations, conditions and conversions
    Catalog,

    /// Create a pipeline file template
    CreatePipeline {
        /// Output path for the pipeline file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Show {
            file,
            separator,
            header,
            encoding,
            limit,
            json,
        } => {
            let options = DsvOptions {
                separator,
                has_header: header,
                encoding,
            };
            cmd_show(&file, &options, limit, json)
        }
        Commands::Run { pipeline, output } => cmd_run(&pipeline, output.as_deref()),
        Commands::Validate { pipeline } => cmd_validate(&pipeline),
        Commands::Catalog => cmd_catalog(),
        Commands::CreatePipeline { output } => cmd_create_pipeline(&output),
    }
}

fn cmd_show(file: &Path, options: &DsvOptions, limit: Option<usize>, json: bool) -> Result<()> {
    let table = read_table(file, options)
        .with_context(|| format!("failed to load {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    print_table(&table, limit);
    Ok(())
}

fn print_table(table: &Table, limit: Option<usize>) {
    if let Some(header) = table.header() {
        println!("{}", header.join("\t"));
        println!("{}", "-".repeat(header.len().max(1) * 12));
    }

    let rows = table.data_rows();
    let row_limit = limit.unwrap_or(rows.len());
    for row in rows.iter().take(row_limit) {
        println!("{}", row.join("\t"));
    }

    if rows.len() > row_limit {
        println!("... ({} more rows)", rows.len() - row_limit);
    }
}

fn print_status(status: &ProcessStatus) {
    for (severity, entry) in status.entries() {
        println!("{}: {}", severity, entry);
    }
}

fn cmd_run(pipeline_path: &Path, output: Option<&Path>) -> Result<()> {
    let file = PipelineFile::load(pipeline_path)
        .with_context(|| format!("failed to load pipeline {}", pipeline_path.display()))?;

    let tables = file.read_tables().context("failed to load pipeline tables")?;
    let pipeline = file.pipeline(&tables)?;
    let mut table = file
        .input
        .read()
        .with_context(|| format!("failed to load input {}", file.input.path.display()))?;

    let status = pipeline.run(&mut table);
    print_status(&status);
    if !status.is_success() {
        bail!("pipeline reported {} error(s)", status.errors.len());
    }

    match (output, &file.output) {
        (Some(path), source) => {
            let options = source
                .as_ref()
                .map(|s| s.options.clone())
                .unwrap_or_else(|| file.input.options.clone());
            tabproc_core::write_table(&table, path, &options)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {} rows to {}", table.row_count(), path.display());
        }
        (None, Some(source)) => {
            source
                .write(&table)
                .with_context(|| format!("failed to write {}", source.path.display()))?;
            println!("Wrote {} rows to {}", table.row_count(), source.path.display());
        }
        (None, None) => print_table(&table, None),
    }

    Ok(())
}

fn cmd_validate(pipeline_path: &Path) -> Result<()> {
    let file = PipelineFile::load(pipeline_path)
        .with_context(|| format!("failed to load pipeline {}", pipeline_path.display()))?;

    // Declared tables bind to empty placeholders so that only names are checked
    let placeholders: HashMap<String, Rc<Table>> = file
        .tables
        .keys()
        .map(|name| (name.clone(), Rc::new(Table::new())))
        .collect();
    let pipeline = file.pipeline(&placeholders)?;

    let status = pipeline.verify();
    print_status(&status);
    if !status.is_success() {
        bail!("pipeline has {} error(s)", status.errors.len());
    }

    println!("Pipeline is valid ({} steps)", pipeline.len());
    Ok(())
}

fn print_catalog<T>(heading: &str, entries: &[CatalogEntry<T>]) {
    println!("{} ({}):", heading, entries.len());
    for entry in entries {
        println!("  {:<28} {}", entry.name, entry.title);
    }
    println!();
}

fn cmd_catalog() -> Result<()> {
    print_catalog("Operations", catalog::OPERATIONS);
    print_catalog("Value conditions", catalog::VALUE_CONDITIONS);
    print_catalog("Row conditions", catalog::ROW_CONDITIONS);
    print_catalog("Conversions", catalog::CONVERSIONS);
    Ok(())
}

fn cmd_create_pipeline(output: &Path) -> Result<()> {
    let file = PipelineFile::template();
    file.save(output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("Created pipeline template at {}", output.display());
    println!("Edit the input path and steps, then run with: tabproc run {}", output.display());
    Ok(())
}
