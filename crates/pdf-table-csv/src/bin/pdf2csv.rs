use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use futures::executor::block_on;
use pdf_table_csv::{
    ContinuationRule, DEFAULT_SCRATCH_DIR, DirObjectStore, DirScratch, EventHandler,
    ExtractOptions, Outcome, StorageEvent, TextTableExtractor, extract_pdf_to_csv,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pdf2csv",
    version,
    about = "Extract tables from PDFs into CSV, locally or from a bucket event"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract tables from a local PDF into a CSV file.
    Extract(ExtractArgs),
    /// Replay one storage event against a directory-backed bucket store.
    Handle(HandleArgs),
}

#[derive(Debug, Args)]
struct TableArgs {
    /// Minimum cells required per candidate table row.
    #[arg(long, default_value_t = 2)]
    min_cols: usize,

    /// Rows dropped from the first detected table region.
    #[arg(long, default_value_t = 0)]
    first_region_skip: usize,

    /// Rows dropped from every later table region.
    #[arg(long, default_value_t = 2)]
    continuation_skip: usize,
}

impl TableArgs {
    fn options(&self) -> ExtractOptions {
        ExtractOptions {
            min_cols: self.min_cols,
        }
    }

    fn rule(&self) -> ContinuationRule {
        ContinuationRule::new(self.first_region_skip, self.continuation_skip)
    }
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input PDF path.
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV path.
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    table: TableArgs,
}

#[derive(Debug, Args)]
struct HandleArgs {
    /// Directory holding one sub-directory per bucket.
    #[arg(long)]
    store_root: PathBuf,

    /// Bucket the event refers to.
    #[arg(long)]
    bucket: String,

    /// Object key the event refers to.
    #[arg(long)]
    name: String,

    /// Scratch directory for the downloaded PDF and generated CSV.
    #[arg(long, default_value = DEFAULT_SCRATCH_DIR)]
    scratch: PathBuf,

    #[command(flatten)]
    table: TableArgs,
}

fn run_extract(args: &ExtractArgs) -> Result<()> {
    let report = extract_pdf_to_csv(
        &args.input,
        &args.output,
        &args.table.options(),
        args.table.rule(),
    )
    .with_context(|| format!("failed to extract tables from '{}'", args.input.display()))?;
    info!(
        rows = report.row_count,
        regions = report.region_count,
        "extraction finished"
    );
    Ok(())
}

fn run_handle(args: &HandleArgs) -> Result<()> {
    let extractor =
        TextTableExtractor::new(args.table.options()).context("invalid extraction options")?;
    let mut handler = EventHandler::new(
        DirObjectStore::new(&args.store_root),
        extractor,
        DirScratch::new(&args.scratch),
    )
    .with_continuation(args.table.rule());

    let event = StorageEvent::new(args.bucket.clone(), args.name.clone());
    let outcome = block_on(handler.handle(&event))
        .with_context(|| format!("failed to process '{}/{}'", event.bucket, event.name))?;
    match outcome {
        Outcome::Skipped => info!(name = %event.name, "skipped non-PDF object"),
        Outcome::Converted {
            output_key,
            region_count,
            row_count,
        } => info!(
            output_key = %output_key,
            regions = region_count,
            rows = row_count,
            "published csv"
        ),
    }
    Ok(())
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pdf_table_csv=info,pdf2csv=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Extract(args) => run_extract(args),
        Commands::Handle(args) => run_handle(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
