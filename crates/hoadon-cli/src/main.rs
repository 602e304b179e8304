//! CLI application for sorting Vietnamese invoice files.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use console::style;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use hoadon_core::batch;
use hoadon_core::pdf::PdfTextSource;

/// Vietnamese invoice sorter - rename PDF and XML invoices by issue date and number
#[derive(Parser)]
#[command(name = "hoadon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input files or folders (folders contribute their top-level PDF and XML files)
    #[arg(short, long, required = true, num_args = 1.., value_name = "PATH")]
    inputs: Vec<PathBuf>,

    /// Directory for recognized invoices, renamed to YYMMDD_number
    #[arg(short, long, value_name = "DIR")]
    success: PathBuf,

    /// Directory for files whose identity could not be read
    #[arg(short, long, value_name = "DIR")]
    failed: PathBuf,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity; logs go to stderr because stdout
    // carries the machine-readable progress lines.
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let start = Instant::now();

    let files = collect_inputs(&cli.inputs)?;
    if files.is_empty() {
        anyhow::bail!("No input files found");
    }

    eprintln!("{} Found {} files to sort", style("ℹ").blue(), files.len());

    fs::create_dir_all(&cli.success)
        .with_context(|| format!("cannot create success directory {}", cli.success.display()))?;
    fs::create_dir_all(&cli.failed)
        .with_context(|| format!("cannot create failure directory {}", cli.failed.display()))?;

    let source = PdfTextSource::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = batch::run(&files, &cli.success, &cli.failed, &source, &mut out)?;

    eprintln!();
    eprintln!(
        "{} Sorted {} files in {:?}",
        style("✓").green(),
        summary.success + summary.failed,
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(summary.success).green(),
        style(summary.failed).red()
    );

    Ok(())
}

/// Expand folder arguments into their top-level PDF and XML files, sorted
/// by name. Plain file paths pass through untouched, whether or not they
/// exist, so an unreadable input surfaces as a per-file error instead of
/// aborting the run.
fn collect_inputs(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(path)
                .with_context(|| format!("cannot read folder {}", path.display()))?
                .filter_map(|r| r.ok())
                .map(|entry| entry.path())
                .filter(|p| p.is_file())
                .filter(|p| {
                    let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
                    matches!(ext.to_lowercase().as_str(), "pdf" | "xml")
                })
                .collect();
            entries.sort();
            files.extend(entries);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}
