//! PDF Footer Merge CLI tool
//!
//! Stamps every PDF in a folder with a source/page footer and merges them
//! into `<folder>/<folder name>_combined.pdf`.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use pdf_footer_merge::{process_folder, Error, ProcessOptions};

/// Process and merge PDFs from a folder with footers and bookmarks
#[derive(Parser)]
#[command(name = "pdf-footer-merge")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Stamp and merge every PDF in ./handouts into ./handouts/handouts_combined.pdf
    pdf-footer-merge handouts

    # Show per-page progress
    RUST_LOG=debug pdf-footer-merge handouts")]
struct Cli {
    /// Path to folder containing PDF files
    folder: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let Some(folder) = cli.folder else {
        eprintln!("Error: {}", Error::Argument("Folder path is required.".to_string()));
        eprintln!("{}", Cli::command().render_help());
        process::exit(1);
    };

    if let Err(e) = run(folder) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Stamp, merge and report on one folder
fn run(folder: PathBuf) -> anyhow::Result<()> {
    let run = process_folder(&folder, &ProcessOptions::default())
        .with_context(|| format!("Failed to process folder {}", folder.display()))?;

    eprintln!(
        "Merged {} files ({} pages) into {}",
        run.inputs.len(),
        run.summary.page_count,
        run.output.display()
    );
    for bookmark in &run.summary.bookmarks {
        eprintln!("  {}", bookmark.title);
    }

    Ok(())
}
