//! Folder-driven runs

use std::io;
use std::path::{Path, PathBuf};

use glob::{glob_with, MatchOptions, Pattern};
use tracing::info;

use crate::batch::{process_pdfs, ProcessOptions};
use crate::error::{Error, Result};
use crate::pdf::MergeSummary;

/// Suffix appended to the folder name to form the output file name
pub const OUTPUT_SUFFIX: &str = "_combined.pdf";

/// Everything a folder run did
#[derive(Debug, Clone)]
pub struct FolderRun {
    /// Inputs in merge order
    pub inputs: Vec<PathBuf>,
    /// Path of the merged document
    pub output: PathBuf,
    /// Pages and bookmarks of the merged document
    pub summary: MergeSummary,
}

/// List the `*.pdf` files directly inside `folder`, sorted by path
///
/// Matching is case-sensitive and does not descend into subdirectories.
pub fn collect_pdfs(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(Error::Argument(format!(
            "Not a directory: {}",
            folder.display()
        )));
    }

    let pattern = Path::new(&Pattern::escape(&folder.to_string_lossy())).join("*.pdf");
    let pattern = pattern.to_string_lossy();
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let mut paths = Vec::new();
    for entry in glob_with(&pattern, options).map_err(|e| Error::InvalidGlob(e.to_string()))? {
        let path = entry.map_err(|e| {
            Error::Io(io::Error::new(
                e.error().kind(),
                format!("{}: {}", e.path().display(), e.error()),
            ))
        })?;
        if path.is_file() {
            paths.push(path);
        }
    }

    // Sort paths for consistent ordering
    paths.sort();

    Ok(paths)
}

/// `<folder>/<folder name>_combined.pdf`
///
/// Folders without a final component (such as `.`) are resolved to their
/// real name first.
pub fn default_output_path(folder: &Path) -> Result<PathBuf> {
    let name = match folder.file_name() {
        Some(name) => name.to_os_string(),
        None => folder
            .canonicalize()?
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| {
                Error::Argument(format!("Cannot name output for folder {}", folder.display()))
            })?,
    };

    Ok(folder.join(format!("{}{}", name.to_string_lossy(), OUTPUT_SUFFIX)))
}

/// Stamp and merge every PDF in `folder` into its default output file
///
/// A merged file left by an earlier run is not treated as an input.
pub fn process_folder(folder: &Path, options: &ProcessOptions) -> Result<FolderRun> {
    let output = default_output_path(folder)?;
    let inputs: Vec<PathBuf> = collect_pdfs(folder)?
        .into_iter()
        .filter(|path| path.file_name() != output.file_name())
        .collect();

    info!(
        "Processing folder: {} with pdf count {} files",
        folder.display(),
        inputs.len()
    );

    let summary = process_pdfs(&inputs, &output, options)?;

    Ok(FolderRun {
        inputs,
        output,
        summary,
    })
}
