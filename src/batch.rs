//! Batch processing
//!
//! Stamps every input into a temporary `stamped_<name>` copy, merges the
//! copies into the final document and removes them again. The three phases
//! run strictly one after another.
//!
//! The copies live in a private staging directory created inside the work
//! directory, so files the user already has under a `stamped_` name are
//! never touched.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tempfile::{Builder, TempDir};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::layout::FooterLayout;
use crate::pdf::{merge_pdfs, stamp_pdf, MergeOptions, MergeSummary, StampOptions, TEMP_PREFIX};

/// Options for a batch run
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Directory in which the staging directory for stamped files is created
    pub work_dir: PathBuf,
    /// File name prefix of temporary stamped files, also stripped from
    /// bookmark labels
    pub temp_prefix: String,
    /// Footer position and font
    pub layout: FooterLayout,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            temp_prefix: TEMP_PREFIX.to_string(),
            layout: FooterLayout::default(),
        }
    }
}

/// Temporary files owned by one batch run
///
/// Every registered path is deleted when the set is cleaned up or dropped,
/// so temporaries disappear on failure paths too.
#[derive(Debug, Default)]
pub struct TempFileSet {
    paths: Vec<PathBuf>,
}

impl TempFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `path`; it will be removed on cleanup
    pub fn register(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    /// Registered paths in registration order
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Remove every registered file, returning how many were deleted
    ///
    /// Files that are already gone are skipped. Other failures are logged and
    /// do not stop the remaining removals.
    pub fn cleanup(&mut self) -> usize {
        let mut removed = 0;
        for path in self.paths.drain(..) {
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!("Removed {}", path.display());
                    removed += 1;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!("Could not remove temporary file {}: {}", path.display(), e),
            }
        }
        removed
    }
}

impl Drop for TempFileSet {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Stamp footers onto `inputs`, then merge them into `output`
///
/// Temporary stamped copies are written to a staging directory inside
/// `options.work_dir` and removed before returning, whether or not the run
/// succeeded.
///
/// # Example
///
/// ```no_run
/// use pdf_footer_merge::batch::{process_pdfs, ProcessOptions};
/// use std::path::{Path, PathBuf};
///
/// let inputs = vec![PathBuf::from("A.pdf"), PathBuf::from("B.pdf")];
/// let summary = process_pdfs(&inputs, Path::new("combined.pdf"), &ProcessOptions::default())
///     .expect("Failed to process");
/// assert_eq!(summary.bookmarks.len(), 2);
/// ```
pub fn process_pdfs(inputs: &[PathBuf], output: &Path, options: &ProcessOptions) -> Result<MergeSummary> {
    let temp_names = temp_file_names(inputs, &options.temp_prefix)?;
    let stamp_options = StampOptions {
        layout: options.layout.clone(),
    };

    // Declared before the file set so the files are removed before the directory
    let staging = staging_dir(&options.work_dir)?;
    let mut temp_files = TempFileSet::new();

    info!("Adding footers");
    for (input, temp_name) in inputs.iter().zip(temp_names) {
        let stamped = staging.path().join(temp_name);
        temp_files.register(stamped.clone());
        stamp_pdf(input, &stamped, &stamp_options)?;
        info!("Stamped {}", input.display());
    }

    info!("Merging {} PDFs", temp_files.paths().len());
    let merge_options = MergeOptions {
        input_paths: temp_files.paths().to_vec(),
        output_path: output.to_path_buf(),
        strip_prefix: Some(options.temp_prefix.clone()),
    };
    let summary = merge_pdfs(&merge_options)?;
    info!("Created: {}", output.display());

    info!("Cleaning up temp stamp files");
    let removed = temp_files.cleanup();
    debug!(removed, "Temporary files removed");
    info!("Complete!");

    Ok(summary)
}

/// Create the staging directory for one run's stamped files
fn staging_dir(work_dir: &Path) -> Result<TempDir> {
    let dir = Builder::new()
        .prefix(".pdf-footer-merge-")
        .tempdir_in(work_dir)?;
    debug!("Staging stamped files in {}", dir.path().display());
    Ok(dir)
}

/// Temporary file name for every input, rejecting inputs whose names would
/// map to the same temporary file
fn temp_file_names(inputs: &[PathBuf], prefix: &str) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(inputs.len());

    for input in inputs {
        let name = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Argument(format!("Input has no file name: {}", input.display())))?;

        if !seen.insert(name.clone()) {
            return Err(Error::Argument(format!(
                "Duplicate input file name '{}': temporary files would collide",
                name
            )));
        }
        names.push(format!("{}{}", prefix, name));
    }

    Ok(names)
}
