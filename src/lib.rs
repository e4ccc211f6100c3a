//! PDF Footer Merge Library
//!
//! Stamps every page of a set of PDFs with a footer naming its source file
//! and page position, then merges the stamped files into one document with
//! a bookmark per source. This library provides functionality to:
//! - Stamp `Source: <file> | Page <n> of <total>` footers onto PDFs
//! - Merge PDFs with one outline entry per source file
//! - Run the stamp/merge/cleanup pipeline over a file list or a folder
//! - Read page counts and bookmarks back from the results
//!
//! # Example
//!
//! ```no_run
//! use pdf_footer_merge::batch::ProcessOptions;
//! use pdf_footer_merge::collect::process_folder;
//! use std::path::Path;
//!
//! let run = process_folder(Path::new("handouts"), &ProcessOptions::default())
//!     .expect("Failed to process folder");
//! println!("{} pages written to {}", run.summary.page_count, run.output.display());
//! ```

pub mod batch;
pub mod collect;
pub mod error;
pub mod layout;
pub mod pdf;

// Re-export commonly used items
pub use batch::{process_pdfs, ProcessOptions};
pub use collect::{collect_pdfs, default_output_path, process_folder};
pub use error::{Error, Result};
