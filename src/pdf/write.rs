//! Saving documents

use std::io::{BufWriter, Write};
use std::path::Path;

use lopdf::Document;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Save `doc` to `path` atomically
///
/// The document is serialised into a temporary file next to `path` and then
/// renamed over it, so a failed save never leaves a truncated PDF behind.
/// An existing file at `path` is replaced.
pub fn save_document(doc: &mut Document, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| Error::write(path, e))?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        doc.save_to(&mut writer).map_err(|e| Error::write(path, e))?;
        writer.flush().map_err(|e| Error::write(path, e))?;
    }
    temp.persist(path).map_err(|e| Error::write(path, e.error))?;

    Ok(())
}
