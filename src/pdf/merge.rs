//! PDF merging with per-source bookmarks

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::pdf::metadata::load_document;
use crate::pdf::pages::{flatten_inherited_attributes, type_name};
use crate::pdf::write::save_document;

/// File name prefix of stamped intermediate files
pub const TEMP_PREFIX: &str = "stamped_";

/// Options for merging PDFs
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Input PDF file paths in the order they should be merged
    pub input_paths: Vec<PathBuf>,
    /// Output PDF file path
    pub output_path: PathBuf,
    /// Prefix removed from file stems when deriving bookmark labels
    pub strip_prefix: Option<String>,
}

impl MergeOptions {
    /// Merge `input_paths` into `output_path`, stripping [`TEMP_PREFIX`]
    /// from bookmark labels
    pub fn new(input_paths: Vec<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_paths,
            output_path: output_path.into(),
            strip_prefix: Some(TEMP_PREFIX.to_string()),
        }
    }
}

/// One outline entry of a merged document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    /// Text shown in the outline
    pub title: String,
    /// Zero-based index of the page the entry points at
    pub page_index: usize,
}

/// Result of a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    /// Total number of pages in the output
    pub page_count: usize,
    /// One entry per non-empty source, in merge order
    pub bookmarks: Vec<Bookmark>,
}

/// Bookmark label for a source file: its stem, minus `strip_prefix` if the
/// stem starts with it
///
/// ```
/// use pdf_footer_merge::pdf::bookmark_label;
/// use std::path::Path;
///
/// assert_eq!(bookmark_label(Path::new("/tmp/stamped_A.pdf"), Some("stamped_")), "A");
/// assert_eq!(bookmark_label(Path::new("notes.v2.pdf"), None), "notes.v2");
/// ```
pub fn bookmark_label(path: &Path, strip_prefix: Option<&str>) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    match strip_prefix.and_then(|prefix| stem.strip_prefix(prefix)) {
        Some(stripped) => stripped.to_string(),
        None => stem,
    }
}

/// Bookmark title covering `page_count` pages starting at zero-based `start`
pub fn bookmark_title(label: &str, start: usize, page_count: usize) -> String {
    format!("{} (pages {}-{})", label, start + 1, start + page_count)
}

/// Merge multiple PDF files into a single PDF with one bookmark per source
///
/// Pages keep their order within each source and sources keep the order of
/// `input_paths`. Each bookmark points at the first page its source
/// contributed. An empty input list produces a valid document with no pages.
///
/// Nothing is written unless every source loads; the output file is then
/// written in one atomic step.
///
/// # Example
///
/// ```no_run
/// use pdf_footer_merge::pdf::{merge_pdfs, MergeOptions};
/// use std::path::PathBuf;
///
/// let options = MergeOptions::new(
///     vec![PathBuf::from("1. first.pdf"), PathBuf::from("2. second.pdf")],
///     "merged.pdf",
/// );
///
/// let summary = merge_pdfs(&options).expect("Failed to merge");
/// println!("{} pages", summary.page_count);
/// ```
pub fn merge_pdfs(options: &MergeOptions) -> Result<MergeSummary> {
    info!(
        "Merging {} PDFs into {}",
        options.input_paths.len(),
        options.output_path.display()
    );

    let mut merged = Document::with_version("1.5");
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut outline: Vec<(Bookmark, ObjectId)> = Vec::new();

    for path in &options.input_paths {
        let mut doc = load_document(path)?;

        let source_pages: Vec<(u32, ObjectId)> = doc.get_pages().into_iter().collect();
        for (number, page_id) in &source_pages {
            flatten_inherited_attributes(&mut doc, *page_id).map_err(|e| Error::MalformedPage {
                path: path.clone(),
                page: *number,
                reason: e.to_string(),
            })?;
        }

        // Renumber objects in this document to avoid conflicts
        doc.renumber_objects_with(merged.max_id + 1);
        merged.max_id = merged.max_id.max(doc.max_id);

        // Renumbering keeps page order, so collect ids after it
        let source_page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        let start = page_ids.len();
        let count = source_page_ids.len();

        // The source's own catalog, page tree and outline are rebuilt below
        let outline_ids = outline_object_ids(&doc);
        merged.objects.extend(doc.objects.into_iter().filter(|(id, object)| {
            !outline_ids.contains(id)
                && !matches!(type_name(object), Some(b"Catalog") | Some(b"Pages"))
        }));

        if count == 0 {
            warn!("{} has no pages, no bookmark added", path.display());
            continue;
        }

        let label = bookmark_label(path, options.strip_prefix.as_deref());
        let bookmark = Bookmark {
            title: bookmark_title(&label, start, count),
            page_index: start,
        };
        debug!(title = %bookmark.title, page_index = start, "Added bookmark");

        outline.push((bookmark, source_page_ids[0]));
        page_ids.extend(source_page_ids);
    }

    let pages_id = merged.new_object_id();
    for &page_id in &page_ids {
        if let Ok(Object::Dictionary(page)) = merged.get_object_mut(page_id) {
            page.set("Parent", Object::Reference(pages_id));
        }
    }

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(page_ids.len() as i64));
    pages_object.set(
        "Kids",
        Object::Array(page_ids.iter().map(|&id| Object::Reference(id)).collect()),
    );
    merged.objects.insert(pages_id, Object::Dictionary(pages_object));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    if let Some(outlines_id) = build_outline(&mut merged, &outline) {
        catalog.set("Outlines", Object::Reference(outlines_id));
        catalog.set("PageMode", Object::Name(b"UseOutlines".to_vec()));
    }
    let catalog_id = merged.add_object(Object::Dictionary(catalog));
    merged.trailer.set("Root", Object::Reference(catalog_id));

    merged.compress();
    save_document(&mut merged, &options.output_path)?;

    Ok(MergeSummary {
        page_count: page_ids.len(),
        bookmarks: outline.into_iter().map(|(bookmark, _)| bookmark).collect(),
    })
}

/// Ids of a document's outline root and every item reachable from it
fn outline_object_ids(doc: &Document) -> BTreeSet<ObjectId> {
    let mut ids = BTreeSet::new();
    let mut pending = Vec::new();
    if let Ok(Object::Reference(root)) = doc.catalog().and_then(|catalog| catalog.get(b"Outlines")) {
        pending.push(*root);
    }

    while let Some(id) = pending.pop() {
        if !ids.insert(id) {
            continue;
        }
        if let Ok(Object::Dictionary(item)) = doc.get_object(id) {
            for key in [&b"First"[..], &b"Next"[..]] {
                if let Ok(Object::Reference(next)) = item.get(key) {
                    pending.push(*next);
                }
            }
        }
    }
    ids
}

/// Build a flat outline with one item per entry
///
/// Returns the id of the outline root, or `None` when there is nothing to
/// bookmark.
fn build_outline(doc: &mut Document, entries: &[(Bookmark, ObjectId)]) -> Option<ObjectId> {
    if entries.is_empty() {
        return None;
    }

    let outlines_id = doc.new_object_id();
    let item_ids: Vec<ObjectId> = entries.iter().map(|_| doc.new_object_id()).collect();

    let mut items = BTreeMap::new();
    for (i, (bookmark, page_id)) in entries.iter().enumerate() {
        let mut item = Dictionary::new();
        item.set("Title", pdf_text_string(&bookmark.title));
        item.set("Parent", Object::Reference(outlines_id));
        item.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(*page_id),
                Object::Name(b"Fit".to_vec()),
            ]),
        );
        if i > 0 {
            item.set("Prev", Object::Reference(item_ids[i - 1]));
        }
        if let Some(next) = item_ids.get(i + 1) {
            item.set("Next", Object::Reference(*next));
        }
        items.insert(item_ids[i], Object::Dictionary(item));
    }
    doc.objects.extend(items);

    let mut outlines = Dictionary::new();
    outlines.set("Type", Object::Name(b"Outlines".to_vec()));
    outlines.set("First", Object::Reference(item_ids[0]));
    outlines.set("Last", Object::Reference(item_ids[item_ids.len() - 1]));
    outlines.set("Count", Object::Integer(item_ids.len() as i64));
    doc.objects.insert(outlines_id, Object::Dictionary(outlines));

    Some(outlines_id)
}

/// Encode a PDF text string: plain bytes for ASCII, UTF-16BE with a byte
/// order mark otherwise
pub fn pdf_text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
