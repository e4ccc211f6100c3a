//! Footer stamping
//!
//! Adds a `Source: <file> | Page <n> of <total>` line to every page of a PDF.
//! Each footer is rendered as its own single-page overlay document, whose
//! content and resources are then composited onto the target page.

use std::collections::HashMap;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::layout::FooterLayout;
use crate::pdf::metadata::load_document;
use crate::pdf::overlay::{create_footer_overlay, footer_text, is_win_ansi_encodable};
use crate::pdf::pages::{content_refs, effective_resources, resolve};
use crate::pdf::write::save_document;

/// Options for stamping footers
#[derive(Debug, Clone, Default)]
pub struct StampOptions {
    /// Footer position and font
    pub layout: FooterLayout,
}

/// Outcome of stamping one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampSummary {
    /// Number of pages stamped (same as the input page count)
    pub page_count: usize,
}

/// Stamp a footer onto every page of `input` and write the result to `output`
///
/// The input file is never modified. `output` is overwritten if it exists.
///
/// # Example
///
/// ```no_run
/// use pdf_footer_merge::pdf::{stamp_pdf, StampOptions};
/// use std::path::Path;
///
/// stamp_pdf(
///     Path::new("report.pdf"),
///     Path::new("stamped_report.pdf"),
///     &StampOptions::default(),
/// ).expect("Failed to stamp");
/// ```
pub fn stamp_pdf(input: &Path, output: &Path, options: &StampOptions) -> Result<StampSummary> {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| Error::Argument(format!("Input has no file name: {}", input.display())))?;

    let mut doc = load_document(input)?;

    if !is_win_ansi_encodable(&file_name) {
        warn!(
            "'{}' has characters the footer font cannot show, they will appear as '?'",
            file_name
        );
    }

    let pages: Vec<(u32, ObjectId)> = doc.get_pages().into_iter().collect();
    let total = pages.len();

    info!("Adding footer to '{}' with {} pages", file_name, total);

    for (number, page_id) in pages {
        let text = footer_text(&file_name, number as usize, total);
        let overlay = create_footer_overlay(&text, &options.layout)?;

        overlay_page(&mut doc, page_id, &overlay).map_err(|e| Error::MalformedPage {
            path: input.to_path_buf(),
            page: number,
            reason: e.to_string(),
        })?;

        debug!(page = number, total, "Stamped page");
    }

    doc.compress();
    save_document(&mut doc, output)?;

    Ok(StampSummary { page_count: total })
}

/// Composite the first page of `overlay` on top of page `page_id` of `doc`
///
/// The page's original content is wrapped in `q`/`Q` so a transformation
/// left active by the original content can't move the overlay. Overlay
/// resources are merged into the page's effective resources, which are then
/// set directly on the page.
pub fn overlay_page(doc: &mut Document, page_id: ObjectId, overlay: &Document) -> lopdf::Result<()> {
    let overlay_page_id = match overlay.get_pages().values().next() {
        Some(id) => *id,
        None => return Ok(()),
    };
    let overlay_dict = overlay.get_object(overlay_page_id)?.as_dict()?;

    let mut id_map = HashMap::new();
    let overlay_contents = content_refs(overlay_dict)
        .iter()
        .map(|content| import_object(doc, overlay, content, &mut id_map))
        .collect::<lopdf::Result<Vec<_>>>()?;

    let overlay_resources = match overlay_dict.get(b"Resources") {
        Ok(resources) => resolve(overlay, resources)?.as_dict()?.clone(),
        Err(_) => Dictionary::new(),
    };
    let overlay_resources = import_dictionary(doc, overlay, &overlay_resources, &mut id_map)?;

    let page_contents = content_refs(doc.get_object(page_id)?.as_dict()?);
    let mut resources = effective_resources(doc, page_id);
    merge_resources(doc, &mut resources, &overlay_resources);

    let mut contents = Vec::with_capacity(page_contents.len() + overlay_contents.len() + 2);
    if !page_contents.is_empty() {
        let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let restore_id = doc.add_object(Stream::new(Dictionary::new(), b"\nQ\n".to_vec()));
        contents.push(Object::Reference(save_id));
        contents.extend(page_contents);
        contents.push(Object::Reference(restore_id));
    }
    contents.extend(overlay_contents);

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page.set("Contents", Object::Array(contents));
    page.set("Resources", Object::Dictionary(resources));

    Ok(())
}

/// Copy an object from `source` into `target`, pulling in every object it
/// references under freshly allocated ids
fn import_object(
    target: &mut Document,
    source: &Document,
    object: &Object,
    id_map: &mut HashMap<ObjectId, ObjectId>,
) -> lopdf::Result<Object> {
    let imported = match object {
        Object::Reference(old_id) => {
            Object::Reference(import_reference(target, source, *old_id, id_map)?)
        }
        Object::Array(items) => Object::Array(
            items
                .iter()
                .map(|item| import_object(target, source, item, id_map))
                .collect::<lopdf::Result<Vec<_>>>()?,
        ),
        Object::Dictionary(dict) => {
            Object::Dictionary(import_dictionary(target, source, dict, id_map)?)
        }
        Object::Stream(stream) => {
            let mut stream = stream.clone();
            stream.dict = import_dictionary(target, source, &stream.dict, id_map)?;
            Object::Stream(stream)
        }
        other => other.clone(),
    };
    Ok(imported)
}

fn import_dictionary(
    target: &mut Document,
    source: &Document,
    dict: &Dictionary,
    id_map: &mut HashMap<ObjectId, ObjectId>,
) -> lopdf::Result<Dictionary> {
    let mut imported = Dictionary::new();
    for (key, value) in dict.iter() {
        imported.set(key.clone(), import_object(target, source, value, id_map)?);
    }
    Ok(imported)
}

fn import_reference(
    target: &mut Document,
    source: &Document,
    old_id: ObjectId,
    id_map: &mut HashMap<ObjectId, ObjectId>,
) -> lopdf::Result<ObjectId> {
    if let Some(new_id) = id_map.get(&old_id) {
        return Ok(*new_id);
    }

    // Register before recursing so reference cycles terminate
    let new_id = target.new_object_id();
    id_map.insert(old_id, new_id);

    let imported = import_object(target, source, source.get_object(old_id)?, id_map)?;
    target.objects.insert(new_id, imported);

    Ok(new_id)
}

/// Merge overlay resources into the page's resources dictionary
fn merge_resources(doc: &Document, resources: &mut Dictionary, overlay: &Dictionary) {
    for (category, value) in overlay.iter() {
        let existing = resources
            .get(category)
            .ok()
            .and_then(|existing| resolve(doc, existing).ok())
            .and_then(|existing| existing.as_dict().ok())
            .cloned();

        match (existing, value) {
            (Some(mut merged), Object::Dictionary(entries)) => {
                for (name, entry) in entries.iter() {
                    merged.set(name.clone(), entry.clone());
                }
                resources.set(category.clone(), Object::Dictionary(merged));
            }
            _ => resources.set(category.clone(), value.clone()),
        }
    }
}
