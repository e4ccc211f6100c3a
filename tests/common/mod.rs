//! Fixture PDFs generated on the fly

#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;

/// Text shown on page `page` (1-based) of a fixture tagged `tag`
pub fn body_text(tag: &str, page: usize) -> String {
    format!("{} body {}", tag, page)
}

/// Write a PDF with `pages` pages, each showing [`body_text`]
///
/// The font lives in the resources of the Pages node, so pages rely on
/// inheritance the way many real-world producers lay files out.
pub fn write_pdf(path: &Path, tag: &str, pages: usize) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids = Vec::new();
    for page in 1..=pages {
        let content = format!("BT /F1 24 Tf 72 700 Td ({}) Tj ET", body_text(tag, page));
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(pages as i64),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc.save(path).expect("Failed to write fixture PDF");
}

/// Names of the entries of `dir` starting with `prefix`
pub fn files_with_prefix(dir: &Path, prefix: &str) -> Vec<String> {
    std::fs::read_dir(dir)
        .expect("Failed to list directory")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(prefix))
        .collect()
}
