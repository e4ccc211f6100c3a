//! Reading back page counts, outlines and shown text

use std::collections::{HashMap, HashSet};
use std::path::Path;

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};

use crate::error::{Error, Result};
use crate::pdf::merge::Bookmark;
use crate::pdf::overlay::decode_win_ansi;

/// Load a PDF, reporting failures as [`Error::DocumentRead`]
pub fn load_document(path: &Path) -> Result<Document> {
    Document::load(path).map_err(|e| Error::read(path, e))
}

/// Count the number of pages in a PDF file
pub fn count_pages(path: &Path) -> Result<usize> {
    Ok(load_document(path)?.get_pages().len())
}

/// Read the top-level outline of a PDF file
///
/// Each entry's destination page is resolved to a zero-based page index.
/// Entries whose destination isn't a page of the document are skipped.
pub fn read_bookmarks(path: &Path) -> Result<Vec<Bookmark>> {
    let doc = load_document(path)?;
    Ok(document_bookmarks(&doc))
}

/// Top-level outline entries of an already loaded document
pub fn document_bookmarks(doc: &Document) -> Vec<Bookmark> {
    let page_index: HashMap<ObjectId, usize> = doc
        .get_pages()
        .into_values()
        .enumerate()
        .map(|(index, id)| (id, index))
        .collect();

    let mut bookmarks = Vec::new();
    let mut next = doc
        .catalog()
        .and_then(|catalog| catalog.get(b"Outlines"))
        .and_then(|outlines| match outlines {
            Object::Reference(id) => doc.get_object(*id),
            other => Ok(other),
        })
        .and_then(Object::as_dict)
        .ok()
        .and_then(|outlines| match outlines.get(b"First") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        });

    // Next chains in damaged files can loop
    let mut visited = HashSet::new();
    while let Some(item_id) = next {
        if !visited.insert(item_id) {
            break;
        }
        let item = match doc.get_object(item_id).and_then(Object::as_dict) {
            Ok(item) => item,
            Err(_) => break,
        };

        let title = match item.get(b"Title") {
            Ok(Object::String(bytes, _)) => decode_text_string(bytes),
            _ => String::new(),
        };
        let target = match item.get(b"Dest") {
            Ok(Object::Array(dest)) => match dest.first() {
                Some(Object::Reference(page_id)) => page_index.get(page_id).copied(),
                _ => None,
            },
            _ => None,
        };
        if let Some(page_index) = target {
            bookmarks.push(Bookmark { title, page_index });
        }

        next = match item.get(b"Next") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        };
    }

    bookmarks
}

/// Text shown by `Tj`/`TJ` operators on each page, one list per page
///
/// Each content stream of a page is decoded on its own. Strings are read as
/// single-byte Latin-1, which matches how footers are written.
pub fn page_text_runs(path: &Path) -> Result<Vec<Vec<String>>> {
    let doc = load_document(path)?;
    let mut pages = Vec::new();

    for page_id in doc.get_pages().into_values() {
        let mut runs = Vec::new();
        for content_id in doc.get_page_contents(page_id) {
            let stream = match doc.get_object(content_id).and_then(Object::as_stream) {
                Ok(stream) => stream,
                Err(_) => continue,
            };
            let data = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            let content = Content::decode(&data).map_err(|e| Error::read(path, e))?;

            for operation in &content.operations {
                match operation.operator.as_str() {
                    "Tj" | "'" | "\"" => {
                        if let Some(Object::String(bytes, _)) = operation.operands.last() {
                            runs.push(decode_win_ansi(bytes));
                        }
                    }
                    "TJ" => {
                        if let Some(Object::Array(parts)) = operation.operands.first() {
                            let text: String = parts
                                .iter()
                                .filter_map(|part| match part {
                                    Object::String(bytes, _) => Some(decode_win_ansi(bytes)),
                                    _ => None,
                                })
                                .collect();
                            runs.push(text);
                        }
                    }
                    _ => {}
                }
            }
        }
        pages.push(runs);
    }

    Ok(pages)
}

/// Decode a PDF text string (UTF-16BE with byte order mark, else Latin-1)
pub fn decode_text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => decode_win_ansi(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::merge::pdf_text_string;

    #[test]
    fn test_count_pages_nonexistent_file() {
        let result = count_pages(Path::new("nonexistent.pdf"));
        assert!(matches!(result, Err(Error::DocumentRead { .. })));
    }

    #[test]
    fn test_read_bookmarks_nonexistent_file() {
        let result = read_bookmarks(Path::new("nonexistent.pdf"));
        assert!(matches!(result, Err(Error::DocumentRead { .. })));
    }

    #[test]
    fn test_decode_text_string() {
        assert_eq!(decode_text_string(b"A (pages 1-2)"), "A (pages 1-2)");
        match pdf_text_string("Résumé (pages 1-3)") {
            Object::String(bytes, _) => assert_eq!(decode_text_string(&bytes), "Résumé (pages 1-3)"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_document_without_outline_has_no_bookmarks() {
        let doc = Document::with_version("1.5");
        assert!(document_bookmarks(&doc).is_empty());
    }
}
