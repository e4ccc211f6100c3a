//! Footer overlay generation
//!
//! Builds the throwaway single-page PDF holding nothing but the footer line.
//! The stamper composites its content onto a real page and then drops it.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, StringFormat, Stream};

use crate::error::{Error, Result};
use crate::layout::FooterLayout;

/// Resource name of the footer font inside the overlay page
///
/// Must not collide with the font names already used by stamped pages.
pub const FOOTER_FONT: &str = "SrcFooterF1";

/// Format the footer line for one page
pub fn footer_text(file_name: &str, page: usize, total: usize) -> String {
    format!("Source: {} | Page {} of {}", file_name, page, total)
}

/// Create a single-page overlay document carrying `text`
///
/// The page has the layout's media box, one standard Type1 font and a
/// content stream that draws the text at the layout position.
///
/// # Example
///
/// ```
/// use pdf_footer_merge::layout::FooterLayout;
/// use pdf_footer_merge::pdf::{create_footer_overlay, footer_text};
///
/// let text = footer_text("report.pdf", 1, 3);
/// let overlay = create_footer_overlay(&text, &FooterLayout::default()).unwrap();
/// assert_eq!(overlay.get_pages().len(), 1);
/// ```
pub fn create_footer_overlay(text: &str, layout: &FooterLayout) -> Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(layout.base_font.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    });

    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(FOOTER_FONT.as_bytes().to_vec()),
                    Object::Real(layout.font_size),
                ],
            ),
            Operation::new("Td", vec![Object::Real(layout.x), Object::Real(layout.y)]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ],
    };
    let encoded = content
        .encode()
        .map_err(|e| Error::Overlay(format!("cannot encode footer '{}': {}", text, e)))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let mut fonts = lopdf::Dictionary::new();
    fonts.set(FOOTER_FONT, Object::Reference(font_id));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(layout.page.width),
            Object::Real(layout.page.height),
        ],
        "Contents" => content_id,
        "Resources" => dictionary! { "Font" => fonts },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    Ok(doc)
}

fn is_win_ansi_char(c: char) -> bool {
    matches!(c as u32, 0x20..=0x7E | 0xA0..=0xFF)
}

/// Whether [`encode_win_ansi`] keeps every character of `text`
pub fn is_win_ansi_encodable(text: &str) -> bool {
    text.chars().all(is_win_ansi_char)
}

/// Encode text for a WinAnsiEncoding simple font
///
/// ASCII and Latin-1 pass through as single bytes; anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if is_win_ansi_char(c) { c as u32 as u8 } else { b'?' })
        .collect()
}

/// Inverse of [`encode_win_ansi`] for the Latin-1 range
pub fn decode_win_ansi(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_ansi_encodable() {
        assert!(is_win_ansi_encodable("Source: café.pdf | Page 1 of 2"));
        assert!(!is_win_ansi_encodable("日本.pdf"));
        assert_eq!(encode_win_ansi("日本.pdf"), b"??.pdf".to_vec());
    }

    #[test]
    fn test_footer_text_format() {
        assert_eq!(footer_text("A.pdf", 1, 2), "Source: A.pdf | Page 1 of 2");
        assert_eq!(
            footer_text("1. intro.pdf", 10, 12),
            "Source: 1. intro.pdf | Page 10 of 12"
        );
    }

    #[test]
    fn test_overlay_is_single_page_with_text() {
        let overlay = create_footer_overlay("Source: x.pdf | Page 1 of 1", &FooterLayout::default())
            .unwrap();
        let pages = overlay.get_pages();
        assert_eq!(pages.len(), 1);

        let page_id = pages[&1];
        let content = Content::decode(&overlay.get_page_content(page_id).unwrap()).unwrap();
        let shown: Vec<String> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => Some(decode_win_ansi(bytes)),
                _ => None,
            })
            .collect();
        assert_eq!(shown, vec!["Source: x.pdf | Page 1 of 1".to_string()]);
    }

    #[test]
    fn test_overlay_uses_layout_position() {
        let layout = FooterLayout {
            x: 20.0,
            y: 30.0,
            ..Default::default()
        };
        let overlay = create_footer_overlay("footer", &layout).unwrap();
        let page_id = overlay.get_pages()[&1];
        let content = Content::decode(&overlay.get_page_content(page_id).unwrap()).unwrap();

        let td = content
            .operations
            .iter()
            .find(|op| op.operator == "Td")
            .expect("overlay positions its text");
        assert!((td.operands[0].as_float().unwrap() - 20.0).abs() < 0.01);
        assert!((td.operands[1].as_float().unwrap() - 30.0).abs() < 0.01);
    }

    #[test]
    fn test_win_ansi_round_trip_and_fallback() {
        assert_eq!(encode_win_ansi("Café (1)"), b"Caf\xe9 (1)".to_vec());
        assert_eq!(decode_win_ansi(&encode_win_ansi("Café")), "Café");
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }
}
