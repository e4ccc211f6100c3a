//! Page tree helpers shared by stamping and merging

use lopdf::{Dictionary, Document, Object, ObjectId};

/// Page attributes a page may inherit from its ancestors in the page tree
pub const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Follow a single indirect reference
pub fn resolve<'a>(doc: &'a Document, object: &'a Object) -> lopdf::Result<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id),
        other => Ok(other),
    }
}

/// Name stored under `/Type`, for dictionaries and stream dictionaries
pub fn type_name(object: &Object) -> Option<&[u8]> {
    let dict = match object {
        Object::Dictionary(dict) => dict,
        Object::Stream(stream) => &stream.dict,
        _ => return None,
    };
    match dict.get(b"Type") {
        Ok(Object::Name(name)) => Some(name.as_slice()),
        _ => None,
    }
}

/// Look up a page attribute, walking up `/Parent` links when the page
/// doesn't carry it itself
pub fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = page_id;
    // Guard against cyclic Parent chains in damaged files
    for _ in 0..64 {
        let dict = doc.get_object(current).ok()?.as_dict().ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => current = *parent,
            _ => return None,
        }
    }
    None
}

/// Effective resources of a page as a direct dictionary
///
/// Resources may be set on the page or on an ancestor, and either inline or
/// by reference. Missing resources yield an empty dictionary.
pub fn effective_resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    match inherited_attribute(doc, page_id, b"Resources") {
        Some(Object::Dictionary(dict)) => dict,
        Some(Object::Reference(id)) => match doc.get_object(id) {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            _ => Dictionary::new(),
        },
        _ => Dictionary::new(),
    }
}

/// Content stream references of a page dictionary, in drawing order
pub fn content_refs(page: &Dictionary) -> Vec<Object> {
    match page.get(b"Contents") {
        Ok(Object::Reference(id)) => vec![Object::Reference(*id)],
        Ok(Object::Array(items)) => items
            .iter()
            .filter(|item| matches!(item, Object::Reference(_)))
            .cloned()
            .collect(),
        _ => Vec::new(),
    }
}

/// Copy every inheritable attribute onto the page itself
///
/// Needed before a page is re-parented into a new page tree, otherwise it
/// would lose the resources and boxes it used to inherit.
pub fn flatten_inherited_attributes(doc: &mut Document, page_id: ObjectId) -> lopdf::Result<()> {
    let mut inherited = Vec::new();
    for key in INHERITABLE_KEYS {
        let own = doc.get_object(page_id)?.as_dict()?.has(key);
        if !own {
            if let Some(value) = inherited_attribute(doc, page_id, key) {
                inherited.push((key, value));
            }
        }
    }

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    for (key, value) in inherited {
        page.set(key.to_vec(), value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn doc_with_inherited_resources() -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => Object::Integer(1),
                "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(595), Object::Integer(842)],
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
            }),
        );
        (doc, page_id)
    }

    #[test]
    fn test_inherited_attribute_walks_parents() {
        let (doc, page_id) = doc_with_inherited_resources();
        assert!(inherited_attribute(&doc, page_id, b"MediaBox").is_some());
        assert!(inherited_attribute(&doc, page_id, b"Rotate").is_none());
    }

    #[test]
    fn test_effective_resources_from_parent() {
        let (doc, page_id) = doc_with_inherited_resources();
        let resources = effective_resources(&doc, page_id);
        assert!(resources.has(b"Font"));
    }

    #[test]
    fn test_flatten_copies_onto_page() {
        let (mut doc, page_id) = doc_with_inherited_resources();
        flatten_inherited_attributes(&mut doc, page_id).unwrap();

        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        assert!(page.has(b"Resources"));
        assert!(page.has(b"MediaBox"));
        assert!(!page.has(b"Rotate"));
    }

    #[test]
    fn test_content_refs_single_and_array() {
        let single = dictionary! { "Contents" => Object::Reference((7, 0)) };
        let refs = content_refs(&single);
        assert_eq!(refs.len(), 1);
        assert!(matches!(refs[0], Object::Reference((7, 0))));

        let many = dictionary! {
            "Contents" => vec![Object::Reference((3, 0)), Object::Reference((4, 0))],
        };
        assert_eq!(content_refs(&many).len(), 2);
        assert!(content_refs(&Dictionary::new()).is_empty());
    }

    #[test]
    fn test_type_name() {
        let catalog = Object::Dictionary(dictionary! { "Type" => "Catalog" });
        assert_eq!(type_name(&catalog), Some(&b"Catalog"[..]));
        assert_eq!(type_name(&Object::Integer(3)), None);
    }
}
