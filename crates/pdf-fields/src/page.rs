//! Page access: lookup, inherited attributes, resources and content

use crate::constants::{DEFAULT_PAGE_HEIGHT_PT, DEFAULT_PAGE_WIDTH_PT, MAX_PAGE_TREE_DEPTH};
use crate::geometry::{PageGeometry, Rect};
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

// =============================================================================
// Lookup
// =============================================================================

/// Object ID of a 1-based page number
pub(crate) fn find_page(doc: &Document, page: u32) -> Result<ObjectId> {
    let pages = doc.get_pages();
    pages
        .get(&page)
        .copied()
        .ok_or(FieldError::PageNotFound {
            page,
            page_count: pages.len(),
        })
}

/// Follow a reference to the object it names
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        _ => Ok(obj),
    }
}

/// Look up a page attribute, walking up the page tree for inheritable ones
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>> {
    let mut node = doc.get_dictionary(page_id)?;

    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Ok(Some(resolve(doc, value)?));
        }
        match node.get(b"Parent").and_then(|p| p.as_reference()) {
            Ok(parent_id) => node = doc.get_dictionary(parent_id)?,
            Err(_) => return Ok(None),
        }
    }

    Ok(None)
}

// =============================================================================
// Geometry
// =============================================================================

/// MediaBox and `/Rotate` of a page
pub(crate) fn page_geometry(doc: &Document, page_id: ObjectId) -> Result<PageGeometry> {
    let media_box = inherited_attribute(doc, page_id, b"MediaBox")?
        .and_then(|obj| parse_rect(doc, obj))
        .unwrap_or_else(|| Rect::new(0.0, 0.0, DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT));

    let degrees = inherited_attribute(doc, page_id, b"Rotate")?
        .and_then(extract_number)
        .map(|d| d.round() as i64)
        .unwrap_or(0);

    Ok(PageGeometry::new(
        media_box,
        PageRotation::from_degrees(degrees)?,
    ))
}

/// Normalized rectangle from a `[llx lly urx ury]` array
fn parse_rect(doc: &Document, obj: &Object) -> Option<Rect> {
    let arr = obj.as_array().ok()?;
    if arr.len() != 4 {
        return None;
    }

    let mut values = [0.0f32; 4];
    for (value, item) in values.iter_mut().zip(arr) {
        *value = extract_number(resolve(doc, item).ok()?)?;
    }
    let [x0, y0, x1, y1] = values;

    Some(Rect::new(
        x0.min(x1),
        y0.min(y1),
        (x1 - x0).abs(),
        (y1 - y0).abs(),
    ))
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

// =============================================================================
// Resources
// =============================================================================

/// A page's resource dictionary, copied out of the page tree so new
/// entries can be added without touching resources shared with other pages.
pub(crate) struct PageResources {
    resources: Dictionary,
}

impl PageResources {
    pub(crate) fn for_page(doc: &Document, page_id: ObjectId) -> Result<Self> {
        let mut resources = match inherited_attribute(doc, page_id, b"Resources")? {
            Some(Object::Dictionary(dict)) => dict.clone(),
            _ => Dictionary::new(),
        };

        // Inline referenced category dictionaries so they can be extended
        for category in [b"Font".as_slice(), b"XObject".as_slice()] {
            if let Ok(Object::Reference(id)) = resources.get(category) {
                let dict = doc.get_dictionary(*id)?.clone();
                resources.set(category.to_vec(), Object::Dictionary(dict));
            }
        }

        Ok(Self { resources })
    }

    pub(crate) fn add_font(&mut self, font_id: ObjectId) -> String {
        self.add(b"Font", "F", font_id)
    }

    pub(crate) fn add_xobject(&mut self, xobject_id: ObjectId) -> String {
        self.add(b"XObject", "Im", xobject_id)
    }

    /// Register an object under the first free `<prefix><n>` name
    fn add(&mut self, category: &[u8], prefix: &str, id: ObjectId) -> String {
        let mut entries = match self.resources.get(category) {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            _ => Dictionary::new(),
        };

        let name = (1..)
            .map(|n| format!("{}{}", prefix, n))
            .find(|name| !entries.has(name.as_bytes()))
            .unwrap_or_default();
        entries.set(name.clone(), Object::Reference(id));
        self.resources
            .set(category.to_vec(), Object::Dictionary(entries));
        name
    }

    pub(crate) fn into_dictionary(self) -> Dictionary {
        self.resources
    }
}

// =============================================================================
// Content
// =============================================================================

/// Append a content stream to a page and replace its resources.
///
/// `existing` comes from [`existing_content_refs`], read before anything
/// was added to the document. The existing content is bracketed by `q`/`Q` so any graphics state it
/// leaves behind does not affect the appended drawing.
pub(crate) fn append_content(
    doc: &mut Document,
    page_id: ObjectId,
    existing: Vec<Object>,
    resources: Dictionary,
    content: Vec<u8>,
) -> Result<()> {
    let mut contents = Vec::with_capacity(existing.len() + 2);
    if existing.is_empty() {
        let id = doc.add_object(Stream::new(Dictionary::new(), content));
        contents.push(Object::Reference(id));
    } else {
        let open_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let mut closing = b"\nQ\n".to_vec();
        closing.extend_from_slice(&content);
        let close_id = doc.add_object(Stream::new(Dictionary::new(), closing));

        contents.push(Object::Reference(open_id));
        contents.extend(existing);
        contents.push(Object::Reference(close_id));
    }

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page.set("Contents", Object::Array(contents));
    page.set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// The page's content streams as a list of references
pub(crate) fn existing_content_refs(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = doc.get_dictionary(page_id)?;
    let refs = match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id)? {
            Object::Array(arr) => arr.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(arr)) => arr.clone(),
        _ => Vec::new(),
    };
    Ok(refs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_page(page: Dictionary) -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let mut page = page;
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        let page_id = doc.add_object(page);

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
        pages.set("Count", Object::Integer(1));
        pages.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(500),
                Object::Integer(300),
            ]),
        );
        pages.set("Rotate", Object::Integer(-90));
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", catalog_id);

        (doc, page_id)
    }

    #[test]
    fn test_find_page() {
        let (doc, page_id) = doc_with_page(Dictionary::new());
        assert_eq!(find_page(&doc, 1).unwrap(), page_id);
        assert!(matches!(
            find_page(&doc, 0),
            Err(FieldError::PageNotFound {
                page: 0,
                page_count: 1
            })
        ));
        assert!(matches!(
            find_page(&doc, 2),
            Err(FieldError::PageNotFound { page: 2, .. })
        ));
    }

    #[test]
    fn test_geometry_inherited_from_page_tree() {
        let (doc, page_id) = doc_with_page(Dictionary::new());
        let geometry = page_geometry(&doc, page_id).unwrap();

        assert_eq!(geometry.media_box, Rect::new(0.0, 0.0, 500.0, 300.0));
        assert_eq!(geometry.rotation, PageRotation::Clockwise270);
    }

    #[test]
    fn test_page_attributes_override_inherited() {
        let page = Dictionary::from_iter(vec![
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Real(612.0),
                    Object::Integer(792),
                    Object::Integer(0),
                    Object::Integer(0),
                ]),
            ),
            ("Rotate", Object::Integer(0)),
        ]);
        let (doc, page_id) = doc_with_page(page);
        let geometry = page_geometry(&doc, page_id).unwrap();

        assert_eq!(geometry.media_box, Rect::new(0.0, 0.0, 612.0, 792.0));
        assert_eq!(geometry.rotation, PageRotation::None);
    }

    #[test]
    fn test_invalid_rotation() {
        let page = Dictionary::from_iter(vec![("Rotate", Object::Integer(45))]);
        let (doc, page_id) = doc_with_page(page);
        assert!(matches!(
            page_geometry(&doc, page_id),
            Err(FieldError::InvalidRotation(45))
        ));
    }

    #[test]
    fn test_resource_names_avoid_existing_entries() {
        let (mut doc, page_id) = doc_with_page(Dictionary::new());
        let font_id = doc.add_object(Dictionary::new());
        let fonts_id = doc.add_object(Dictionary::from_iter(vec![(
            "F1",
            Object::Reference(font_id),
        )]));
        let resources = Dictionary::from_iter(vec![("Font", Object::Reference(fonts_id))]);
        doc.get_object_mut(page_id)
            .unwrap()
            .as_dict_mut()
            .unwrap()
            .set("Resources", Object::Dictionary(resources));

        let mut resources = PageResources::for_page(&doc, page_id).unwrap();
        assert_eq!(resources.add_font(font_id), "F2");
        assert_eq!(resources.add_xobject(font_id), "Im1");
        assert_eq!(resources.add_xobject(font_id), "Im2");

        let dict = resources.into_dictionary();
        let fonts = dict.get(b"Font").unwrap().as_dict().unwrap();
        assert!(fonts.has(b"F1") && fonts.has(b"F2"));

        // The shared font dictionary is left alone
        assert!(!doc.get_dictionary(fonts_id).unwrap().has(b"F2"));
    }

    #[test]
    fn test_append_content_wraps_existing_stream() {
        let (mut doc, page_id) = doc_with_page(Dictionary::new());
        let old = doc.add_object(Stream::new(Dictionary::new(), b"1 0 0 RG".to_vec()));
        doc.get_object_mut(page_id)
            .unwrap()
            .as_dict_mut()
            .unwrap()
            .set("Contents", Object::Reference(old));

        let existing = existing_content_refs(&doc, page_id).unwrap();
        append_content(&mut doc, page_id, existing, Dictionary::new(), b"BT ET\n".to_vec())
            .unwrap();

        let page = doc.get_dictionary(page_id).unwrap();
        let contents = page.get(b"Contents").unwrap().as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1], Object::Reference(old));

        let content = doc.get_page_content(page_id).unwrap();
        let text = String::from_utf8_lossy(&content);
        assert!(text.starts_with("q\n"));
        assert!(text.contains("1 0 0 RG"));
        assert!(text.trim_end().ends_with("BT ET"));
    }

    #[test]
    fn test_append_content_to_blank_page() {
        let (mut doc, page_id) = doc_with_page(Dictionary::new());
        assert!(existing_content_refs(&doc, page_id).unwrap().is_empty());
        append_content(&mut doc, page_id, Vec::new(), Dictionary::new(), b"BT ET\n".to_vec())
            .unwrap();

        let page = doc.get_dictionary(page_id).unwrap();
        assert_eq!(page.get(b"Contents").unwrap().as_array().unwrap().len(), 1);
        assert!(page.has(b"Resources"));
    }

    #[test]
    fn test_dangling_contents_reference() {
        let (doc, page_id) = doc_with_page(Dictionary::from_iter(vec![(
            "Contents",
            Object::Reference((999, 0)),
        )]));
        assert!(matches!(
            existing_content_refs(&doc, page_id),
            Err(FieldError::Pdf(_))
        ));
    }
}
