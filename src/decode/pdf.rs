//! Document-level span extraction over lopdf.

use std::collections::HashMap;
use std::path::Path;

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};

use super::content::{object_number, ContentInterpreter, FontEntry};
use crate::error::{Error, Result};
use crate::model::Span;

const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// Reads a PDF and yields the positioned text spans the pipeline consumes.
///
/// Page indices are zero-based in extraction order. A page whose content
/// stream cannot be decoded is skipped with a warning; the document only
/// fails as a whole when it cannot be opened or yields no text at all.
#[derive(Debug)]
pub struct PdfDecoder {
    doc: Document,
}

impl PdfDecoder {
    /// Open a document from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let doc = Document::load(path.as_ref()).map_err(|e| Error::Decode(e.to_string()))?;
        Self::from_document(doc)
    }

    /// Open a document already held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes).map_err(|e| Error::Decode(e.to_string()))?;
        Self::from_document(doc)
    }

    fn from_document(doc: Document) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Extract every text span, pages in order.
    pub fn spans(&self) -> Result<Vec<Span>> {
        let mut spans = Vec::new();
        for (index, (number, page_id)) in self.doc.get_pages().into_iter().enumerate() {
            match self.page_spans(index, page_id) {
                Ok(page_spans) => spans.extend(page_spans),
                Err(err) => log::warn!("page {number}: {err}, skipping"),
            }
        }
        if spans.is_empty() {
            return Err(Error::EmptyDocument);
        }
        Ok(spans)
    }

    fn page_spans(&self, index: usize, page_id: ObjectId) -> Result<Vec<Span>> {
        let fonts = self.page_fonts(page_id);
        let height = self.page_height(page_id);
        let data = self.doc.get_page_content(page_id)?;
        let content = Content::decode(&data)?;
        Ok(ContentInterpreter::new(&fonts, index, height).run(&content))
    }

    /// Font resource table for one page, keyed by the resource name the
    /// content stream selects with Tf.
    fn page_fonts(&self, page_id: ObjectId) -> HashMap<Vec<u8>, FontEntry> {
        let mut fonts = HashMap::new();
        let page_fonts = match self.doc.get_page_fonts(page_id) {
            Ok(page_fonts) => page_fonts,
            Err(err) => {
                log::debug!("no usable font table: {err}");
                return fonts;
            }
        };
        for (name, dict) in page_fonts {
            let base_font = dict
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| strip_subset_tag(&String::from_utf8_lossy(n)))
                .unwrap_or_else(|| String::from_utf8_lossy(&name).into_owned());
            let encoding = dict.get(b"Encoding").ok().and_then(|o| match o {
                Object::Name(n) => Some(String::from_utf8_lossy(n).into_owned()),
                _ => None,
            });
            fonts.insert(
                name,
                FontEntry {
                    base_font,
                    encoding,
                },
            );
        }
        fonts
    }

    fn page_height(&self, page_id: ObjectId) -> f32 {
        self.media_box(page_id)
            .map(|(_, height)| height)
            .unwrap_or(DEFAULT_PAGE_HEIGHT)
    }

    /// MediaBox of a page, walking Parent nodes for inherited values.
    fn media_box(&self, page_id: ObjectId) -> Option<(f32, f32)> {
        let mut current = page_id;
        // Hop cap guards against Parent cycles in damaged files.
        for _ in 0..16 {
            let dict = self.doc.get_dictionary(current).ok()?;
            if let Ok(obj) = dict.get(b"MediaBox") {
                if let Some(size) = box_size(&self.doc, obj) {
                    return Some(size);
                }
            }
            current = dict.get(b"Parent").ok().and_then(|o| o.as_reference().ok())?;
        }
        None
    }
}

fn box_size(doc: &Document, obj: &Object) -> Option<(f32, f32)> {
    let resolved = match obj {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let coords: Vec<f32> = resolved
        .as_array()
        .ok()?
        .iter()
        .filter_map(object_number)
        .collect();
    if coords.len() < 4 {
        return None;
    }
    let width = (coords[2] - coords[0]).abs();
    let height = (coords[3] - coords[1]).abs();
    (width > 0.0 && height > 0.0).then_some((width, height))
}

/// Drop the `ABCDEF+` tag subset fonts prepend to their base name.
fn strip_subset_tag(name: &str) -> String {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.chars().all(|c| c.is_ascii_uppercase()) => {
            rest.to_string()
        }
        _ => name.to_string(),
    }
}
