//! Merged text blocks produced by fragment combination.

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

use super::span::{BBox, Span};

/// A merged, logically contiguous run of spans on one page.
///
/// Blocks are immutable once produced and hold no reference back to the raw
/// spans that formed them.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    /// Concatenated span text, whitespace-normalized
    pub text: String,

    /// Union of the contributing span boxes
    pub bbox: BBox,

    /// Zero-based page index
    pub page: usize,

    /// Font size of the character-count majority of contributing spans
    pub dominant_font_size: f32,

    /// Bold when the majority of contributing characters were bold
    pub is_bold: bool,

    /// Number of spans merged into this block
    pub span_count: usize,
}

impl TextBlock {
    /// Build a block from the spans merged into it, in reading order.
    ///
    /// Text is NFC-normalized and whitespace-collapsed; spaces are inserted
    /// between spans only where the geometry implies a word gap, so a word
    /// split across two runs reassembles seamlessly. Returns `None` when
    /// nothing printable remains or no spans were given.
    pub fn from_spans(spans: &[Span]) -> Option<Self> {
        let first = spans.first()?;

        let text = normalize_text(&join_spans(spans));
        if text.is_empty() {
            return None;
        }

        let bbox = spans
            .iter()
            .skip(1)
            .fold(first.bbox, |acc, s| acc.union(&s.bbox));

        let mut bold_chars = 0usize;
        let mut total_chars = 0usize;
        // Key at 0.1pt precision so float noise does not split sizes.
        let mut size_weights: HashMap<i32, usize> = HashMap::new();
        for span in spans {
            let chars = span.char_count().max(1);
            total_chars += chars;
            if span.is_bold {
                bold_chars += chars;
            }
            *size_weights.entry(size_key(span.font_size)).or_insert(0) += chars;
        }

        let dominant_key = size_weights
            .iter()
            .max_by(|(ka, ca), (kb, cb)| ca.cmp(cb).then(ka.cmp(kb)))
            .map(|(k, _)| *k)
            .unwrap_or_else(|| size_key(first.font_size));

        Some(Self {
            text,
            bbox,
            page: first.page,
            dominant_font_size: dominant_key as f32 / 10.0,
            is_bold: bold_chars * 2 > total_chars,
            span_count: spans.len(),
        })
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Number of characters, the histogram weight of this block.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Top edge of the block, the vertical sort key.
    pub fn y(&self) -> f32 {
        self.bbox.y0
    }
}

/// Concatenate span texts, adding a space only where geometry implies one.
fn join_spans(spans: &[Span]) -> String {
    let mut out = String::new();
    for (i, span) in spans.iter().enumerate() {
        if i > 0 && needs_space(&spans[i - 1], span) {
            out.push(' ');
        }
        out.push_str(&span.text);
    }
    out
}

/// Whether a space belongs between two adjacent spans.
fn needs_space(prev: &Span, next: &Span) -> bool {
    // Existing whitespace at the seam collapses later.
    if prev.text.ends_with(char::is_whitespace) || next.text.starts_with(char::is_whitespace) {
        return false;
    }
    // A line break always separates words.
    if !prev.bbox.overlaps_vertically(&next.bbox) {
        return true;
    }
    let seam_spaceless = prev.text.chars().last().map(is_spaceless_char).unwrap_or(false)
        || next.text.chars().next().map(is_spaceless_char).unwrap_or(false);
    if seam_spaceless {
        return false;
    }
    // Roughly a space glyph's width at this size.
    let space_width = 0.25 * prev.font_size.min(next.font_size);
    prev.bbox.horizontal_gap(&next.bbox) > space_width
}

/// Scripts written without inter-word spaces (CJK ranges).
pub(crate) fn is_spaceless_char(c: char) -> bool {
    matches!(c as u32,
        0x3000..=0x303F
            | 0x3040..=0x309F
            | 0x30A0..=0x30FF
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xF900..=0xFAFF
            | 0xFF00..=0xFF60)
}

/// NFC-normalize and collapse runs of whitespace to single spaces.
fn normalize_text(text: &str) -> String {
    let composed: String = text.nfc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Histogram key at 0.1pt precision.
pub(crate) fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}
