//! Content-stream interpretation: PDF text operators to positioned spans.

use std::collections::HashMap;

use lopdf::content::Content;
use lopdf::Object;

use crate::model::{is_spaceless_char, BBox, Span};

/// Portion of the em square above the baseline when estimating glyph boxes.
const ASCENT_RATIO: f32 = 0.8;

/// Estimated glyph advance as a fraction of the font size.
const LATIN_ADVANCE: f32 = 0.5;
const CJK_ADVANCE: f32 = 1.0;

/// Kerning adjustment (thousandths of an em) wide enough to read as a word
/// space inside a TJ array.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Font resource attributes needed to decode and label shown text.
pub(super) struct FontEntry {
    pub base_font: String,
    pub encoding: Option<String>,
}

/// Text-object state while walking one page's operators.
///
/// Tracks a simplified text matrix plus the line origin, so line operators
/// return to the line start rather than the advanced show position.
struct TextState {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    x: f32,
    y: f32,
    line_x: f32,
    line_y: f32,
    leading: f32,
    font_size: f32,
    font_key: Vec<u8>,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            x: 0.0,
            y: 0.0,
            line_x: 0.0,
            line_y: 0.0,
            // Sane fallback for streams that use ' without setting TL.
            leading: 12.0,
            font_size: 12.0,
            font_key: Vec::new(),
        }
    }
}

impl TextState {
    /// BT resets the matrices; font and leading survive text objects.
    fn begin_text(&mut self) {
        self.a = 1.0;
        self.b = 0.0;
        self.c = 0.0;
        self.d = 1.0;
        self.x = 0.0;
        self.y = 0.0;
        self.line_x = 0.0;
        self.line_y = 0.0;
    }

    fn set_matrix(&mut self, m: [f32; 6]) {
        self.a = m[0];
        self.b = m[1];
        self.c = m[2];
        self.d = m[3];
        self.x = m[4];
        self.y = m[5];
        self.line_x = self.x;
        self.line_y = self.y;
    }

    /// Td and friends move relative to the current line origin.
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_x += tx * self.a + ty * self.c;
        self.line_y += tx * self.b + ty * self.d;
        self.x = self.line_x;
        self.y = self.line_y;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    /// Advance the show position by a text-space width.
    fn advance(&mut self, width: f32) {
        self.x += width * self.a;
        self.y += width * self.b;
    }

    /// Vertical scale of the text matrix, the font-size multiplier.
    fn v_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }

    fn h_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }
}

/// Walks one page's decoded content and collects positioned text spans.
///
/// Coordinates come out top-origin: y0 is the distance from the page top to
/// the estimated glyph top, so ascending y reads down the page.
pub(super) struct ContentInterpreter<'a> {
    fonts: &'a HashMap<Vec<u8>, FontEntry>,
    page: usize,
    page_height: f32,
}

impl<'a> ContentInterpreter<'a> {
    pub fn new(fonts: &'a HashMap<Vec<u8>, FontEntry>, page: usize, page_height: f32) -> Self {
        Self {
            fonts,
            page,
            page_height,
        }
    }

    pub fn run(&self, content: &Content) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut state = TextState::default();
        let mut in_text = false;
        let mut order = 0usize;

        for op in &content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text = true;
                    state.begin_text();
                }
                "ET" => {
                    in_text = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(name) = &op.operands[0] {
                            state.font_key = name.clone();
                        }
                        state.font_size = object_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(object_number) {
                        state.leading = leading;
                    }
                }
                "Td" => {
                    if op.operands.len() >= 2 {
                        let tx = object_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = object_number(&op.operands[1]).unwrap_or(0.0);
                        state.move_line(tx, ty);
                    }
                }
                "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = object_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = object_number(&op.operands[1]).unwrap_or(0.0);
                        state.leading = -ty;
                        state.move_line(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        let mut m = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
                        for (slot, operand) in m.iter_mut().zip(&op.operands) {
                            if let Some(v) = object_number(operand) {
                                *slot = v;
                            }
                        }
                        state.set_matrix(m);
                    }
                }
                "T*" => state.next_line(),
                "Tj" => {
                    if in_text {
                        if let Some(Object::String(bytes, _)) = op.operands.first() {
                            let text = self.decode_string(&state.font_key, bytes);
                            let width = text_advance(&text) * state.font_size;
                            self.emit(&mut state, text, width, &mut spans, &mut order);
                        }
                    }
                }
                "'" => {
                    state.next_line();
                    if in_text {
                        if let Some(Object::String(bytes, _)) = op.operands.first() {
                            let text = self.decode_string(&state.font_key, bytes);
                            let width = text_advance(&text) * state.font_size;
                            self.emit(&mut state, text, width, &mut spans, &mut order);
                        }
                    }
                }
                "\"" => {
                    state.next_line();
                    if in_text {
                        if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                            let text = self.decode_string(&state.font_key, bytes);
                            let width = text_advance(&text) * state.font_size;
                            self.emit(&mut state, text, width, &mut spans, &mut order);
                        }
                    }
                }
                "TJ" => {
                    if in_text {
                        if let Some(Object::Array(items)) = op.operands.first() {
                            self.show_array(&mut state, items, &mut spans, &mut order);
                        }
                    }
                }
                _ => {}
            }
        }
        spans
    }

    /// A TJ array becomes one span; large negative adjustments between its
    /// strings stand in for word spaces.
    fn show_array(
        &self,
        state: &mut TextState,
        items: &[Object],
        spans: &mut Vec<Span>,
        order: &mut usize,
    ) {
        let mut text = String::new();
        let mut width = 0.0f32;

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let piece = self.decode_string(&state.font_key, bytes);
                    width += text_advance(&piece) * state.font_size;
                    text.push_str(&piece);
                }
                Object::Integer(_) | Object::Real(_) => {
                    let adjustment = -object_number(item).unwrap_or(0.0);
                    width += adjustment / 1000.0 * state.font_size;
                    if adjustment > TJ_SPACE_THRESHOLD {
                        let last = text.chars().last();
                        let breakable = matches!(last, Some(c)
                            if !c.is_whitespace() && !is_spaceless_char(c));
                        if breakable {
                            text.push(' ');
                        }
                    }
                }
                _ => {}
            }
        }

        self.emit(state, text, width, spans, order);
    }

    /// Record a span at the current position and advance past it. Runs that
    /// are blank still advance so the line keeps its shape.
    fn emit(
        &self,
        state: &mut TextState,
        text: String,
        width: f32,
        spans: &mut Vec<Span>,
        order: &mut usize,
    ) {
        let start_x = state.x;
        let start_y = state.y;
        state.advance(width);

        if text.trim().is_empty() {
            return;
        }

        let size = (state.font_size * state.v_scale()).abs().max(1.0);
        let box_width = (width * state.h_scale()).max(1.0);
        let top = self.page_height - start_y - ASCENT_RATIO * size;
        let bbox = BBox::new(start_x, top, start_x + box_width, top + size);

        let font_name = self
            .fonts
            .get(&state.font_key)
            .map(|f| f.base_font.clone())
            .unwrap_or_else(|| String::from_utf8_lossy(&state.font_key).into_owned());

        spans.push(Span::new(text, bbox, self.page, size, font_name, *order));
        *order += 1;
    }

    /// Decode shown bytes using the font's declared encoding as a hint.
    fn decode_string(&self, font_key: &[u8], bytes: &[u8]) -> String {
        if let Some(entry) = self.fonts.get(font_key) {
            if let Some(name) = entry.encoding.as_deref() {
                // Identity-H/V fonts show 2-byte codes that usually map
                // straight to Unicode code units.
                if name.contains("Identity") && bytes.len() >= 2 && bytes.len() % 2 == 0 {
                    let units: Vec<u16> = bytes
                        .chunks(2)
                        .map(|c| u16::from_be_bytes([c[0], c[1]]))
                        .collect();
                    let decoded = String::from_utf16_lossy(&units);
                    if !decoded.is_empty()
                        && !decoded.chars().all(|c| c == '\u{FFFD}' || c == '\0')
                    {
                        return decoded;
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }
}

/// Estimated advance of a string in em units.
fn text_advance(text: &str) -> f32 {
    text.chars()
        .map(|c| {
            if is_spaceless_char(c) {
                CJK_ADVANCE
            } else {
                LATIN_ADVANCE
            }
        })
        .sum()
}

/// Numeric operand, integer or real.
pub(super) fn object_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Byte-string decoding when no usable encoding is declared: UTF-16BE with
/// BOM, then UTF-8, then Latin-1.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter(|c| c.len() == 2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Operation;

    fn interpreter(fonts: &HashMap<Vec<u8>, FontEntry>) -> ContentInterpreter<'_> {
        ContentInterpreter::new(fonts, 0, 792.0)
    }

    fn helvetica() -> HashMap<Vec<u8>, FontEntry> {
        let mut fonts = HashMap::new();
        fonts.insert(
            b"F1".to_vec(),
            FontEntry {
                base_font: "Helvetica-Bold".to_string(),
                encoding: None,
            },
        );
        fonts
    }

    fn text_ops(ops: Vec<Operation>) -> Content {
        Content { operations: ops }
    }

    #[test]
    fn test_tj_span_position_and_size() {
        let fonts = helvetica();
        let content = text_ops(vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Real(24.0)],
            ),
            Operation::new("Td", vec![Object::Real(72.0), Object::Real(700.0)]),
            Operation::new("Tj", vec![Object::string_literal("Title")]),
            Operation::new("ET", vec![]),
        ]);

        let spans = interpreter(&fonts).run(&content);
        assert_eq!(spans.len(), 1);
        let span = &spans[0];
        assert_eq!(span.text, "Title");
        assert_eq!(span.font_size, 24.0);
        assert!(span.is_bold);
        assert_eq!(span.page, 0);
        assert!((span.bbox.x0 - 72.0).abs() < 0.01);
        // Baseline at 700 from the bottom of a 792pt page, 0.8em ascent.
        let expected_top = 792.0 - 700.0 - 0.8 * 24.0;
        assert!((span.bbox.y0 - expected_top).abs() < 0.01);
        // Five latin glyphs at half an em each.
        assert!((span.bbox.width() - 5.0 * 12.0).abs() < 0.01);
    }

    #[test]
    fn test_consecutive_shows_advance_x() {
        let fonts = helvetica();
        let content = text_ops(vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Real(10.0)],
            ),
            Operation::new("Td", vec![Object::Real(50.0), Object::Real(500.0)]),
            Operation::new("Tj", vec![Object::string_literal("abcd")]),
            Operation::new("Tj", vec![Object::string_literal("efgh")]),
            Operation::new("ET", vec![]),
        ]);

        let spans = interpreter(&fonts).run(&content);
        assert_eq!(spans.len(), 2);
        // Second run starts where the first one's estimated advance ended.
        assert!((spans[0].bbox.x0 - 50.0).abs() < 0.01);
        assert!((spans[1].bbox.x0 - 70.0).abs() < 0.01);
        assert_eq!(spans[1].order_index, 1);
    }

    #[test]
    fn test_tm_scale_multiplies_font_size() {
        let fonts = helvetica();
        let content = text_ops(vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Real(12.0)],
            ),
            Operation::new(
                "Tm",
                vec![
                    Object::Real(2.0),
                    Object::Real(0.0),
                    Object::Real(0.0),
                    Object::Real(2.0),
                    Object::Real(100.0),
                    Object::Real(600.0),
                ],
            ),
            Operation::new("Tj", vec![Object::string_literal("Big")]),
            Operation::new("ET", vec![]),
        ]);

        let spans = interpreter(&fonts).run(&content);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].font_size, 24.0);
    }

    #[test]
    fn test_td_walks_lines_downward() {
        let fonts = helvetica();
        let content = text_ops(vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Real(12.0)],
            ),
            Operation::new("Td", vec![Object::Real(50.0), Object::Real(700.0)]),
            Operation::new("Tj", vec![Object::string_literal("first")]),
            Operation::new("Td", vec![Object::Real(0.0), Object::Real(-14.0)]),
            Operation::new("Tj", vec![Object::string_literal("second")]),
            Operation::new("ET", vec![]),
        ]);

        let spans = interpreter(&fonts).run(&content);
        assert_eq!(spans.len(), 2);
        // Lower on the page means a larger top-origin y, and the second Td
        // returns to the line start x even after the first show advanced.
        assert!(spans[1].bbox.y0 > spans[0].bbox.y0);
        assert!((spans[1].bbox.y0 - spans[0].bbox.y0 - 14.0).abs() < 0.01);
        assert!((spans[1].bbox.x0 - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_tl_and_quote_step_by_leading() {
        let fonts = helvetica();
        let content = text_ops(vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Real(12.0)],
            ),
            Operation::new("TL", vec![Object::Real(20.0)]),
            Operation::new("Td", vec![Object::Real(50.0), Object::Real(700.0)]),
            Operation::new("Tj", vec![Object::string_literal("first")]),
            Operation::new("'", vec![Object::string_literal("second")]),
            Operation::new("ET", vec![]),
        ]);

        let spans = interpreter(&fonts).run(&content);
        assert_eq!(spans.len(), 2);
        assert!((spans[1].bbox.y0 - spans[0].bbox.y0 - 20.0).abs() < 0.01);
    }

    #[test]
    fn test_tj_array_kerning_space() {
        let fonts = helvetica();
        let content = text_ops(vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Real(12.0)],
            ),
            Operation::new("Td", vec![Object::Real(50.0), Object::Real(500.0)]),
            Operation::new(
                "TJ",
                vec![Object::Array(vec![
                    Object::string_literal("Hello"),
                    Object::Integer(-300),
                    Object::string_literal("world"),
                    Object::Integer(-40),
                    Object::string_literal("!"),
                ])],
            ),
            Operation::new("ET", vec![]),
        ]);

        let spans = interpreter(&fonts).run(&content);
        assert_eq!(spans.len(), 1);
        // The wide adjustment reads as a space, the kerning one does not.
        assert_eq!(spans[0].text, "Hello world!");
    }

    #[test]
    fn test_text_outside_bt_et_ignored() {
        let fonts = helvetica();
        let content = text_ops(vec![
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Real(12.0)],
            ),
            Operation::new("Tj", vec![Object::string_literal("stray")]),
        ]);
        assert!(interpreter(&fonts).run(&content).is_empty());
    }

    #[test]
    fn test_blank_show_advances_without_span() {
        let fonts = helvetica();
        let content = text_ops(vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Real(10.0)],
            ),
            Operation::new("Td", vec![Object::Real(50.0), Object::Real(500.0)]),
            Operation::new("Tj", vec![Object::string_literal("  ")]),
            Operation::new("Tj", vec![Object::string_literal("text")]),
            Operation::new("ET", vec![]),
        ]);

        let spans = interpreter(&fonts).run(&content);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].order_index, 0);
        // Two blank glyphs at half an em pushed the start over by 10pt.
        assert!((spans[0].bbox.x0 - 60.0).abs() < 0.01);
    }

    #[test]
    fn test_decode_text_simple_variants() {
        assert_eq!(decode_text_simple(b"Hello, world!"), "Hello, world!");
        assert_eq!(decode_text_simple("café".as_bytes()), "café");
        // UTF-16BE with BOM.
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42]), "AB");
        // Odd trailing byte is dropped, not fatal.
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x41, 0x42]), "A");
        // Invalid UTF-8 falls back to Latin-1.
        assert_eq!(decode_text_simple(&[0xE9]), "é");
        assert_eq!(decode_text_simple(&[]), "");
    }

    #[test]
    fn test_identity_encoding_decodes_utf16() {
        let mut fonts = HashMap::new();
        fonts.insert(
            b"F2".to_vec(),
            FontEntry {
                base_font: "NotoSansCJK".to_string(),
                encoding: Some("Identity-H".to_string()),
            },
        );
        let content = text_ops(vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F2".to_vec()), Object::Real(12.0)],
            ),
            Operation::new("Td", vec![Object::Real(50.0), Object::Real(500.0)]),
            // U+7AE0 "章" as a two-byte code.
            Operation::new(
                "Tj",
                vec![Object::String(
                    vec![0x7A, 0xE0],
                    lopdf::StringFormat::Hexadecimal,
                )],
            ),
            Operation::new("ET", vec![]),
        ]);

        let spans = interpreter(&fonts).run(&content);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "章");
        // CJK glyphs advance a full em.
        assert!((spans[0].bbox.width() - 12.0).abs() < 0.01);
    }
}
