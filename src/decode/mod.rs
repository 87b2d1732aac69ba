//! PDF text extraction: the span source feeding the pipeline.
//!
//! Built on lopdf. The decoder walks each page's content stream with a
//! simplified text-matrix interpreter and emits spans in extraction order
//! with top-origin geometry, estimated glyph boxes, and font attributes
//! resolved from the page's font resources.

mod content;
mod pdf;

pub use pdf::PdfDecoder;
