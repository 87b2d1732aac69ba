//! Data model for the outline inference pipeline.
//!
//! Spans come in from the decoder, blocks are the combiner's merged output,
//! and the outline is what the pipeline hands to the serializer. Spans and
//! blocks are read-once values; nothing here persists across documents.

mod block;
mod outline;
mod span;

pub use block::TextBlock;
pub use outline::{HeadingCandidate, Level, Outline, OutlineEntry};
pub use span::{BBox, Span};

pub(crate) use block::{is_spaceless_char, size_key};
