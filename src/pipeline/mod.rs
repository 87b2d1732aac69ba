//! Outline inference pipeline.
//!
//! Stages run in a fixed order over immutable snapshots: spans are combined
//! into blocks, font statistics derive the body baseline and heading ladder,
//! blocks are classified into levels, form-like documents short-circuit to an
//! empty entry list, and the survivors are titled, ordered, and deduplicated.
//! No state leaks across documents, so batch runs can fan out freely.

pub mod assemble;
pub mod classify;
pub mod combiner;
pub mod form;
pub mod stats;
pub mod title;

pub use assemble::OutlineAssembler;
pub use classify::HierarchyClassifier;
pub use combiner::FragmentCombiner;
pub use form::FormDetector;
pub use stats::FontStatistics;
pub use title::TitleSelector;

use crate::config::ExtractOptions;
use crate::model::{Outline, Span};

/// Run the full pipeline over one document's spans.
///
/// Pure and total: heuristics degrade to a body classification instead of
/// failing, and a document with no usable blocks yields an empty outline.
pub fn extract_outline(spans: &[Span], options: &ExtractOptions) -> Outline {
    if spans.is_empty() {
        return Outline::empty();
    }

    let blocks = FragmentCombiner::new(options).combine(spans);
    if blocks.is_empty() {
        return Outline::empty();
    }

    let stats = FontStatistics::from_blocks(&blocks, options);
    let mut candidates = HierarchyClassifier::new(options, &stats).classify(blocks);

    let is_form = FormDetector::new(options, &stats).looks_like_form(&candidates);
    let title = TitleSelector::new(options, &stats).select_title(&mut candidates);

    if is_form {
        log::debug!(
            "form-like layout, dropping {} heading candidates",
            candidates.len()
        );
        return Outline::new(title);
    }
    OutlineAssembler::assemble(title, candidates)
}
