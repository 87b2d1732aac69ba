//! Final outline assembly: filter, order, deduplicate.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::model::{HeadingCandidate, Level, Outline, OutlineEntry};

/// Turns classified candidates into the serialized outline shape.
pub struct OutlineAssembler;

impl OutlineAssembler {
    /// Emit heading entries sorted by page then vertical position. Exact
    /// `(page, text, level)` duplicates collapse to the first occurrence.
    pub fn assemble(title: String, candidates: Vec<HeadingCandidate>) -> Outline {
        let mut headings: Vec<HeadingCandidate> = candidates
            .into_iter()
            .filter(|c| c.level.is_some_and(|level| level.is_heading()))
            .collect();

        headings.sort_by(|a, b| {
            a.page().cmp(&b.page()).then(
                a.y()
                    .partial_cmp(&b.y())
                    .unwrap_or(Ordering::Equal),
            )
        });

        let mut outline = Outline::new(title);
        let mut seen: HashSet<(usize, String, Level)> = HashSet::new();
        for candidate in headings {
            let level = candidate.level.unwrap_or(Level::H1);
            let key = (candidate.page(), candidate.block.text.clone(), level);
            if seen.insert(key) {
                let page = candidate.page();
                outline.push(OutlineEntry::new(level, candidate.block.text, page));
            }
        }
        outline
    }
}
