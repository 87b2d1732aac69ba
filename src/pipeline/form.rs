//! Form-document detection over classified blocks.

use std::collections::HashMap;

use super::stats::FontStatistics;
use crate::config::ExtractOptions;
use crate::model::HeadingCandidate;

/// Word count at or below which a block reads as a label or field.
const SHORT_BLOCK_WORDS: usize = 4;

/// Vertical bucket height when grouping blocks into rows.
const ROW_BUCKET_PT: f32 = 3.0;

/// Maximum fraction of heading-sized blocks a form may carry.
const HEADING_SIZED_CEILING: f32 = 0.05;

/// Flags documents that are dominated by short label/field fragments laid
/// out in rows, where a heading outline would be meaningless.
pub struct FormDetector<'a> {
    options: &'a ExtractOptions,
    stats: &'a FontStatistics,
}

impl<'a> FormDetector<'a> {
    pub fn new(options: &'a ExtractOptions, stats: &'a FontStatistics) -> Self {
        Self { options, stats }
    }

    /// True when the fraction of label-like blocks exceeds the configured
    /// threshold and heading-sized text is nearly absent.
    pub fn looks_like_form(&self, candidates: &[HeadingCandidate]) -> bool {
        if candidates.is_empty() {
            return false;
        }
        let total = candidates.len() as f32;

        // Real heading-sized text rules out the form reading early. TOC and
        // chapter pages are full of short lines but keep their outlines.
        let heading_sized = candidates
            .iter()
            .filter(|c| {
                self.stats
                    .rung_for(c.block.dominant_font_size, self.options.body_size_tolerance)
                    .is_some()
            })
            .count() as f32;
        if heading_sized / total > HEADING_SIZED_CEILING {
            return false;
        }

        let mut label_like = vec![false; candidates.len()];
        for (i, candidate) in candidates.iter().enumerate() {
            if candidate.block.word_count() <= SHORT_BLOCK_WORDS {
                label_like[i] = true;
            }
        }

        // Rows holding blocks in separate horizontal bands read as
        // label/field pairs even when the cells run past the word cap.
        let mut rows: HashMap<(usize, i64), Vec<usize>> = HashMap::new();
        for (i, candidate) in candidates.iter().enumerate() {
            let bucket = (candidate.block.bbox.y0 / ROW_BUCKET_PT).round() as i64;
            rows.entry((candidate.block.page, bucket)).or_default().push(i);
        }
        for members in rows.values() {
            if members.len() >= 2 && has_distinct_bands(candidates, members) {
                for &i in members {
                    label_like[i] = true;
                }
            }
        }

        let score = label_like.iter().filter(|hit| **hit).count() as f32 / total;
        log::debug!(
            "form score {:.2} over {} blocks (threshold {:.2})",
            score,
            candidates.len(),
            self.options.form_detection_threshold
        );
        score > self.options.form_detection_threshold
    }
}

/// Whether any two row members occupy non-overlapping x-ranges.
fn has_distinct_bands(candidates: &[HeadingCandidate], members: &[usize]) -> bool {
    for (offset, &a) in members.iter().enumerate() {
        for &b in &members[offset + 1..] {
            let left = &candidates[a].block.bbox;
            let right = &candidates[b].block.bbox;
            if left.x1 <= right.x0 || right.x1 <= left.x0 {
                return true;
            }
        }
    }
    false
}
