//! Document-wide font statistics: body baseline and heading-size ladder.

use std::collections::HashMap;

use crate::config::ExtractOptions;
use crate::model::{size_key, TextBlock};

/// Character-weighted font-size distribution for one document.
///
/// Body paragraphs dominate by character volume, not by block count, so the
/// histogram weighs each block by its character count. Computed once per
/// document and passed around immutably.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    /// Font size judged to be ordinary paragraph text
    pub body_size: f32,

    /// Distinct heading sizes above the body band, descending, one per rung
    pub ladder: Vec<f32>,

    /// Character-weighted counts keyed at 0.1pt precision
    size_histogram: HashMap<i32, usize>,
}

impl FontStatistics {
    /// Build and analyze statistics over the combined blocks.
    pub fn from_blocks(blocks: &[TextBlock], options: &ExtractOptions) -> Self {
        let mut stats = Self::default();
        for block in blocks {
            stats.add_block(block);
        }
        stats.analyze(options);
        stats
    }

    /// Add one block's observation.
    pub fn add_block(&mut self, block: &TextBlock) {
        *self
            .size_histogram
            .entry(size_key(block.dominant_font_size))
            .or_insert(0) += block.char_count();
    }

    /// Compute the body baseline and the heading-size ladder.
    ///
    /// The ladder keeps distinct sizes above the body band, merges sizes
    /// within the relative tolerance into one rung, and truncates to
    /// `max_heading_levels` so rounding-noise sizes cannot fragment it.
    pub fn analyze(&mut self, options: &ExtractOptions) {
        if self.size_histogram.is_empty() {
            self.body_size = 12.0;
            self.ladder.clear();
            return;
        }

        // Highest weighted count wins; ties go to the smaller size.
        let (body_key, _) = self
            .size_histogram
            .iter()
            .max_by(|(ka, ca), (kb, cb)| ca.cmp(cb).then(kb.cmp(ka)))
            .map(|(k, c)| (*k, *c))
            .unwrap_or((120, 0));
        self.body_size = body_key as f32 / 10.0;

        let threshold = self.heading_threshold(options.body_size_tolerance);
        let mut sizes: Vec<f32> = self
            .size_histogram
            .keys()
            .map(|k| *k as f32 / 10.0)
            .filter(|s| *s > threshold)
            .collect();
        sizes.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        let mut ladder: Vec<f32> = Vec::new();
        for size in sizes {
            match ladder.last() {
                Some(&rung) if rung - size <= options.body_size_tolerance * rung => {
                    // Within tolerance of the rung above: same rung.
                }
                _ => ladder.push(size),
            }
        }
        ladder.truncate(options.max_heading_levels);

        log::debug!(
            "font stats: body={:.1}pt, ladder={:?}",
            self.body_size,
            ladder
        );
        self.ladder = ladder;
    }

    /// Smallest size that counts as above the body band.
    pub fn heading_threshold(&self, tolerance: f32) -> f32 {
        (self.body_size * (1.0 + tolerance)).max(self.body_size + 0.5)
    }

    /// Ladder rung index for a size above the body band.
    ///
    /// Returns `None` for body-band sizes. A size above the band that
    /// matches no rung within tolerance (noise squeezed out by truncation)
    /// acts as the deepest rung.
    pub fn rung_for(&self, size: f32, tolerance: f32) -> Option<usize> {
        if self.ladder.is_empty() || size <= self.heading_threshold(tolerance) {
            return None;
        }

        let mut best: Option<(usize, f32)> = None;
        for (i, &rung) in self.ladder.iter().enumerate() {
            let diff = (size - rung).abs();
            if diff <= tolerance * rung.max(size) && best.map_or(true, |(_, d)| diff < d) {
                best = Some((i, diff));
            }
        }
        Some(best.map_or(self.ladder.len() - 1, |(i, _)| i))
    }
}
