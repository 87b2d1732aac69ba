//! Fragment combination: merging raw spans into logical text blocks.
//!
//! Spans arrive in extraction order with geometry attached. Per page the
//! combiner detects column structure, sorts each column top to bottom, and
//! sweep-merges runs of spans that continue one another spatially and
//! typographically. The output is the block sequence every later stage
//! works on: page ascending, column left to right, line top to bottom.

use std::collections::BTreeMap;

use crate::config::ExtractOptions;
use crate::model::{Span, TextBlock};

/// One vertical band of a page.
#[derive(Debug, Clone, Copy)]
struct Column {
    left: f32,
    right: f32,
}

impl Column {
    fn contains(&self, span: &Span) -> bool {
        let center = (span.bbox.x0 + span.bbox.x1) / 2.0;
        center >= self.left && center < self.right
    }
}

/// Merges raw spans into [`TextBlock`]s in reading order.
pub struct FragmentCombiner<'a> {
    options: &'a ExtractOptions,
}

impl<'a> FragmentCombiner<'a> {
    /// Create a combiner over the given options.
    pub fn new(options: &'a ExtractOptions) -> Self {
        Self { options }
    }

    /// Merge spans into text blocks in reading order.
    ///
    /// Degenerate (zero-area) and whitespace-only spans are dropped before
    /// grouping; blocks that normalize to nothing or fail the non-content
    /// filter are dropped after.
    pub fn combine(&self, spans: &[Span]) -> Vec<TextBlock> {
        let mut pages: BTreeMap<usize, Vec<&Span>> = BTreeMap::new();
        for span in spans {
            if span.bbox.is_degenerate() || span.text.trim().is_empty() {
                continue;
            }
            pages.entry(span.page).or_default().push(span);
        }

        let mut blocks = Vec::new();
        for (page, page_spans) in pages {
            let page_blocks = self.combine_page(page_spans);
            log::debug!("page {}: {} blocks", page, page_blocks.len());
            blocks.extend(page_blocks);
        }
        blocks
    }

    fn combine_page(&self, spans: Vec<&Span>) -> Vec<TextBlock> {
        let columns = self.detect_columns(&spans);
        if columns.len() <= 1 {
            return self.merge_run(spans);
        }

        let mut column_spans: Vec<Vec<&Span>> = vec![Vec::new(); columns.len()];
        for span in spans {
            let idx = columns
                .iter()
                .position(|c| c.contains(span))
                .unwrap_or(0);
            column_spans[idx].push(span);
        }

        let mut blocks = Vec::new();
        for spans in column_spans {
            blocks.extend(self.merge_run(spans));
        }
        blocks
    }

    /// Sort one column's spans and sweep-merge them into blocks.
    fn merge_run(&self, mut spans: Vec<&Span>) -> Vec<TextBlock> {
        spans.sort_by(|a, b| {
            a.bbox
                .y0
                .partial_cmp(&b.bbox.y0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.order_index.cmp(&b.order_index))
        });

        let mut blocks = Vec::new();
        let mut run: Vec<Span> = Vec::new();
        for span in spans {
            if let Some(prev) = run.last() {
                if self.continues_block(&run, prev, span) {
                    run.push(span.clone());
                    continue;
                }
                flush_run(&mut run, &mut blocks);
            }
            run.push(span.clone());
        }
        flush_run(&mut run, &mut blocks);
        blocks
    }

    /// Whether `next` continues the block currently ending at `prev`.
    fn continues_block(&self, run: &[Span], prev: &Span, next: &Span) -> bool {
        if prev.is_bold != next.is_bold {
            return false;
        }

        let max_size = prev.font_size.max(next.font_size);
        let min_size = prev.font_size.min(next.font_size);
        if (prev.font_size - next.font_size).abs() > self.options.body_size_tolerance * max_size {
            return false;
        }

        if prev.bbox.vertical_gap(&next.bbox) > self.options.vertical_gap_factor * min_size {
            return false;
        }

        if prev.bbox.overlaps_vertically(&next.bbox) {
            // Same line: the horizontal gap must stay word-sized.
            prev.bbox.horizontal_gap(&next.bbox) <= self.options.horizontal_gap_factor * min_size
        } else {
            // Wrap continuation starts at the block's left margin.
            let left = run
                .iter()
                .map(|s| s.bbox.x0)
                .fold(f32::INFINITY, f32::min);
            (next.bbox.x0 - left).abs() <= self.options.horizontal_gap_factor * min_size
        }
    }

    /// Split a page into vertical bands when a persistent gutter divides it.
    ///
    /// The page is cut into thin vertical slices; a run of unoccupied slices
    /// in the middle band that is wide enough, leaves both sides usable, and
    /// has spans on both sides is taken as the gutter.
    fn detect_columns(&self, spans: &[&Span]) -> Vec<Column> {
        if spans.is_empty() {
            return vec![];
        }

        let min_x = spans.iter().map(|s| s.bbox.x0).fold(f32::INFINITY, f32::min);
        let max_x = spans
            .iter()
            .map(|s| s.bbox.x1)
            .fold(f32::NEG_INFINITY, f32::max);
        let page_width = max_x - min_x;

        let single = vec![Column {
            left: min_x - 10.0,
            right: max_x + 10.0,
        }];

        if page_width < 250.0 {
            return single;
        }

        let slice_width = 3.0;
        let num_slices = (page_width / slice_width) as usize + 1;
        let mut occupancy = vec![0usize; num_slices];
        for span in spans {
            let start = ((span.bbox.x0 - min_x) / slice_width) as usize;
            let end = ((span.bbox.x1 - min_x) / slice_width) as usize;
            for slot in occupancy
                .iter_mut()
                .take(end.min(num_slices - 1) + 1)
                .skip(start)
            {
                *slot += 1;
            }
        }

        let required_gap = (self.options.column_gap_ratio * median_font_size(spans)).max(12.0);

        // Best empty run in the middle 15%..85% of the page: prefer clearly
        // wider gaps, then gaps nearer the page center.
        let search_start = num_slices * 15 / 100;
        let search_end = num_slices * 85 / 100;
        let page_center = num_slices / 2;

        let mut best: Option<(usize, usize, f32)> = None;
        let consider = |start: usize, len: usize, best: &mut Option<(usize, usize, f32)>| {
            let width = len as f32 * slice_width;
            if width < required_gap {
                return;
            }
            let center_dist = ((start + len / 2) as i32 - page_center as i32).abs() as f32;
            match best {
                None => *best = Some((start, len, center_dist)),
                Some((_, best_len, best_dist)) => {
                    let best_width = *best_len as f32 * slice_width;
                    if width > best_width * 1.5
                        || (width >= best_width * 0.7 && center_dist < *best_dist)
                    {
                        *best = Some((start, len, center_dist));
                    }
                }
            }
        };

        let mut gap_start = 0usize;
        let mut gap_len = 0usize;
        for i in search_start..search_end.min(num_slices) {
            if occupancy[i] == 0 {
                if gap_len == 0 {
                    gap_start = i;
                }
                gap_len += 1;
            } else {
                consider(gap_start, gap_len, &mut best);
                gap_len = 0;
            }
        }
        consider(gap_start, gap_len, &mut best);

        let Some((start, len, _)) = best else {
            return single;
        };

        let gutter_center = min_x + (start as f32 + len as f32 / 2.0) * slice_width;

        // Both sides must be usable columns.
        if gutter_center - min_x < 80.0 || max_x - gutter_center < 80.0 {
            log::debug!("gutter at x={gutter_center:.1} leaves a too-narrow column");
            return single;
        }

        let left_count = spans
            .iter()
            .filter(|s| (s.bbox.x0 + s.bbox.x1) / 2.0 < gutter_center)
            .count();
        let right_count = spans.len() - left_count;
        let min_count = (spans.len() / 10).max(2);
        if left_count < min_count || right_count < min_count {
            log::debug!("span balance {left_count}/{right_count} too lopsided for columns");
            return single;
        }

        log::debug!(
            "two columns split at x={:.1} (gap {:.1}pt)",
            gutter_center,
            len as f32 * slice_width
        );
        vec![
            Column {
                left: min_x - 10.0,
                right: gutter_center,
            },
            Column {
                left: gutter_center,
                right: max_x + 10.0,
            },
        ]
    }
}

fn flush_run(run: &mut Vec<Span>, blocks: &mut Vec<TextBlock>) {
    if run.is_empty() {
        return;
    }
    let spans = std::mem::take(run);
    if let Some(block) = TextBlock::from_spans(&spans) {
        if is_meaningful(&block.text) {
            blocks.push(block);
        } else {
            log::debug!("dropping non-content block {:?}", block.text);
        }
    }
}

fn median_font_size(spans: &[&Span]) -> f32 {
    let mut sizes: Vec<f32> = spans.iter().map(|s| s.font_size).collect();
    sizes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sizes[sizes.len() / 2]
}

/// Filter for merged text that cannot be outline material: stray fragments,
/// standalone page numbers, decorative rules.
pub(crate) fn is_meaningful(text: &str) -> bool {
    let trimmed = text.trim();
    let char_count = trimmed.chars().count();
    if char_count < 2 {
        return false;
    }
    if char_count <= 4 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let mut printable = trimmed.chars().filter(|c| !c.is_whitespace());
    if let Some(first) = printable.next() {
        if !first.is_alphanumeric() && char_count >= 3 && printable.all(|c| c == first) {
            return false;
        }
    }
    true
}
