//! Title selection from early heading candidates.

use std::cmp::Ordering;

use super::stats::FontStatistics;
use crate::config::ExtractOptions;
use crate::model::{size_key, HeadingCandidate, Level};

/// Gap multiplier under which stacked same-size lines read as one wrapped
/// title. Looser than block merging so display leading still connects.
const WRAP_GAP_FACTOR: f32 = 1.5;

/// Picks the document title from the largest heading-sized text near the
/// front of the document. Chosen candidates are re-leveled to [`Level::Title`]
/// so they never reappear as outline entries.
pub struct TitleSelector<'a> {
    options: &'a ExtractOptions,
    stats: &'a FontStatistics,
}

impl<'a> TitleSelector<'a> {
    pub fn new(options: &'a ExtractOptions, stats: &'a FontStatistics) -> Self {
        Self { options, stats }
    }

    /// Select and mark the title, returning its text. Empty when the first
    /// two pages carry no heading-sized candidate.
    pub fn select_title(&self, candidates: &mut [HeadingCandidate]) -> String {
        let best = self
            .best_on_page(candidates, 0)
            .or_else(|| self.best_on_page(candidates, 1));
        let Some(best) = best else {
            return String::new();
        };

        let page = candidates[best].page();
        let key = size_key(candidates[best].block.dominant_font_size);

        // Grow over adjacent same-size lines so wrapped titles come out whole.
        let mut start = best;
        while start > 0 && self.continues_title(candidates, start - 1, start, page, key) {
            start -= 1;
        }
        let mut end = best;
        while end + 1 < candidates.len() && self.continues_title(candidates, end, end + 1, page, key)
        {
            end += 1;
        }

        let mut parts = Vec::with_capacity(end - start + 1);
        for candidate in &mut candidates[start..=end] {
            candidate.level = Some(Level::Title);
            parts.push(candidate.block.text.clone());
        }
        let title = parts.join(" ");
        log::debug!("selected title {:?} from page {}", title, page);
        title
    }

    /// Title material must sit above the body baseline. Style-promoted
    /// body-sized headings stay in the outline but never become the title.
    fn qualifies(&self, candidate: &HeadingCandidate) -> bool {
        candidate.is_heading()
            && self
                .stats
                .rung_for(
                    candidate.block.dominant_font_size,
                    self.options.body_size_tolerance,
                )
                .is_some()
    }

    fn best_on_page(&self, candidates: &[HeadingCandidate], page: usize) -> Option<usize> {
        candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.page() == page && self.qualifies(c))
            .max_by(|(_, a), (_, b)| {
                a.block
                    .dominant_font_size
                    .partial_cmp(&b.block.dominant_font_size)
                    .unwrap_or(Ordering::Equal)
                    .then(b.y().partial_cmp(&a.y()).unwrap_or(Ordering::Equal))
                    .then(
                        a.rank_score
                            .partial_cmp(&b.rank_score)
                            .unwrap_or(Ordering::Equal),
                    )
            })
            .map(|(i, _)| i)
    }

    fn continues_title(
        &self,
        candidates: &[HeadingCandidate],
        upper: usize,
        lower: usize,
        page: usize,
        key: i32,
    ) -> bool {
        let a = &candidates[upper];
        let b = &candidates[lower];
        if a.page() != page || b.page() != page {
            return false;
        }
        if !self.qualifies(a) || !self.qualifies(b) {
            return false;
        }
        if size_key(a.block.dominant_font_size) != key
            || size_key(b.block.dominant_font_size) != key
        {
            return false;
        }
        let gap_limit =
            WRAP_GAP_FACTOR * a.block.dominant_font_size.max(b.block.dominant_font_size);
        a.block.bbox.vertical_gap(&b.block.bbox) <= gap_limit
    }
}
