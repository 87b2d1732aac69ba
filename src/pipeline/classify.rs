//! Heading-level classification: font rungs, style overrides, numbering.

use regex::Regex;

use super::stats::FontStatistics;
use crate::config::ExtractOptions;
use crate::model::{HeadingCandidate, Level, TextBlock};

/// Maps blocks to heading levels using the document's font statistics plus
/// style and numbering signals. Candidates preserve block order; the
/// classification is total and never fails.
pub struct HierarchyClassifier<'a> {
    options: &'a ExtractOptions,
    stats: &'a FontStatistics,
    numbering: Regex,
}

impl<'a> HierarchyClassifier<'a> {
    /// Create a classifier over precomputed statistics.
    pub fn new(options: &'a ExtractOptions, stats: &'a FontStatistics) -> Self {
        Self {
            options,
            stats,
            // Section-numbering prefix: "3.", "2)", "1.2.4 ". Two digits at
            // most in the lead segment so years never match.
            numbering: Regex::new(r"^(\d{1,2}(?:\.\d+)*)[.)]?\s+\S").unwrap(),
        }
    }

    /// Classify every block, preserving order.
    pub fn classify(&self, blocks: Vec<TextBlock>) -> Vec<HeadingCandidate> {
        let isolated: Vec<bool> = (0..blocks.len()).map(|i| is_isolated(&blocks, i)).collect();
        blocks
            .into_iter()
            .zip(isolated)
            .map(|(block, iso)| self.classify_block(block, iso))
            .collect()
    }

    fn classify_block(&self, block: TextBlock, isolated: bool) -> HeadingCandidate {
        let word_count = block.word_count();

        // Headings are never full paragraphs, whatever their font says.
        if word_count > self.options.max_heading_words {
            return HeadingCandidate::body(block);
        }

        let max_rank = self.options.max_heading_levels.saturating_sub(1);
        let font_level = self
            .stats
            .rung_for(block.dominant_font_size, self.options.body_size_tolerance)
            .and_then(|rung| Level::from_rank(rung.min(max_rank)));

        let depth = self.numbering_depth(&block.text);
        let short = word_count <= self.options.max_heading_words / 2;
        let caps = short && is_all_caps(&block.text);
        // Isolation alone is too weak: pull quotes and airy paragraphs sit
        // on their own lines too. It only promotes alongside numbering.
        let styled = short && (block.is_bold || caps || (isolated && depth.is_some()));

        let mut level = font_level;
        let mut numbering_override = false;

        // A body-sized block with heading styling slots in below the ladder.
        if level.is_none() && styled {
            let rank = self.stats.ladder.len().min(max_rank);
            level = Level::from_rank(rank);
        }

        // Explicit numbering is the stronger structural signal: its dotted
        // depth decides the level whenever the block is a heading at all.
        if let Some(depth) = depth {
            if level.is_some() {
                let depth_level = Level::from_depth(depth.min(self.options.max_heading_levels));
                if depth_level != level {
                    numbering_override = true;
                    log::debug!(
                        "numbering depth {} overrides {:?} for {:?}",
                        depth,
                        level,
                        block.text
                    );
                    level = depth_level;
                }
            }
        }

        if level.is_none() {
            return HeadingCandidate::body(block);
        }

        let rank_score = self.rank_score(&block, depth.is_some(), caps, isolated);
        HeadingCandidate {
            block,
            level,
            rank_score,
            numbering_override,
        }
    }

    /// Dotted numbering depth of the block text, if it starts with one.
    fn numbering_depth(&self, text: &str) -> Option<usize> {
        self.numbering
            .captures(text)
            .map(|caps| caps[1].split('.').count())
    }

    /// Internal tie-break score; higher means a more heading-like block.
    fn rank_score(&self, block: &TextBlock, numbered: bool, caps: bool, isolated: bool) -> f32 {
        let mut score = 0.0;
        if block.dominant_font_size / self.stats.body_size.max(1.0) >= 1.2 {
            score += 3.0;
        }
        if block.is_bold {
            score += 2.0;
        }
        if (2..=15).contains(&block.word_count()) {
            score += 1.0;
        }
        if numbered {
            score += 1.5;
        }
        if caps {
            score += 1.0;
        }
        if isolated {
            score += 0.5;
        }
        score
    }
}

/// Whether the block sits on its own line with clear space above and below.
///
/// A side with no stacked neighbor on the same page counts as clear.
fn is_isolated(blocks: &[TextBlock], i: usize) -> bool {
    let block = &blocks[i];
    let threshold = 1.5 * block.dominant_font_size;

    let clear_above = match i.checked_sub(1).map(|j| &blocks[j]) {
        Some(prev) if prev.page == block.page && x_overlap(prev, block) => {
            prev.bbox.vertical_gap(&block.bbox) > threshold
        }
        _ => true,
    };
    let clear_below = match blocks.get(i + 1) {
        Some(next) if next.page == block.page && x_overlap(block, next) => {
            block.bbox.vertical_gap(&next.bbox) > threshold
        }
        _ => true,
    };
    clear_above && clear_below
}

fn x_overlap(a: &TextBlock, b: &TextBlock) -> bool {
    a.bbox.x0 < b.bbox.x1 && b.bbox.x0 < a.bbox.x1
}

/// True when every cased character is uppercase and at least one exists.
fn is_all_caps(text: &str) -> bool {
    let mut has_upper = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_upper = true;
        }
    }
    has_upper
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Span};

    fn block_at(text: &str, size: f32, font: &str, page: usize, y: f32) -> TextBlock {
        let width = text.chars().count() as f32 * size * 0.5;
        let span = Span::new(
            text,
            BBox::new(50.0, y, 50.0 + width, y + size),
            page,
            size,
            font,
            0,
        );
        TextBlock::from_spans(&[span]).unwrap()
    }

    fn body_blocks(count: usize, page: usize) -> Vec<TextBlock> {
        (0..count)
            .map(|i| {
                block_at(
                    &format!("ordinary paragraph text number {i} running along the page"),
                    12.0,
                    "Times",
                    page,
                    200.0 + i as f32 * 14.0,
                )
            })
            .collect()
    }

    fn classify(blocks: Vec<TextBlock>) -> Vec<HeadingCandidate> {
        let options = ExtractOptions::default();
        let stats = FontStatistics::from_blocks(&blocks, &options);
        HierarchyClassifier::new(&options, &stats).classify(blocks)
    }

    #[test]
    fn test_numbering_depth_parsing() {
        let options = ExtractOptions::default();
        let stats = FontStatistics::default();
        let classifier = HierarchyClassifier::new(&options, &stats);

        assert_eq!(classifier.numbering_depth("1. Background"), Some(1));
        assert_eq!(classifier.numbering_depth("2) Scope"), Some(1));
        assert_eq!(classifier.numbering_depth("1.2 Data Collection"), Some(2));
        assert_eq!(classifier.numbering_depth("1.2.3. Sampling"), Some(3));
        assert_eq!(classifier.numbering_depth("10 Appendices"), Some(1));
        // Years and bare numbers are not section numbers.
        assert_eq!(classifier.numbering_depth("2026 annual report"), None);
        assert_eq!(classifier.numbering_depth("7"), None);
        assert_eq!(classifier.numbering_depth("No. 5 in the series"), None);
    }

    #[test]
    fn test_rung_levels_and_numbering_override() {
        let mut blocks = vec![
            block_at("Report Title", 24.0, "Helvetica", 0, 60.0),
            block_at("1. Background", 16.0, "Helvetica", 0, 120.0),
            block_at("2. Methods", 16.0, "Helvetica", 1, 80.0),
        ];
        blocks.extend(body_blocks(40, 0));

        let candidates = classify(blocks);

        // Largest rung, no numbering: stays at the font level.
        assert_eq!(candidates[0].level, Some(Level::H1));
        assert!(!candidates[0].numbering_override);

        // Second rung by font, depth one by numbering: numbering wins.
        assert_eq!(candidates[1].level, Some(Level::H1));
        assert!(candidates[1].numbering_override);
        assert_eq!(candidates[2].level, Some(Level::H1));

        assert!(candidates[3..].iter().all(|c| c.level.is_none()));
    }

    #[test]
    fn test_numbering_depth_beats_font_rung() {
        let mut blocks = vec![
            block_at("Overview", 20.0, "Helvetica", 0, 60.0),
            block_at("1.2 Data Collection", 20.0, "Helvetica", 0, 120.0),
        ];
        blocks.extend(body_blocks(40, 0));

        let candidates = classify(blocks);
        assert_eq!(candidates[0].level, Some(Level::H1));
        assert!(!candidates[0].numbering_override);
        assert_eq!(candidates[1].level, Some(Level::H2));
        assert!(candidates[1].numbering_override);
    }

    #[test]
    fn test_word_cap_demotes_to_body() {
        let long = "A heading sized line that rambles on far past the word
            cap with clause after clause until it reads like body text"
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let mut blocks = vec![block_at(&long, 20.0, "Helvetica", 0, 60.0)];
        blocks.extend(body_blocks(40, 0));

        let candidates = classify(blocks);
        assert!(candidates[0].level.is_none());
    }

    #[test]
    fn test_bold_short_block_promoted() {
        let mut blocks = vec![block_at("Overview", 20.0, "Helvetica", 0, 60.0)];
        blocks.extend(body_blocks(40, 0));
        // Body-sized but bold, short, and isolated between paragraphs.
        blocks.push(block_at("Important Notice", 12.0, "Times-Bold", 0, 820.0));

        let candidates = classify(blocks);
        let promoted = candidates.last().unwrap();
        // One rung below the single-rung ladder.
        assert_eq!(promoted.level, Some(Level::H2));
    }

    #[test]
    fn test_isolated_plain_text_stays_body() {
        // Generous leading does not turn prose into headings.
        let blocks: Vec<TextBlock> = (0..20)
            .map(|i| {
                block_at(
                    "a short line with plenty of air",
                    12.0,
                    "Times",
                    0,
                    100.0 + i as f32 * 40.0,
                )
            })
            .collect();
        let candidates = classify(blocks);
        assert!(candidates.iter().all(|c| c.level.is_none()));
    }

    #[test]
    fn test_numbered_list_item_stays_body() {
        let mut blocks = body_blocks(6, 0);
        // Tucked between paragraphs, regular weight: a list item.
        blocks.insert(
            3,
            block_at("3. apply the coating evenly", 12.0, "Times", 0, 243.0),
        );
        let candidates = classify(blocks);
        assert!(candidates[3].level.is_none());
    }

    #[test]
    fn test_all_caps_short_promoted() {
        let mut blocks = body_blocks(40, 0);
        blocks.push(block_at("TABLE OF CONTENTS", 12.0, "Times", 0, 820.0));
        blocks.push(block_at("Overview", 20.0, "Times", 0, 900.0));

        let candidates = classify(blocks);
        let caps = &candidates[40];
        assert_eq!(caps.level, Some(Level::H2));
    }

    #[test]
    fn test_is_all_caps() {
        assert!(is_all_caps("INTRODUCTION"));
        assert!(is_all_caps("SECTION 2"));
        assert!(!is_all_caps("Intro"));
        assert!(!is_all_caps("第一章"));
        assert!(!is_all_caps("42"));
    }

    #[test]
    fn test_isolation() {
        let blocks = vec![
            block_at("paragraph above the heading", 12.0, "Times", 0, 100.0),
            block_at("Standalone Heading", 12.0, "Times", 0, 160.0),
            block_at("paragraph below the heading", 12.0, "Times", 0, 220.0),
            block_at("tightly packed line", 12.0, "Times", 0, 236.0),
            block_at("another tight line", 12.0, "Times", 0, 252.0),
        ];
        assert!(is_isolated(&blocks, 1));
        assert!(!is_isolated(&blocks, 3));
    }
}
