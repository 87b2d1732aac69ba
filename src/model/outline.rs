//! Outline types: heading levels, candidates, and the assembled result.

use serde::{Deserialize, Serialize};

use super::TextBlock;

/// Classification assigned to a block.
///
/// A closed set internally; only the JSON boundary renders these as strings
/// (`"title"`, `"H1"` .. `"H6"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    /// Document title, never emitted as an outline entry
    #[serde(rename = "title")]
    Title,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl Level {
    /// Map a ladder rung index to a heading level (0 maps to H1).
    pub fn from_rank(rank: usize) -> Option<Level> {
        match rank {
            0 => Some(Level::H1),
            1 => Some(Level::H2),
            2 => Some(Level::H3),
            3 => Some(Level::H4),
            4 => Some(Level::H5),
            5 => Some(Level::H6),
            _ => None,
        }
    }

    /// Map a dotted numbering depth to a heading level (1 maps to H1).
    ///
    /// Depths past H6 clamp to H6.
    pub fn from_depth(depth: usize) -> Option<Level> {
        match depth {
            0 => None,
            d => Level::from_rank((d - 1).min(5)),
        }
    }

    /// Heading depth: 1 for H1 through 6 for H6, 0 for the title.
    pub fn depth(&self) -> usize {
        match self {
            Level::Title => 0,
            Level::H1 => 1,
            Level::H2 => 2,
            Level::H3 => 3,
            Level::H4 => 4,
            Level::H5 => 5,
            Level::H6 => 6,
        }
    }

    /// True for H1..H6, false for the title.
    pub fn is_heading(&self) -> bool {
        !matches!(self, Level::Title)
    }

    /// The serialized form of this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Title => "title",
            Level::H1 => "H1",
            Level::H2 => "H2",
            Level::H3 => "H3",
            Level::H4 => "H4",
            Level::H5 => "H5",
            Level::H6 => "H6",
        }
    }
}

/// A block annotated with its inferred level.
#[derive(Debug, Clone)]
pub struct HeadingCandidate {
    /// The classified block
    pub block: TextBlock,

    /// Inferred level; `None` marks body text, excluded from output
    pub level: Option<Level>,

    /// Internal tie-break score, never serialized
    pub rank_score: f32,

    /// Set when dotted numbering depth overrode the font-size rung
    pub numbering_override: bool,
}

impl HeadingCandidate {
    /// A candidate classified as body text.
    pub fn body(block: TextBlock) -> Self {
        Self {
            block,
            level: None,
            rank_score: 0.0,
            numbering_override: false,
        }
    }

    /// True when classified H1..H6.
    pub fn is_heading(&self) -> bool {
        matches!(self.level, Some(level) if level.is_heading())
    }

    /// Page of the underlying block.
    pub fn page(&self) -> usize {
        self.block.page
    }

    /// Vertical position of the underlying block.
    pub fn y(&self) -> f32 {
        self.block.y()
    }
}

/// One assembled outline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level (H1..H6)
    pub level: Level,

    /// Heading text
    pub text: String,

    /// Zero-based page index
    pub page: usize,
}

impl OutlineEntry {
    /// Create a new entry.
    pub fn new(level: Level, text: impl Into<String>, page: usize) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// The inferred document outline.
///
/// Entries are sorted by `(page ascending, vertical position ascending)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Document title, empty when none was detected
    pub title: String,

    /// Flat heading list in reading order
    #[serde(rename = "outline")]
    pub entries: Vec<OutlineEntry>,
}

impl Outline {
    /// Create an outline with a title and no entries.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    /// The fallback value for failed documents: empty title, no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, entry: OutlineEntry) {
        self.entries.push(entry);
    }

    /// Whether the outline has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
