//! Tuning options for the outline inference pipeline.

/// Options controlling fragment merging, classification, and form detection.
///
/// All options have calibrated defaults; none are required. The options
/// value is read-only during a pipeline run, so one instance can be shared
/// across a whole batch.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Deepest heading level to emit (1..=6)
    pub max_heading_levels: usize,

    /// Relative tolerance around the body font size; also merges ladder
    /// rungs and bounds the size spread inside one block
    pub body_size_tolerance: f32,

    /// Word-count cap above which a block is always body text
    pub max_heading_words: usize,

    /// Fraction of short label-like blocks that flags a form document
    pub form_detection_threshold: f32,

    /// Multiplier of the page's median font size a gutter must exceed to
    /// split the page into columns
    pub column_gap_ratio: f32,

    /// Multiplier of the smaller span's font size bounding the vertical gap
    /// inside one block
    pub vertical_gap_factor: f32,

    /// Multiplier of the font size bounding the horizontal gap between
    /// same-line spans
    pub horizontal_gap_factor: f32,
}

impl ExtractOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the deepest heading level (clamped to 1..=6).
    pub fn with_max_heading_levels(mut self, levels: usize) -> Self {
        self.max_heading_levels = levels.clamp(1, 6);
        self
    }

    /// Set the relative body-size tolerance.
    pub fn with_body_size_tolerance(mut self, tolerance: f32) -> Self {
        self.body_size_tolerance = tolerance.max(0.0);
        self
    }

    /// Set the heading word-count cap.
    pub fn with_max_heading_words(mut self, words: usize) -> Self {
        self.max_heading_words = words.max(1);
        self
    }

    /// Set the form detection threshold (clamped to 0..=1).
    pub fn with_form_detection_threshold(mut self, threshold: f32) -> Self {
        self.form_detection_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the column gap ratio.
    pub fn with_column_gap_ratio(mut self, ratio: f32) -> Self {
        self.column_gap_ratio = ratio.max(0.0);
        self
    }

    /// Set the vertical merge gap factor.
    pub fn with_vertical_gap_factor(mut self, factor: f32) -> Self {
        self.vertical_gap_factor = factor.max(0.0);
        self
    }

    /// Set the horizontal merge gap factor.
    pub fn with_horizontal_gap_factor(mut self, factor: f32) -> Self {
        self.horizontal_gap_factor = factor.max(0.0);
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_heading_levels: 6,
            body_size_tolerance: 0.15,
            max_heading_words: 20,
            form_detection_threshold: 0.6,
            column_gap_ratio: 1.5,
            vertical_gap_factor: 0.6,
            horizontal_gap_factor: 1.2,
        }
    }
}
