//! # pdftoc
//!
//! PDF outline inference library for Rust.
//!
//! This library reads the text layer of a PDF, reconstructs the heading
//! hierarchy from font sizes, boldness, numbering, and layout, and emits
//! the result as a JSON outline.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdftoc::{extract_file, ExtractOptions};
//!
//! fn main() -> pdftoc::Result<()> {
//!     let options = ExtractOptions::default();
//!     let outline = extract_file("document.pdf", &options)?;
//!
//!     println!("Title: {}", outline.title);
//!     for entry in &outline.entries {
//!         println!("{} {} (p.{})", entry.level.as_str(), entry.text, entry.page);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Fragment merging**: fractured text spans are stitched back into
//!   logical blocks, with column-aware reading order
//! - **Font statistics**: heading levels come from each document's own size
//!   ladder, not fixed thresholds
//! - **Numbering awareness**: section numbers like `2.1.3` override
//!   font-derived levels
//! - **Form screening**: label-grid documents yield an empty outline instead
//!   of field-name noise
//! - **Batch mode**: Rayon-parallel extraction across whole directories
//! - **CJK support**: spaceless scripts survive merging and word counting

pub mod batch;
pub mod config;
pub mod decode;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use batch::{run_batch, BatchOutcome};
pub use config::ExtractOptions;
pub use decode::PdfDecoder;
pub use error::{Error, Result};
pub use model::{BBox, HeadingCandidate, Level, Outline, OutlineEntry, Span, TextBlock};
pub use pipeline::extract_outline;
pub use render::JsonFormat;

use std::path::Path;

/// Extract the outline from a PDF file.
///
/// # Arguments
///
/// * `path` - Path to the PDF file
/// * `options` - Pipeline tuning options
///
/// # Example
///
/// ```no_run
/// use pdftoc::{extract_file, ExtractOptions};
///
/// let outline = extract_file("document.pdf", &ExtractOptions::default()).unwrap();
/// println!("{} headings", outline.len());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<Outline> {
    let decoder = PdfDecoder::open(path)?;
    let spans = decoder.spans()?;
    Ok(extract_outline(&spans, options))
}

/// Extract the outline from PDF bytes already in memory.
///
/// # Example
///
/// ```no_run
/// use pdftoc::{extract_bytes, ExtractOptions};
///
/// let data = std::fs::read("document.pdf").unwrap();
/// let outline = extract_bytes(&data, &ExtractOptions::default()).unwrap();
/// ```
pub fn extract_bytes(data: &[u8], options: &ExtractOptions) -> Result<Outline> {
    let decoder = PdfDecoder::from_bytes(data)?;
    let spans = decoder.spans()?;
    Ok(extract_outline(&spans, options))
}

/// Extract positioned text spans without running the outline pipeline.
///
/// Useful for callers that want the raw text layer, or that feed spans
/// through [`extract_outline`] with several option sets.
pub fn extract_spans<P: AsRef<Path>>(path: P) -> Result<Vec<Span>> {
    let decoder = PdfDecoder::open(path)?;
    decoder.spans()
}

/// Extract a PDF's outline straight to JSON.
///
/// # Example
///
/// ```no_run
/// use pdftoc::{to_json, JsonFormat};
///
/// let json = to_json("document.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("outline.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let outline = extract_file(path, &ExtractOptions::default())?;
    render::to_json(&outline, format)
}

/// Builder for configuring and running outline extraction.
///
/// # Example
///
/// ```no_run
/// use pdftoc::{ExtractOptions, Pdftoc};
///
/// let json = Pdftoc::new()
///     .with_options(ExtractOptions::default().with_max_heading_levels(3))
///     .compact()
///     .extract("document.pdf")?
///     .to_json()?;
/// # Ok::<(), pdftoc::Error>(())
/// ```
pub struct Pdftoc {
    options: ExtractOptions,
    format: JsonFormat,
}

impl Pdftoc {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: ExtractOptions::default(),
            format: JsonFormat::default(),
        }
    }

    /// Replace the pipeline options wholesale.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the deepest heading level to emit.
    pub fn with_max_heading_levels(mut self, levels: usize) -> Self {
        self.options = self.options.with_max_heading_levels(levels);
        self
    }

    /// Set the heading word-count cap.
    pub fn with_max_heading_words(mut self, words: usize) -> Self {
        self.options = self.options.with_max_heading_words(words);
        self
    }

    /// Emit compact single-line JSON.
    pub fn compact(mut self) -> Self {
        self.format = JsonFormat::Compact;
        self
    }

    /// Set the JSON output format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Extract the outline from a PDF file.
    pub fn extract<P: AsRef<Path>>(self, path: P) -> Result<PdftocResult> {
        let outline = extract_file(path, &self.options)?;
        Ok(PdftocResult {
            outline,
            format: self.format,
        })
    }

    /// Extract the outline from PDF bytes.
    pub fn extract_bytes(self, data: &[u8]) -> Result<PdftocResult> {
        let outline = extract_bytes(data, &self.options)?;
        Ok(PdftocResult {
            outline,
            format: self.format,
        })
    }
}

impl Default for Pdftoc {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of an outline extraction run.
pub struct PdftocResult {
    /// The inferred outline
    pub outline: Outline,
    /// JSON format to use when serializing
    format: JsonFormat,
}

impl PdftocResult {
    /// Serialize the outline to JSON.
    pub fn to_json(&self) -> Result<String> {
        render::to_json(&self.outline, self.format)
    }

    /// Borrow the outline.
    pub fn outline(&self) -> &Outline {
        &self.outline
    }
}
