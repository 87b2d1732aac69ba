//! Batch extraction across many documents.

use std::path::PathBuf;

use rayon::prelude::*;

use crate::config::ExtractOptions;
use crate::model::Outline;

/// Result of one document in a batch run.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Source document path.
    pub path: PathBuf,
    /// Extracted outline, or the empty fallback when extraction failed.
    pub outline: Outline,
    /// Failure message when the fallback was taken.
    pub error: Option<String>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Extract outlines from many documents on the rayon thread pool.
///
/// Documents are independent, so the batch fans out freely. A failing
/// document never aborts the run: its outcome carries the empty fallback
/// outline and the failure message, and the failure is logged. Outcomes
/// come back in input order.
pub fn run_batch(paths: &[PathBuf], options: &ExtractOptions) -> Vec<BatchOutcome> {
    paths
        .par_iter()
        .map(|path| match crate::extract_file(path, options) {
            Ok(outline) => BatchOutcome {
                path: path.clone(),
                outline,
                error: None,
            },
            Err(err) => {
                log::warn!("{}: {err}, emitting empty outline", path.display());
                BatchOutcome {
                    path: path.clone(),
                    outline: Outline::empty(),
                    error: Some(err.to_string()),
                }
            }
        })
        .collect()
}
