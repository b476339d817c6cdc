//! Prediction pipeline.
//!
//! Thin orchestration over the classifier and the two rationale extractors:
//! concatenate title and body, classify, then attach spans from exactly one
//! extractor per call.

mod error;

#[cfg(test)]
mod tests;

pub use error::PipelineError;

use std::sync::Arc;
use tracing::debug;

use crate::classifier::{BiasClassifier, Classification};
use crate::constants::DEFAULT_TOP_K_SPANS;
use crate::rationale::{ExplainOptions, explain_spans, scan_keywords};

/// Orchestrates classification and rationale extraction.
pub struct Pipeline {
    classifier: Arc<BiasClassifier>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("classifier", &self.classifier)
            .finish()
    }
}

impl Pipeline {
    pub fn new(classifier: Arc<BiasClassifier>) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &BiasClassifier {
        &self.classifier
    }

    /// Classifies `title` + `text` and populates rationale spans.
    ///
    /// The title is classified together with the body (title first, blank
    /// line between, both trimmed). Spans come from the attribution
    /// explainer when `use_attribution` is set, from the keyword scanner
    /// otherwise; the two sets are never blended.
    pub fn predict(
        &self,
        title: Option<&str>,
        text: &str,
        use_attribution: bool,
    ) -> Result<Classification, PipelineError> {
        let full_text = compose_input(title, text);
        let mut result = self.classifier.classify(&full_text)?;

        if full_text.trim().is_empty() {
            // the neutral fallback carries no spans
            return Ok(result);
        }

        result.rationale_spans = if use_attribution {
            debug!(target = result.class_index, "extracting attribution spans");
            explain_spans(
                &self.classifier,
                &full_text,
                result.class_index,
                &ExplainOptions::default(),
            )?
        } else {
            scan_keywords(&full_text, DEFAULT_TOP_K_SPANS)
        };

        Ok(result)
    }
}

/// Joins title and body: title first, blank-line separator, each trimmed.
pub fn compose_input(title: Option<&str>, text: &str) -> String {
    let title = title.unwrap_or("").trim();
    let text = text.trim();
    if title.is_empty() {
        text.to_string()
    } else if text.is_empty() {
        title.to_string()
    } else {
        format!("{}\n\n{}", title, text)
    }
}
