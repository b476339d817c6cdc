use std::sync::Arc;

use crate::pipeline::Pipeline;
use crate::priors::SourcePriors;
use crate::summary::Summarizer;

/// Shared handler state; everything inside is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub priors: Arc<SourcePriors>,
    pub summarizer: Arc<Summarizer>,
    pub http_client: reqwest::Client,
    pub max_fetch_chars: usize,
    pub model_name: String,
}

impl AppState {
    pub fn new(
        pipeline: Arc<Pipeline>,
        priors: Arc<SourcePriors>,
        summarizer: Arc<Summarizer>,
        http_client: reqwest::Client,
        max_fetch_chars: usize,
        model_name: String,
    ) -> Self {
        Self {
            pipeline,
            priors,
            summarizer,
            http_client,
            max_fetch_chars,
            model_name,
        }
    }
}
