//! Biaslens library crate (used by the server and integration tests).
//!
//! Classifies news article text into a political-bias category
//! (Left/Center/Right) with a temperature-calibrated probability
//! distribution, and extracts rationale spans explaining the prediction.
//!
//! # Public API Surface
//!
//! ## Core
//! - [`BiasClassifier`], [`ClassifierConfig`], [`Classification`] - calibrated
//!   classification
//! - [`scan_keywords`] - keyword rationale scanner
//! - [`explain_spans`], [`ExplainOptions`] - attribution rationale extractor
//! - [`Pipeline`] - orchestration (title+body concat, one extractor per call)
//!
//! ## Service
//! - [`Config`], [`ConfigError`] - server configuration
//! - [`server::create_router`], [`server::AppState`] - HTTP surface
//! - [`SourcePriors`] - source-level bias ratings
//! - [`Summarizer`] - neutral summaries (LLM with extractive fallback)
//! - [`fetch::fetch_article`] - article fetching/extraction
//!
//! ## Constants
//! Label set, fallback result, and span defaults live in [`constants`];
//! tests reference them by name rather than repeating literals.
//!
//! # Test Support
//! [`ClassifierConfig::stub`] runs the whole core deterministically without
//! model files.

pub mod classifier;
pub mod config;
pub mod constants;
pub mod fetch;
pub mod model;
pub mod pipeline;
pub mod priors;
pub mod rationale;
pub mod server;
pub mod summary;

pub use classifier::{
    BiasClassifier, Classification, ClassifierConfig, ClassifierError, LabelMap,
};
pub use config::{Config, ConfigError};
pub use fetch::{Article, FetchError};
pub use model::ModelError;
pub use pipeline::{Pipeline, PipelineError, compose_input};
pub use priors::{PriorsError, SourcePrior, SourcePriors};
pub use rationale::{
    ExplainError, ExplainOptions, RationaleSpan, SpanSource, explain_spans, scan_keywords,
};
pub use summary::{Summarizer, SummaryConfig, SummaryError};
