use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid article url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("article fetch failed: {0}")]
    Http(#[from] reqwest::Error),
}
