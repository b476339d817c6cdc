use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("summary request failed: {0}")]
    OpenAi(#[from] async_openai::error::OpenAIError),

    #[error("summary model returned an empty response")]
    EmptyResponse,
}
