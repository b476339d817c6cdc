use thiserror::Error;

#[derive(Debug, Error)]
pub enum PriorsError {
    #[error("failed to read priors table: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse priors table: {0}")]
    Csv(#[from] csv::Error),
}
