use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApifyError>;

#[derive(Debug, Error)]
pub enum ApifyError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Dataset parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The actor finished in FAILED, ABORTED or TIMED-OUT.
    #[error("Run failed with status: {0}")]
    RunFailed(String),
}
