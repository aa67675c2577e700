use thiserror::Error;

/// Failures talking to the content API.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("content not found")]
    NotFound,

    #[error("content API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not decode content API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("content API response carried no _id")]
    MissingId,
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}
