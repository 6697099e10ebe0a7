use thiserror::Error;

use crate::catalog::FilterError;
use crate::quote::QuoteError;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Everything a page can fail with. All variants are recoverable and are
/// rendered as a one-line message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("you are not logged in or your session has expired, please log in again")]
    Unauthorized,

    /// A page's data could not be loaded; carries the rendered cause
    #[error("{0}")]
    Unavailable(String),

    /// Local state (the token file) could not be written or removed
    #[error("could not update local session: {0:#}")]
    Storage(anyhow::Error),

    #[error("unexpected response from the server: {0}")]
    Decode(String),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

impl ApiError {
    /// Whether the user has to log in before retrying
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// Client-side validation failures, never sent to the API
    pub fn is_input(&self) -> bool {
        matches!(self, ApiError::Quote(_) | ApiError::Filter(_))
    }
}
