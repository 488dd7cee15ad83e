use rocket::response::Responder;
use shared::error::{Error, ErrorCode};
use shared::validation::ValidationError;
use thiserror::Error;

use crate::bootstrap::BootstrapError;
use crate::store::StoreError;

/// Failure of a vote submission or removal. Either variant means neither the
/// store nor the cache was changed.
#[derive(Error, Debug)]
pub enum VoteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("No vote from {user} on '{word}'")]
    NotFound { user: String, word: String },
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl VoteError {
    pub fn code(&self) -> ErrorCode {
        match self {
            VoteError::Validation(_) => ErrorCode::ValidationFailed,
            VoteError::NotFound { .. } => ErrorCode::NotFound,
            VoteError::Persistence(_) => ErrorCode::Unavailable,
        }
    }
}

impl From<VoteError> for Error {
    fn from(err: VoteError) -> Self {
        match &err {
            VoteError::Validation(v) => Error::with_details(err.code(), err.to_string(), v.field().to_string()),
            VoteError::Persistence(_) => Error::with_details(err.code(), "Vote could not be saved, please retry", err.to_string()),
            VoteError::NotFound { .. } => Error::new(err.code(), err.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Vote(#[from] VoteError),
    #[error("Rate limit exceeded. Please try again in {retry_after_secs} seconds.")]
    RateLimited { retry_after_secs: u64 },
    #[error("Missing or invalid admin token")]
    Unauthorized,
    #[error(transparent)]
    Reload(#[from] BootstrapError),
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Vote(e) => e.into(),
            ApiError::RateLimited { .. } => Error::new(ErrorCode::RateLimited, err.to_string()),
            ApiError::Unauthorized => Error::new(ErrorCode::Unauthorized, err.to_string()),
            ApiError::Reload(e) => Error::with_details(ErrorCode::Unavailable, "Reload failed", e.to_string()),
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        Error::from(self).respond_to(req)
    }
}
