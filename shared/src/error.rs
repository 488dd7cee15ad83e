use serde::{Serialize, Deserialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    #[error("Invalid request")]
    BadRequest,
    #[error("Validation failed")]
    ValidationFailed,
    #[error("Resource not found")]
    NotFound,
    #[error("Operation not authorized")]
    Unauthorized,
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("Vote storage unavailable")]
    Unavailable,
    #[error("Internal system error")]
    SystemError,
}

/// Error envelope returned to API callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(details) = &self.details {
            write!(f, "{}: {} ({})", self.code, self.message, details)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details.into()),
        }
    }
}

#[cfg(feature = "backend")]
mod backend_impl {
    use super::*;
    use rocket::http::Status;
    use rocket::response::{self, Responder};
    use rocket::serde::json::Json;
    use rocket::{Request, Response};

    impl ErrorCode {
        pub fn status(self) -> Status {
            match self {
                ErrorCode::BadRequest => Status::BadRequest,
                ErrorCode::ValidationFailed => Status::UnprocessableEntity,
                ErrorCode::NotFound => Status::NotFound,
                ErrorCode::Unauthorized => Status::Forbidden,
                ErrorCode::RateLimited => Status::TooManyRequests,
                ErrorCode::Unavailable => Status::ServiceUnavailable,
                ErrorCode::SystemError => Status::InternalServerError,
            }
        }
    }

    impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
        fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
            let status = self.code.status();
            Response::build_from(Json(self).respond_to(req)?)
                .status(status)
                .ok()
        }
    }
}
