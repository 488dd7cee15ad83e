use rocket::{Request, catch};
use shared::error::{Error, ErrorCode};

#[catch(400)]
pub fn bad_request(_req: &Request) -> Error {
    Error::new(ErrorCode::BadRequest, "Malformed request body.")
}

#[catch(403)]
pub fn forbidden(_req: &Request) -> Error {
    Error::new(ErrorCode::Unauthorized, "Access forbidden.")
}

#[catch(404)]
pub fn not_found(_req: &Request) -> Error {
    Error::new(ErrorCode::NotFound, "The requested resource was not found.")
}

#[catch(422)]
pub fn unprocessable(_req: &Request) -> Error {
    Error::new(ErrorCode::ValidationFailed, "Request body did not match the expected shape.")
}

#[catch(429)]
pub fn too_many_requests(_req: &Request) -> Error {
    Error::new(ErrorCode::RateLimited, "Rate limit exceeded. Please wait before trying again.")
}

#[catch(500)]
pub fn internal_error(_req: &Request) -> Error {
    Error::new(ErrorCode::SystemError, "An internal server error occurred.")
}

#[catch(503)]
pub fn unavailable(_req: &Request) -> Error {
    Error::new(ErrorCode::Unavailable, "Vote storage is temporarily unavailable.")
}
