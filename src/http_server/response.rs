//! Mapping of service errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use serde::Serialize;

use crate::auth::{AuthError, ValidationErrors};
use crate::blog::BlogError;

/// Where unauthenticated requests are sent, on every route
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub errors: ValidationErrors,
}

/// Error returned from handlers
#[derive(Debug)]
pub struct HttpError(pub BlogError);

impl From<BlogError> for HttpError {
    fn from(err: BlogError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for HttpError {
    fn from(err: AuthError) -> Self {
        Self(BlogError::Auth(err))
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self.0 {
            BlogError::Auth(AuthError::AuthenticationRequired) => {
                Redirect::to(LOGIN_PATH).into_response()
            }
            BlogError::Auth(AuthError::Validation(errors)) => {
                (StatusCode::BAD_REQUEST, Json(ValidationResponse { errors })).into_response()
            }
            err => {
                let status = StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                if status.is_server_error() {
                    tracing::error!(error = %err, "request failed");
                }
                let body = ErrorResponse {
                    error: err.to_string(),
                    code: status.as_u16(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}
