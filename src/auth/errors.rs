//! # Auth Errors
//!
//! Error types for the authentication module.

use thiserror::Error;

use super::validate::ValidationErrors;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication and authorization errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // ==================
    // Authentication Errors
    // ==================

    /// Stored credential or token is missing its `|` separator
    #[error("Malformed credential")]
    InvalidCredentialFormat,

    /// Unknown user or wrong password (generic - don't leak which)
    #[error("Invalid login")]
    InvalidCredentials,

    /// No verified session identity on the request
    #[error("Authentication required")]
    AuthenticationRequired,

    // ==================
    // Authorization Errors
    // ==================

    /// Identity does not own the target resource
    #[error("Not authorized to modify this resource")]
    Unauthorized,

    /// Target resource does not exist
    #[error("{0} not found")]
    NotFound(String),

    // ==================
    // Input Errors
    // ==================

    /// One or more fields rejected; all failures are reported together
    #[error("Invalid input: {0}")]
    Validation(ValidationErrors),

    // ==================
    // Internal Errors
    // ==================

    /// Storage operation failed
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            AuthError::Validation(_) => 400,

            // 401 Unauthorized
            AuthError::InvalidCredentialFormat => 401,
            AuthError::InvalidCredentials => 401,
            AuthError::AuthenticationRequired => 401,

            // 403 Forbidden
            AuthError::Unauthorized => 403,

            // 404 Not Found
            AuthError::NotFound(_) => 404,

            // 500 Internal Server Error
            AuthError::StorageError(_) => 500,
        }
    }

    /// Lock poisoning shows up the same way in every in-memory repository
    pub(crate) fn lock_poisoned() -> Self {
        AuthError::StorageError("Lock poisoned".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::validate::Field;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::AuthenticationRequired.status_code(), 401);
        assert_eq!(AuthError::Unauthorized.status_code(), 403);
        assert_eq!(AuthError::NotFound("Post 1".into()).status_code(), 404);
        assert_eq!(AuthError::StorageError("x".into()).status_code(), 500);
    }

    #[test]
    fn test_error_messages_do_not_leak_info() {
        let err = AuthError::InvalidCredentials;
        assert!(!err.to_string().contains("password"));
        assert!(!err.to_string().contains("user"));
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let mut errors = ValidationErrors::default();
        errors.push(Field::Username, "That's not a valid username.");
        errors.push(Field::Email, "That's not a valid email.");

        let message = AuthError::Validation(errors).to_string();
        assert!(message.contains("username"));
        assert!(message.contains("email"));
    }

    #[test]
    fn test_lock_poisoned_is_server_error() {
        assert_eq!(AuthError::lock_poisoned().status_code(), 500);
    }
}
