//! # Blog Errors

use thiserror::Error;

use crate::auth::AuthError;

/// Result type for blog operations
pub type BlogResult<T> = Result<T, BlogError>;

/// Errors from post and comment operations
#[derive(Debug, Clone, Error)]
pub enum BlogError {
    /// Authentication, authorization, validation or lookup failure
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The record changed between read and write
    #[error("{kind} {id} was modified by another request")]
    Conflict { kind: &'static str, id: u64 },

    /// Storage operation failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BlogError {
    pub fn not_found(kind: &str, id: u64) -> Self {
        BlogError::Auth(AuthError::NotFound(format!("{} {}", kind, id)))
    }

    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            BlogError::Auth(e) => e.status_code(),
            BlogError::Conflict { .. } => 409,
            BlogError::Storage(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(BlogError::from(AuthError::Unauthorized).status_code(), 403);
        assert_eq!(BlogError::not_found("Post", 4).status_code(), 404);
        assert_eq!(BlogError::Conflict { kind: "Post", id: 1 }.status_code(), 409);
        assert_eq!(BlogError::Storage("x".into()).status_code(), 500);
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(BlogError::not_found("Post", 4).to_string(), "Post 4 not found");
    }
}
