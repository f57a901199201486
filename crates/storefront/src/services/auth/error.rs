//! Authentication error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] ecofinds_core::EmailError),

    /// Username is empty or only whitespace.
    #[error("username is required")]
    EmptyUsername,

    /// Password is empty.
    #[error("password is required")]
    EmptyPassword,

    /// Another account already uses this email or username.
    #[error("user already exists")]
    DuplicateIdentity,

    /// No account matches this email and password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Persisting identity state failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
