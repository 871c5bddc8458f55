//! Admin authentication error types.

use thiserror::Error;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] flavors_core::EmailError),

    /// Wrong email or password; the two are not distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password too short to hash.
    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// The blocking verification task did not complete.
    #[error("verification task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
