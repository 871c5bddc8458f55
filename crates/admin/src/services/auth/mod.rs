//! Admin authentication service.
//!
//! The dashboard has a single owner account configured through
//! `ADMIN_EMAIL` and `ADMIN_PASSWORD_HASH`. Passwords are checked with
//! Argon2id on the blocking pool.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use flavors_core::Email;
use secrecy::{ExposeSecret, SecretString};

use crate::config::AdminCredentials;
use crate::models::CurrentAdmin;

/// Minimum password length accepted by [`hash_password`].
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    credentials: &'a AdminCredentials,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(credentials: &'a AdminCredentials) -> Self {
        Self { credentials }
    }

    /// Check an email and password against the configured account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` for a malformed email and
    /// `AuthError::InvalidCredentials` for any mismatch.
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentAdmin, AuthError> {
        let email = Email::parse(email)?;
        let email_matches = email == self.credentials.email;

        // The hash runs even when the email does not match
        let hash = self.credentials.password_hash.clone();
        let password = SecretString::from(password.to_owned());
        let verified = tokio::task::spawn_blocking(move || {
            verify_password(password.expose_secret(), hash.expose_secret())
        })
        .await?;

        if email_matches && verified.is_ok() {
            tracing::info!(admin = %email, "admin signed in");
            Ok(CurrentAdmin { email })
        } else {
            tracing::warn!(attempted = %email, "failed admin sign-in");
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` for passwords shorter than
/// [`MIN_PASSWORD_LENGTH`] and `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword {
            min: MIN_PASSWORD_LENGTH,
        });
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
