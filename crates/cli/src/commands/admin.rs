//! Admin account commands.
//!
//! # Usage
//!
//! ```bash
//! # Prompted on stdin
//! fx-cli admin hash-password
//!
//! # Inline (ends up in shell history)
//! fx-cli admin hash-password -p 'correct horse battery'
//! ```
//!
//! Put the printed hash in `ADMIN_PASSWORD_HASH`.

use std::io::{BufRead, Write};

use flavors_admin::services::{AuthError, hash_password as argon2_hash};
use thiserror::Error;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Could not read password: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Hash `password`, or a line read from stdin, and print the PHC string.
///
/// # Errors
///
/// Returns `AdminError` if stdin cannot be read or the password is too short.
pub fn hash_password(password: Option<String>) -> Result<(), AdminError> {
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };

    let hash = argon2_hash(&password)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{hash}");
    }
    tracing::info!("Set ADMIN_PASSWORD_HASH to the value above");
    Ok(())
}

fn read_password() -> Result<String, std::io::Error> {
    #[allow(clippy::print_stderr)]
    {
        eprint!("Password: ");
    }
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
