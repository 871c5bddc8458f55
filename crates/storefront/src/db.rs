//! Database connection for the storefront.
//!
//! # Database: `flavors`
//!
//! Shared with the admin binary:
//!
//! - `menu_item` - Menu catalog (read-only here)
//! - `tower_sessions.session` - Session storage, including each visitor's cart
//!
//! # Migrations
//!
//! Migrations live in `migrations/` at the workspace root and are run via:
//! ```bash
//! cargo run -p flavors-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
