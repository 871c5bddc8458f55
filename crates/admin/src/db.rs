//! Database connection for admin.
//!
//! # Database: `flavors`
//!
//! Shared with the storefront:
//!
//! - `menu_item` - Menu catalog (read/write here)
//! - `tower_sessions.session` - Session storage for the signed-in owner
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

/// Create a `PostgreSQL` connection pool.
///
/// Admin traffic is a single owner, so the pool stays small.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
