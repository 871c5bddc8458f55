//! Session middleware configuration for admin.
//!
//! Separate cookie from the storefront (cookies are not port-scoped) and
//! `SameSite=Strict`. Production uses the `PostgreSQL` store, tests an
//! in-memory one.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "fx_admin_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer around `store`.
///
/// # Arguments
///
/// * `store` - Session store (`PostgresStore` in production)
/// * `secure` - Whether to mark the cookie `Secure` (HTTPS deployments)
#[must_use]
pub fn create_session_layer<S: SessionStore + Clone>(
    store: S,
    secure: bool,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(secure)
        // SameSite=Strict for admin (stricter than storefront's Lax)
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
