//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Health check
//! GET  /health/ready             - Catalog reachability
//!
//! # Auth
//! GET  /auth/login               - Login page
//! POST /auth/login               - Check email and password
//! POST /auth/logout              - Logout
//!
//! # Dashboard (requires login)
//! GET  /                         - Redirect to /dashboard
//! GET  /dashboard                - Menu item table
//! GET  /dashboard/new            - Empty item form
//! POST /dashboard/new            - Create item (multipart, optional image)
//! GET  /dashboard/edit/{id}      - Prefilled item form
//! POST /dashboard/edit/{id}      - Replace item (multipart, optional new image)
//! POST /dashboard/delete/{id}    - Delete item and its image
//! ```

pub mod auth;
pub mod dashboard;
pub mod form;

use askama::Template;
use axum::{
    Router,
    response::{Html, Redirect},
    routing::{get, post},
};

use crate::models::{CurrentAdmin, Flash};
use crate::state::AppState;

/// Shared layout data for admin pages.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// Signed-in admin, `None` on the login page.
    pub admin_email: Option<String>,
    pub flashes: Vec<Flash>,
}

impl Layout {
    #[must_use]
    pub fn new(admin: &CurrentAdmin, flashes: Vec<Flash>) -> Self {
        Self {
            admin_email: Some(admin.email.to_string()),
            flashes,
        }
    }
}

/// Render a template, logging failures.
pub(crate) fn render<T: Template>(template: &T) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

async fn root() -> Redirect {
    Redirect::to("/dashboard")
}

/// Build the dashboard router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/new", get(dashboard::new_form).post(dashboard::create))
        .route("/edit/{id}", get(dashboard::edit_form).post(dashboard::update))
        .route("/delete/{id}", post(dashboard::delete))
}

/// Create all routes for admin.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .merge(auth::router())
        .nest("/dashboard", dashboard_routes())
}
