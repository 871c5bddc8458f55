//! Static content page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use super::PageContext;
use crate::filters;
use crate::state::AppState;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub page: PageContext,
}

/// Display the About page.
#[instrument(skip(state))]
pub async fn about(State(state): State<AppState>) -> impl IntoResponse {
    AboutTemplate {
        page: PageContext::new(&state),
    }
}
