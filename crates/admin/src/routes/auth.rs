//! Authentication route handlers for admin.
//!
//! Provides login page, password sign-in and logout.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{Layout, render};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::{CurrentAdmin, session_keys, take_flashes};
use crate::services::{AdminAuthService, AuthError};
use crate::state::AppState;

const INVALID_LOGIN: &str = "Invalid email or password.";

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginPageTemplate {
    pub layout: Layout,
    pub email: String,
    pub error: Option<&'static str>,
}

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

/// Render the login page.
///
/// GET /auth/login
#[instrument(skip(session))]
async fn login_page(session: Session) -> Response {
    let signed_in = session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten()
        .is_some();
    if signed_in {
        return Redirect::to("/dashboard").into_response();
    }

    render(&LoginPageTemplate {
        layout: Layout {
            admin_email: None,
            flashes: take_flashes(&session).await,
        },
        email: String::new(),
        error: None,
    })
    .into_response()
}

/// Check the submitted credentials.
///
/// POST /auth/login
#[instrument(skip(state, session))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let service = AdminAuthService::new(&state.config().credentials);

    match service.login(&form.email, &form.password).await {
        Ok(admin) => {
            set_current_admin(&session, &admin).await?;
            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(AuthError::InvalidCredentials | AuthError::InvalidEmail(_)) => {
            let page = render(&LoginPageTemplate {
                layout: Layout::default(),
                email: form.email,
                error: Some(INVALID_LOGIN),
            });
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

/// Logout and clear session.
///
/// POST /auth/logout
#[instrument(skip(session))]
async fn logout(session: Session) -> Result<Redirect> {
    clear_current_admin(&session).await?;
    Ok(Redirect::to("/auth/login"))
}
