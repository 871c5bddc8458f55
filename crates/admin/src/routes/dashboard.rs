//! Menu management route handlers.
//!
//! Every handler requires the signed-in admin. Outcomes are reported as
//! flash notices on the next page.

use askama::Template;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use flavors_core::{Currency, MenuItem, MenuItemDraft, MenuItemId, MenuItemInput, MenuQuery};
use tower_sessions::Session;
use tracing::instrument;

use super::form::{FormErrors, MenuForm};
use super::{Layout, render};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::{CurrentAdmin, Flash, push_flash, take_flashes};
use crate::state::AppState;

const NO_SUCH_ITEM: &str = "No such menu item.";

/// Menu item row for the dashboard table.
#[derive(Debug, Clone)]
pub struct MenuRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub image_url: Option<String>,
    pub full_price: String,
    pub half_price: Option<String>,
    pub is_available: bool,
    pub is_featured: bool,
}

impl MenuRow {
    #[must_use]
    pub fn new(item: &MenuItem, currency: Currency) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            category: item.category.clone(),
            image_url: item.image_url.clone(),
            full_price: currency.format(item.price.full),
            half_price: item.half_price().map(|half| currency.format(half)),
            is_available: item.is_available,
            is_featured: item.is_featured,
        }
    }
}

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard/index.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub rows: Vec<MenuRow>,
    pub load_failed: bool,
}

/// Create/edit form template.
#[derive(Template)]
#[template(path = "dashboard/form.html")]
pub struct MenuFormTemplate {
    pub layout: Layout,
    pub heading: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub input: MenuItemInput,
    pub errors: FormErrors,
    pub current_image: Option<String>,
}

/// Page-level not found message.
#[derive(Template)]
#[template(path = "dashboard/not_found.html")]
pub struct NotFoundTemplate {
    pub layout: Layout,
    pub message: &'static str,
}

fn not_found(admin: &CurrentAdmin) -> Response {
    (
        StatusCode::NOT_FOUND,
        render(&NotFoundTemplate {
            layout: Layout::new(admin, Vec::new()),
            message: NO_SUCH_ITEM,
        }),
    )
        .into_response()
}

/// Re-render the form with per-field errors.
fn invalid_form(template: &MenuFormTemplate) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, render(template)).into_response()
}

/// Remove an image, reporting whether it is gone.
async fn cleanup_image(state: &AppState, url: &str) -> bool {
    match state.images().delete(url).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, %url, "failed to delete menu image");
            false
        }
    }
}

/// Dashboard handler: every menu item, available or not.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> impl IntoResponse {
    let currency = state.config().currency;
    let (rows, load_failed) = match state.catalog().list(&MenuQuery::all()).await {
        Ok(items) => (
            items.iter().map(|item| MenuRow::new(item, currency)).collect(),
            false,
        ),
        Err(e) => {
            tracing::error!("Failed to fetch menu items: {e}");
            (Vec::new(), true)
        }
    };

    render(&DashboardTemplate {
        layout: Layout::new(&admin, take_flashes(&session).await),
        rows,
        load_failed,
    })
}

/// Empty form for a new item.
#[instrument(skip(admin))]
pub async fn new_form(RequireAdminAuth(admin): RequireAdminAuth) -> impl IntoResponse {
    render(&MenuFormTemplate {
        layout: Layout::new(&admin, Vec::new()),
        heading: "Add Menu Item",
        action: "/dashboard/new".to_string(),
        submit_label: "Create Item",
        input: MenuItemInput {
            is_available: true,
            ..MenuItemInput::default()
        },
        errors: FormErrors::default(),
        current_image: None,
    })
}

/// Create an item, uploading its image first when one was chosen.
#[instrument(skip(admin, state, session, multipart))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Result<Response> {
    let form = MenuForm::read(&mut multipart, state.config().uploads.max_bytes).await?;

    let draft = match validated(&form) {
        Ok(draft) => draft,
        Err(errors) => {
            return Ok(invalid_form(&MenuFormTemplate {
                layout: Layout::new(&admin, Vec::new()),
                heading: "Add Menu Item",
                action: "/dashboard/new".to_string(),
                submit_label: "Create Item",
                input: form.input,
                errors,
                current_image: None,
            }));
        }
    };

    let image_url = match &form.image {
        Some(image) => Some(state.images().upload(&image.bytes, &image.filename).await?),
        None => None,
    };

    match state.catalog().create(&draft.with_image(image_url.clone())).await {
        Ok(item) => {
            tracing::info!(item_id = %item.id, name = %item.name, "menu item created");
            let flash = Flash::success(format!("\"{}\" was added to the menu.", item.name));
            push_flash(&session, flash).await?;
            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(e) => {
            if let Some(url) = &image_url {
                cleanup_image(&state, url).await;
            }
            Err(e.into())
        }
    }
}

/// Prefilled form for an existing item.
#[instrument(skip(admin, state))]
pub async fn edit_form(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<MenuItemId>,
) -> Result<Response> {
    let Some(item) = state.catalog().get(id).await? else {
        return Ok(not_found(&admin));
    };

    Ok(render(&MenuFormTemplate {
        layout: Layout::new(&admin, Vec::new()),
        heading: "Edit Menu Item",
        action: format!("/dashboard/edit/{id}"),
        submit_label: "Save Changes",
        input: MenuItemInput::from_item(&item),
        errors: FormErrors::default(),
        current_image: item.image_url,
    })
    .into_response())
}

/// Replace an item. A new image replaces the old one, which is then
/// cleaned up; without a new image the current one is kept.
#[instrument(skip(admin, state, session, multipart))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<MenuItemId>,
    mut multipart: Multipart,
) -> Result<Response> {
    let Some(existing) = state.catalog().get(id).await? else {
        return Ok(not_found(&admin));
    };
    let form = MenuForm::read(&mut multipart, state.config().uploads.max_bytes).await?;

    let draft = match validated(&form) {
        Ok(draft) => draft,
        Err(errors) => {
            return Ok(invalid_form(&MenuFormTemplate {
                layout: Layout::new(&admin, Vec::new()),
                heading: "Edit Menu Item",
                action: format!("/dashboard/edit/{id}"),
                submit_label: "Save Changes",
                input: form.input,
                errors,
                current_image: existing.image_url,
            }));
        }
    };

    let new_image = match &form.image {
        Some(image) => Some(state.images().upload(&image.bytes, &image.filename).await?),
        None => None,
    };
    let image_url = new_image.clone().or_else(|| existing.image_url.clone());

    let item = match state.catalog().replace(id, &draft.with_image(image_url)).await {
        Ok(item) => item,
        Err(e) => {
            if let Some(url) = &new_image {
                cleanup_image(&state, url).await;
            }
            return Err(e.into());
        }
    };
    tracing::info!(item_id = %item.id, "menu item updated");

    let replaced = existing
        .image_url
        .as_deref()
        .filter(|old| new_image.is_some() && item.image_url.as_deref() != Some(*old));
    let old_image_removed = match replaced {
        Some(old) => cleanup_image(&state, old).await,
        None => true,
    };
    let flash = if old_image_removed {
        Flash::success(format!("\"{}\" was updated.", item.name))
    } else {
        Flash::error(format!(
            "\"{}\" was updated, but its previous image could not be removed.",
            item.name
        ))
    };
    push_flash(&session, flash).await?;

    Ok(Redirect::to("/dashboard").into_response())
}

/// Delete an item, then try to remove its image.
///
/// The record is gone even if the image cleanup fails; the notice says so.
#[instrument(skip(_admin, state, session))]
pub async fn delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<MenuItemId>,
) -> Result<Redirect> {
    let Some(item) = state.catalog().get(id).await? else {
        push_flash(&session, Flash::error(NO_SUCH_ITEM)).await?;
        return Ok(Redirect::to("/dashboard"));
    };

    if !state.catalog().delete(id).await? {
        push_flash(&session, Flash::error(NO_SUCH_ITEM)).await?;
        return Ok(Redirect::to("/dashboard"));
    }
    tracing::info!(item_id = %id, name = %item.name, "menu item deleted");

    let image_removed = match &item.image_url {
        Some(url) => cleanup_image(&state, url).await,
        None => true,
    };
    let flash = if image_removed {
        Flash::success(format!("\"{}\" was deleted.", item.name))
    } else {
        Flash::error(format!(
            "\"{}\" was deleted, but its image could not be removed.",
            item.name
        ))
    };
    push_flash(&session, flash).await?;

    Ok(Redirect::to("/dashboard"))
}

/// Validate the text fields and surface any image problem alongside.
fn validated(form: &MenuForm) -> std::result::Result<MenuItemDraft, FormErrors> {
    match form.input.validate() {
        Ok(draft) if !form.has_image_error() => Ok(draft),
        Ok(_) => Err(FormErrors::new(None, form.image_error.clone())),
        Err(errors) => Err(FormErrors::new(Some(&errors), form.image_error.clone())),
    }
}
