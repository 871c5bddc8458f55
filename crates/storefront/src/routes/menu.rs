//! Menu route handlers.
//!
//! The menu page renders from the live [`MenuSnapshot`](flavors_core::MenuSnapshot);
//! category tabs are plain links so the page works without JavaScript.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use flavors_core::{Currency, MenuItem, MenuItemId, MenuSnapshot, Variant, checkout};
use serde::Deserialize;
use tracing::instrument;

use super::PageContext;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Menu item display data for templates.
#[derive(Clone)]
pub struct DishCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    /// e.g. `₹140.00 (Half) / ₹240.00 (Full)` or `₹240.00`
    pub price_label: String,
    pub has_half: bool,
}

impl DishCard {
    #[must_use]
    pub fn new(item: &MenuItem, currency: Currency) -> Self {
        let price_label = match item.half_price() {
            Some(half) => format!(
                "{} (Half) / {} (Full)",
                currency.format(half),
                currency.format(item.price.full)
            ),
            None => currency.format(item.price.full),
        };

        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            description: item.description.clone(),
            image_url: item.image_url.clone(),
            price_label,
            has_half: item.has_half_quantity,
        }
    }
}

/// One category tab.
#[derive(Clone)]
pub struct CategoryTab {
    pub name: String,
    pub href: String,
    pub active: bool,
}

/// Build the tab strip, falling back to "All" for unknown categories.
fn category_tabs(snapshot: &MenuSnapshot, requested: Option<&str>) -> (Vec<CategoryTab>, String) {
    let active = requested
        .filter(|c| snapshot.categories().iter().any(|known| known == c))
        .unwrap_or(MenuSnapshot::ALL)
        .to_string();

    let tabs = snapshot
        .categories()
        .iter()
        .map(|name| CategoryTab {
            name: name.clone(),
            href: if name == MenuSnapshot::ALL {
                "/menu".to_string()
            } else {
                format!("/menu?category={}", urlencoding::encode(name))
            },
            active: *name == active,
        })
        .collect();

    (tabs, active)
}

/// Menu page query parameters.
#[derive(Debug, Deserialize)]
pub struct MenuParams {
    pub category: Option<String>,
}

/// Direct order form data.
#[derive(Debug, Deserialize)]
pub struct DirectOrderForm {
    #[serde(default)]
    pub variant: Variant,
}

/// Menu page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu.html")]
pub struct MenuTemplate {
    pub page: PageContext,
    pub tabs: Vec<CategoryTab>,
    pub dishes: Vec<DishCard>,
}

/// Display the menu.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<MenuParams>,
) -> impl IntoResponse {
    let snapshot = state.menu();
    let currency = state.restaurant().currency;
    let (tabs, active) = category_tabs(&snapshot, params.category.as_deref());
    let dishes = snapshot
        .in_category(&active)
        .map(|item| DishCard::new(item, currency))
        .collect();

    MenuTemplate {
        page: PageContext::new(&state),
        tabs,
        dishes,
    }
}

/// Order a single item straight to WhatsApp, bypassing the cart.
#[instrument(skip(state))]
pub async fn order(
    State(state): State<AppState>,
    Path(id): Path<MenuItemId>,
    Form(form): Form<DirectOrderForm>,
) -> Result<Response> {
    let item = state
        .catalog()
        .get(id)
        .await?
        .filter(|item| item.is_available)
        .ok_or_else(|| AppError::NotFound("menu item".to_string()))?;

    if !item.offers(form.variant) {
        return Err(AppError::BadRequest(format!(
            "{} is not offered as a half portion",
            item.name
        )));
    }

    let restaurant = state.restaurant();
    let handoff = checkout::direct_order(
        &item,
        form.variant,
        restaurant.phone.as_ref(),
        restaurant.currency,
    )?;

    tracing::info!(item_id = %item.id, variant = %form.variant, "direct order handed off");
    Ok(Redirect::to(&handoff.url).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use flavors_core::MenuPrice;
    use rust_decimal::Decimal;

    use super::*;

    fn item(category: &str, half: Option<i64>) -> MenuItem {
        MenuItem {
            id: MenuItemId::generate(),
            name: "Paneer Tikka".to_string(),
            description: "Chargrilled cottage cheese.".to_string(),
            category: category.to_string(),
            price: MenuPrice {
                full: Decimal::new(240, 0),
                half: half.map(|h| Decimal::new(h, 0)),
            },
            has_half_quantity: half.is_some(),
            is_available: true,
            is_featured: false,
            image_url: None,
        }
    }

    #[test]
    fn test_price_label_with_half() {
        let card = DishCard::new(&item("Starters", Some(140)), Currency::INR);
        assert_eq!(card.price_label, "₹140.00 (Half) / ₹240.00 (Full)");
        assert!(card.has_half);
    }

    #[test]
    fn test_price_label_full_only() {
        let card = DishCard::new(&item("Starters", None), Currency::INR);
        assert_eq!(card.price_label, "₹240.00");
    }

    #[test]
    fn test_unknown_category_falls_back_to_all() {
        let snapshot = MenuSnapshot::from_items(vec![item("Main Courses", None)]);
        let (tabs, active) = category_tabs(&snapshot, Some("Breakfast"));
        assert_eq!(active, "All");
        assert!(tabs[0].active);
        assert_eq!(tabs[1].href, "/menu?category=Main%20Courses");
    }
}
