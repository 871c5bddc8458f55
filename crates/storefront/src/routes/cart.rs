//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the visitor's session (see [`SessionCart`]).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderName,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use flavors_core::{Cart, CartNotice, Currency, MemoryStorage, MenuItemId, Variant, checkout};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{HX_TRIGGER, PageContext, cart_trigger};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::SessionCart;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub item_id: String,
    pub name: String,
    /// Form value: `half` or `full`.
    pub variant: &'static str,
    pub variant_label: &'static str,
    pub quantity: u32,
    pub decrement_to: i64,
    pub increment_to: i64,
    pub unit_price: String,
    pub line_total: String,
    pub image_url: Option<String>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub count: u64,
    /// Whether a WhatsApp number is configured.
    pub can_checkout: bool,
}

impl CartView {
    #[must_use]
    pub fn new(cart: &Cart<MemoryStorage>, currency: Currency, can_checkout: bool) -> Self {
        let lines = cart
            .lines()
            .iter()
            .map(|line| CartLineView {
                item_id: line.item.id.to_string(),
                name: line.item.name.clone(),
                variant: line.selected_quantity.as_str(),
                variant_label: match line.selected_quantity {
                    Variant::Half => "Half",
                    Variant::Full => "Full",
                },
                quantity: line.quantity,
                decrement_to: i64::from(line.quantity) - 1,
                increment_to: i64::from(line.quantity) + 1,
                unit_price: currency.format(line.unit_price()),
                line_total: currency.format(line.line_total()),
                image_url: line.item.image_url.clone(),
            })
            .collect();

        Self {
            lines,
            total: currency.format(cart.total()),
            count: cart.count(),
            can_checkout,
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub item_id: MenuItemId,
    #[serde(default)]
    pub variant: Variant,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: MenuItemId,
    pub variant: Variant,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: MenuItemId,
    pub variant: Variant,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

fn view(state: &AppState, cart: &SessionCart) -> CartView {
    let restaurant = state.restaurant();
    CartView::new(cart.cart(), restaurant.currency, restaurant.phone.is_some())
}

/// Render the items fragment after a mutation, signalling other widgets.
fn items_fragment(state: &AppState, cart: &SessionCart) -> Response {
    (
        AppendHeaders([(HeaderName::from_static(HX_TRIGGER), cart_trigger(None))]),
        CartItemsTemplate {
            cart: view(state, cart),
        },
    )
        .into_response()
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = SessionCart::load(session).await;

    CartShowTemplate {
        page: PageContext::new(&state),
        cart: view(&state, &cart),
    }
}

/// Add item to cart (HTMX).
///
/// Returns the updated count badge with an HTMX trigger that refreshes other
/// cart widgets and shows an acknowledgment toast.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let item = state
        .catalog()
        .get(form.item_id)
        .await?
        .filter(|item| item.is_available)
        .ok_or_else(|| AppError::NotFound("menu item".to_string()))?;

    if !item.offers(form.variant) {
        return Err(AppError::BadRequest(format!(
            "{} is not offered as a half portion",
            item.name
        )));
    }

    let mut cart = SessionCart::load(session).await;
    cart.cart_mut().add_to_cart(&item, form.variant);
    cart.save().await?;

    let toast = cart
        .cart_mut()
        .take_notices()
        .iter()
        .find_map(CartNotice::description);
    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[("item_id", &item.id.to_string()), ("variant", form.variant.as_str())]),
    );

    Ok((
        AppendHeaders([(
            HeaderName::from_static(HX_TRIGGER),
            cart_trigger(toast.as_deref()),
        )]),
        CartCountTemplate {
            count: cart.cart().count(),
        },
    )
        .into_response())
}

/// Set a line's quantity (HTMX). Zero or below removes the line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut cart = SessionCart::load(session).await;
    cart.cart_mut()
        .update_quantity(form.item_id, form.variant, form.quantity);
    cart.save().await?;

    Ok(items_fragment(&state, &cart))
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut cart = SessionCart::load(session).await;
    cart.cart_mut().remove_from_cart(form.item_id, form.variant);
    cart.save().await?;

    Ok(items_fragment(&state, &cart))
}

/// Empty the cart (HTMX).
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Response> {
    let mut cart = SessionCart::load(session).await;
    cart.cart_mut().clear_cart();
    cart.save().await?;

    Ok(items_fragment(&state, &cart))
}

/// Current cart items fragment (HTMX).
///
/// Used to refresh an open cart page after checkout empties the cart.
#[instrument(skip(state, session))]
pub async fn items(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = SessionCart::load(session).await;
    items_fragment(&state, &cart)
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = SessionCart::load(session).await;
    CartCountTemplate {
        count: cart.cart().count(),
    }
}

/// Hand the cart off to WhatsApp.
///
/// Redirects (303) to the `wa.me` link and clears the cart. Without a
/// configured number nothing changes and the visitor gets a 503.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<Response> {
    let mut cart = SessionCart::load(session).await;
    let restaurant = state.restaurant();
    let handoff = checkout::checkout(
        cart.cart_mut(),
        restaurant.phone.as_ref(),
        restaurant.currency,
    )?;
    cart.save().await?;

    add_breadcrumb("checkout", "Order handed off to WhatsApp", None);
    Ok(Redirect::to(&handoff.url).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use flavors_core::{MenuItem, MenuPrice};
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_cart_view_formats_lines() {
        let item = MenuItem {
            id: MenuItemId::generate(),
            name: "Paneer Tikka".to_string(),
            description: "Chargrilled cottage cheese.".to_string(),
            category: "Starters".to_string(),
            price: MenuPrice::with_half(Decimal::new(240, 0), Decimal::new(140, 0)),
            has_half_quantity: true,
            is_available: true,
            is_featured: false,
            image_url: None,
        };
        let mut cart = Cart::hydrate(MemoryStorage::default());
        cart.add_to_cart(&item, Variant::Half);
        cart.add_to_cart(&item, Variant::Half);

        let view = CartView::new(&cart, Currency::INR, false);
        assert_eq!(view.count, 2);
        assert_eq!(view.total, "₹280.00");
        assert!(!view.can_checkout);

        let line = &view.lines[0];
        assert_eq!(line.variant, "half");
        assert_eq!(line.unit_price, "₹140.00");
        assert_eq!(line.line_total, "₹280.00");
        assert_eq!((line.decrement_to, line.increment_to), (1, 3));
    }
}
