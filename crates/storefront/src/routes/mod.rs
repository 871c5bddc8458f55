//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (featured dishes)
//! GET  /menu                   - Menu with category tabs (?category=)
//! POST /menu/{id}/order        - Direct single-item order (redirect to WhatsApp)
//! GET  /about                  - About page
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns count badge, triggers cart-updated + toast)
//! POST /cart/update            - Set quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove line (returns cart_items fragment)
//! POST /cart/clear             - Empty the cart (returns cart_items fragment)
//! GET  /cart/items             - Cart items fragment (triggers cart-updated)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! POST /checkout               - Redirect to WhatsApp with the order summary
//! ```

pub mod cart;
pub mod home;
pub mod menu;
pub mod pages;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use serde_json::json;

use crate::state::AppState;

/// HTMX response header carrying client-side events.
pub const HX_TRIGGER: &str = "hx-trigger";

/// Shared layout data for full pages.
#[derive(Clone)]
pub struct PageContext {
    pub restaurant_name: String,
}

impl PageContext {
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            restaurant_name: state.restaurant().name.clone(),
        }
    }
}

/// Build an `HX-Trigger` value for `cart-updated`, plus a `toast` event
/// when there is a message to show.
///
/// Non-ASCII characters are escaped so the JSON stays a valid header value.
#[must_use]
pub fn cart_trigger(toast: Option<&str>) -> HeaderValue {
    let events = match toast {
        Some(message) => json!({ "cart-updated": null, "toast": { "message": message } }),
        None => json!({ "cart-updated": null }),
    };

    let mut escaped = String::new();
    for c in events.to_string().chars() {
        if c.is_ascii() {
            escaped.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }

    HeaderValue::from_str(&escaped).unwrap_or_else(|_| HeaderValue::from_static("cart-updated"))
}

/// Create the menu routes router.
pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(menu::index))
        .route("/{id}/order", post(menu::order))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/items", get(cart::items))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/about", get(pages::about))
        .nest("/menu", menu_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
}
