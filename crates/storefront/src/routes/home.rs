//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use flavors_core::MenuQuery;
use tracing::instrument;

use super::PageContext;
use super::menu::DishCard;
use crate::filters;
use crate::state::AppState;

/// Number of featured dishes shown on the home page.
const FEATURED_DISHES: usize = 4;

/// A guest quote shown under the featured dishes.
#[derive(Clone)]
pub struct Testimonial {
    pub name: &'static str,
    pub quote: &'static str,
}

fn testimonials() -> Vec<Testimonial> {
    vec![
        Testimonial {
            name: "Sarah J.",
            quote: "Absolutely the best meal I've had in ages! The attention to detail is stunning.",
        },
        Testimonial {
            name: "Mike R.",
            quote: "A hidden gem! The atmosphere is cozy and the food is out of this world.",
        },
        Testimonial {
            name: "Emily C.",
            quote: "I can't get enough of their desserts. A perfect end to a perfect meal every time.",
        },
    ]
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub featured: Vec<DishCard>,
    pub testimonials: Vec<Testimonial>,
}

/// Display the home page.
///
/// A catalog failure hides the featured section instead of failing the page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let currency = state.restaurant().currency;
    let featured = state
        .catalog()
        .list(&MenuQuery::featured(FEATURED_DISHES))
        .await
        .map_or_else(
            |e| {
                tracing::error!("Failed to fetch featured dishes: {e}");
                Vec::new()
            },
            |items| items.iter().map(|item| DishCard::new(item, currency)).collect(),
        );

    HomeTemplate {
        page: PageContext::new(&state),
        featured,
        testimonials: testimonials(),
    }
}
