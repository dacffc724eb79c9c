//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use supplement_store_core::Category;

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

use super::cart::load_cart;
use super::products::ProductCardView;

/// Bestsellers featured on the home page.
const FEATURED_BESTSELLERS: usize = 5;

// =============================================================================
// Static Content
// =============================================================================

/// A question and answer in the FAQ accordion.
#[derive(Clone, Copy)]
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

const FAQS: [Faq; 5] = [
    Faq {
        question: "What supplements do you offer?",
        answer: "We offer a wide range of supplements including protein powders, vitamins, \
                 pre-workout and post-workout supplements, weight management products, and \
                 health & wellness supplements.",
    },
    Faq {
        question: "How long does shipping take?",
        answer: "Standard shipping takes 5-7 business days. Free shipping is available on \
                 orders over $50.",
    },
    Faq {
        question: "Are your products third-party tested?",
        answer: "Yes, all our products undergo rigorous third-party testing to ensure quality, \
                 purity, and safety.",
    },
    Faq {
        question: "Can I return products if I'm not satisfied?",
        answer: "Yes, we offer a 30-day money-back guarantee on all unopened products. Please \
                 contact our customer service for returns.",
    },
    Faq {
        question: "Do you offer subscription discounts?",
        answer: "Yes, subscribe and save up to 20% on your favorite products with our \
                 subscription service.",
    },
];

/// Category tile linking to a filtered listing.
#[derive(Clone)]
pub struct CategoryTileView {
    pub slug: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub bestsellers: Vec<ProductCardView>,
    pub categories: Vec<CategoryTileView>,
    pub faqs: Vec<Faq>,
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<HomeTemplate> {
    let cart = load_cart(&state, &session).await?;

    let bestsellers = state
        .catalog()
        .bestsellers(FEATURED_BESTSELLERS)
        .into_iter()
        .map(|p| ProductCardView::new(p, &cart))
        .collect();

    let categories = Category::ALL
        .iter()
        .map(|c| CategoryTileView {
            slug: c.slug(),
            label: c.label(),
            description: c.description(),
        })
        .collect();

    Ok(HomeTemplate {
        bestsellers,
        categories,
        faqs: FAQS.to_vec(),
    })
}
