//! Image search proxy.
//!
//! ```text
//! GET /api/images?query=protein&count=5          -> {"imageUrls": [...]}
//! GET /api/images?query=supplement&type=random   -> {"imageUrl": "..."}
//! ```

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::state::AppState;

const DEFAULT_QUERY: &str = "supplement";
const MAX_COUNT: usize = 30;

/// Image lookup query parameters.
#[derive(Debug, Deserialize)]
pub struct ImagesQuery {
    pub query: Option<String>,
    pub count: Option<usize>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub image_urls: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomResponse {
    pub image_url: String,
}

/// Look up photos for a query, falling back to placeholder images.
#[instrument(skip(state))]
pub async fn search(State(state): State<AppState>, Query(params): Query<ImagesQuery>) -> Response {
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or(DEFAULT_QUERY);

    if params.kind.as_deref() == Some("random") {
        let image_url = state.images().random_photo(query).await;
        return Json(RandomResponse { image_url }).into_response();
    }

    let count = params.count.unwrap_or(1).clamp(1, MAX_COUNT);
    let image_urls = state.images().search_photos(query, count).await;
    Json(SearchResponse { image_urls }).into_response()
}
