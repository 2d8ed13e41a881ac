use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::BoardError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_limit() -> u32 {
    50
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/universe/search", get(api_search))
}

/// Relay a symbol-universe search.  An unreachable universe degrades to an
/// empty match list.
async fn api_search(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Value>, BoardError> {
    let query = q.q.trim();
    if query.is_empty() {
        return Err(BoardError::BadRequest("missing query".to_string()));
    }

    let items = state.source.universe_search(query, q.limit.clamp(1, 2000)).await;

    Ok(Json(json!({
        "query": query,
        "count": items.len(),
        "items": items,
    })))
}
