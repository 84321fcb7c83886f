use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    error::{ApiError, ApiResult},
    search::{
        dto::{DemoSearchResponse, SearchQuery, SearchResponse},
        repo::{search_titles, search_titles_spliced},
    },
    state::AppState,
};

pub fn search_routes() -> Router<AppState> {
    Router::new().route("/search_safe", get(search_safe))
}

/// Never merged into the app unless the operator opted in at startup.
pub fn demo_routes() -> Router<AppState> {
    Router::new().route("/search_vuln", get(search_vuln))
}

#[instrument(skip(state))]
pub async fn search_safe(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    let results = search_titles(&state.db, &params.q).await?;
    Ok(Json(SearchResponse {
        query: params.q,
        results,
    }))
}

/// Database errors are echoed back: seeing them is part of the demo.
#[instrument(skip(state))]
pub async fn search_vuln(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Json<DemoSearchResponse>> {
    let (executed_sql, results) = match search_titles_spliced(&state.db, &params.q).await {
        Ok(found) => found,
        Err(sqlx::Error::Database(e)) => {
            warn!(error = %e, query = %params.q, "spliced search failed");
            return Err(ApiError::BadRequest(format!("Query failed: {}", e.message())));
        }
        // injected UNION rows whose columns do not fit a SearchHit
        Err(e @ sqlx::Error::ColumnDecode { .. }) => {
            warn!(error = %e, query = %params.q, "spliced search returned foreign rows");
            return Err(ApiError::BadRequest(format!("Query failed: {e}")));
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(sql) = &executed_sql {
        info!(%sql, rows = results.len(), "spliced search executed");
    }
    Ok(Json(DemoSearchResponse {
        query: params.q,
        executed_sql,
        results,
    }))
}
