pub mod dto;
pub mod handlers;
pub mod repo;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::search_routes()
}

/// `/search_vuln`; see [`repo::search_titles_spliced`].
pub fn demo_router() -> Router<AppState> {
    handlers::demo_routes()
}
