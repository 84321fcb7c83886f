use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct SearchHit {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
}

/// Response of the demo route; echoes the SQL text it ran.
#[derive(Debug, Serialize)]
pub struct DemoSearchResponse {
    pub query: String,
    pub executed_sql: Option<String>,
    pub results: Vec<SearchHit>,
}
