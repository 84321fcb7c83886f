use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Row of the `recipe` table joined with its author's username.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub image: Option<String>,    // stored file name
    pub user_id: Option<i64>,     // NULL once the owner is deleted
    pub author: Option<String>,
}
