use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::recipes::repo_types::Recipe;

const SELECT_RECIPE: &str = r#"
    SELECT r.id, r.title, r.description, r.created_at, r.image, r.user_id,
           u.username AS author
    FROM recipe r
    LEFT JOIN "user" u ON u.id = r.user_id
"#;

impl Recipe {
    /// Newest first. `created_at` is RFC 3339 text with a variable number of
    /// fractional digits, so it is compared as a julian day, not as a string.
    pub async fn list_recent(db: &SqlitePool) -> sqlx::Result<Vec<Recipe>> {
        let sql = format!("{SELECT_RECIPE} ORDER BY julianday(r.created_at) DESC, r.id DESC");
        sqlx::query_as::<_, Recipe>(&sql).fetch_all(db).await
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> sqlx::Result<Option<Recipe>> {
        let sql = format!("{SELECT_RECIPE} WHERE r.id = ?");
        sqlx::query_as::<_, Recipe>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Inserts a row stamped with the current UTC time and returns its id.
    pub async fn create(
        db: &SqlitePool,
        title: &str,
        description: &str,
        image: Option<&str>,
        user_id: Option<i64>,
    ) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO recipe (title, description, created_at, image, user_id)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(OffsetDateTime::now_utc())
        .bind(image)
        .bind(user_id)
        .fetch_one(db)
        .await
    }
}
