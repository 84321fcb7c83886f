//! Title search, twice.
//!
//! [`search_titles`] passes the user's text to SQLite as a bound parameter.
//! [`search_titles_spliced`] pastes it into the SQL text between quotes and
//! exists only to show what that allows; it is reachable solely through the
//! demo router.

use sqlx::SqlitePool;

use crate::search::dto::SearchHit;

/// Escapes `%`, `_` and `\` so they match themselves under `ESCAPE '\'`.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Recipes whose title contains `query`. Blank input matches nothing.
pub async fn search_titles(db: &SqlitePool, query: &str) -> sqlx::Result<Vec<SearchHit>> {
    if query.trim().is_empty() {
        return Ok(Vec::new());
    }

    let pattern = format!("%{}%", escape_like(query));
    sqlx::query_as::<_, SearchHit>(
        r#"
        SELECT id, title
        FROM recipe
        WHERE title LIKE ? ESCAPE '\'
        ORDER BY id
        "#,
    )
    .bind(pattern)
    .fetch_all(db)
    .await
}

/// SQL text of the spliced search. `query` is inserted verbatim, so a quote
/// in it ends the string literal and the rest becomes SQL.
pub fn spliced_search_sql(query: &str) -> String {
    format!("SELECT id, title FROM recipe WHERE title LIKE '%{query}%'")
}

/// Runs [`spliced_search_sql`] and returns the executed text with the rows.
/// Blank input runs nothing.
pub async fn search_titles_spliced(
    db: &SqlitePool,
    query: &str,
) -> sqlx::Result<(Option<String>, Vec<SearchHit>)> {
    if query.trim().is_empty() {
        return Ok((None, Vec::new()));
    }

    let sql = spliced_search_sql(query);
    let rows = sqlx::query_as::<_, SearchHit>(&sql).fetch_all(db).await?;
    Ok((Some(sql), rows))
}
