use anyhow::Context;
use tracing::{info, warn};

use crate::{
    images::services::{store_image, ImageUpload},
    recipes::repo_types::Recipe,
    state::AppState,
};

/// Stores the optional image, then the row. A failed insert removes the
/// image again so no file is left without a recipe.
pub async fn create_recipe(
    state: &AppState,
    user_id: i64,
    title: &str,
    description: &str,
    image: Option<ImageUpload>,
) -> anyhow::Result<Recipe> {
    let stored = match image {
        Some(upload) => Some(store_image(state.storage.as_ref(), upload).await?),
        None => None,
    };

    let id = match Recipe::create(&state.db, title, description, stored.as_deref(), Some(user_id)).await {
        Ok(id) => id,
        Err(e) => {
            if let Some(name) = &stored {
                if let Err(cleanup) = state.storage.delete_object(name).await {
                    warn!(error = %cleanup, image = %name, "failed to remove orphaned image");
                }
            }
            return Err(e).context("insert recipe");
        }
    };

    info!(recipe_id = id, user_id, image = ?stored, "recipe created");
    Recipe::find_by_id(&state.db, id)
        .await?
        .context("recipe vanished after insert")
}
