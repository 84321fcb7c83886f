use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use tracing::{instrument, warn};
use validator::Validate;

use crate::{
    auth::extractors::CurrentUser,
    error::{ApiError, ApiResult},
    images::services::{content_type_for, is_stored_image_name, ImageUpload},
    recipes::{
        dto::{NewRecipeForm, RecipeCreated, RecipeDetails, RecipeSummary},
        repo_types::Recipe,
        services::create_recipe,
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipes))
        .route("/recipe/:id", get(get_recipe))
        .route("/uploads/:filename", get(get_upload))
}

pub fn write_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/add", post(add_recipe))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

#[instrument(skip(state))]
pub async fn list_recipes(State(state): State<AppState>) -> ApiResult<Json<Vec<RecipeSummary>>> {
    let recipes = Recipe::list_recent(&state.db).await?;
    Ok(Json(recipes.into_iter().map(RecipeSummary::from).collect()))
}

/// Non-numeric ids are treated like unknown ones.
#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<RecipeDetails>> {
    let not_found = || ApiError::NotFound("Recipe not found".into());
    let id: i64 = id.parse().map_err(|_| not_found())?;
    let recipe = Recipe::find_by_id(&state.db, id).await?.ok_or_else(not_found)?;
    Ok(Json(recipe.into()))
}

/// POST /add (multipart: title, description, image)
#[instrument(skip(state, user, mp), fields(user_id = user.0.id))]
pub async fn add_recipe(
    State(state): State<AppState>,
    user: CurrentUser,
    mut mp: Multipart,
) -> ApiResult<Response> {
    let mut form = NewRecipeForm::default();
    let mut image_body: Option<Bytes> = None;

    while let Some(field) = mp.next_field().await? {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("title") => form.title = field.text().await?,
            Some("description") => form.description = field.text().await?,
            Some("image") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                // browsers send an empty part when no file was picked
                if !filename.is_empty() || !data.is_empty() {
                    form.image = Some(filename);
                    image_body = Some(data);
                }
            }
            _ => {}
        }
    }

    form.validate()?;

    let upload = form
        .image
        .zip(image_body)
        .map(|(filename, body)| ImageUpload { filename, body });
    let recipe = create_recipe(
        &state,
        user.0.id,
        form.title.trim(),
        &form.description,
        upload,
    )
    .await?;

    let location = format!("/recipe/{}", recipe.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(RecipeCreated {
            message: "Recipe added",
            recipe: recipe.into(),
        }),
    )
        .into_response())
}

#[instrument(skip(state))]
pub async fn get_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let not_found = || ApiError::NotFound("File not found".into());
    if !is_stored_image_name(&filename) {
        warn!(%filename, "rejected upload name");
        return Err(not_found());
    }

    let body = state.storage.get_object(&filename).await?.ok_or_else(not_found)?;
    Ok(([(header::CONTENT_TYPE, content_type_for(&filename))], body).into_response())
}
