use serde::Serialize;
use time::OffsetDateTime;
use validator::{Validate, ValidationError};

use crate::{images::services::allowed_extension, recipes::repo_types::Recipe, validation::required};

/// Fields of the `POST /add` multipart form. The image bytes travel
/// separately.
#[derive(Debug, Default, Validate)]
pub struct NewRecipeForm {
    #[validate(
        custom(function = "required"),
        length(max = 100, message = "Title must be at most 100 characters.")
    )]
    pub title: String,
    #[validate(custom(function = "required"))]
    pub description: String,
    /// Client file name of the image part, if one was sent.
    #[validate(custom(function = "image_name"))]
    pub image: Option<String>,
}

fn image_name(filename: &str) -> Result<(), ValidationError> {
    if allowed_extension(filename).is_none() {
        let mut err = ValidationError::new("image");
        err.message = Some("Images only!".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub author: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecipeDetails {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub author: Option<String>,
    pub image_url: Option<String>,
}

/// 201 body of `POST /add`: the stored recipe plus a confirmation.
#[derive(Debug, Serialize)]
pub struct RecipeCreated {
    pub message: &'static str,
    #[serde(flatten)]
    pub recipe: RecipeDetails,
}

pub fn image_url(name: &str) -> String {
    format!("/uploads/{}", name)
}

impl From<Recipe> for RecipeSummary {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            title: r.title,
            created_at: r.created_at,
            author: r.author,
            image_url: r.image.as_deref().map(image_url),
        }
    }
}

impl From<Recipe> for RecipeDetails {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            title: r.title,
            description: r.description,
            created_at: r.created_at,
            author: r.author,
            image_url: r.image.as_deref().map(image_url),
        }
    }
}
