use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::required;

/// Form body for `POST /register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(
        custom(function = "required"),
        length(min = 3, max = 25, message = "Username must be between 3 and 25 characters.")
    )]
    pub username: String,
    #[serde(default)]
    #[validate(
        custom(function = "required"),
        length(min = 6, message = "Password must be at least 6 characters.")
    )]
    pub password: String,
}

/// Form body for `POST /login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub username: String,
    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub password: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub message: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
