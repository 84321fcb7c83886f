use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use axum_extra::extract::CookieJar;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    auth::{
        dto::{LoginForm, MessageResponse, PublicUser, RegisterForm, SessionResponse},
        services::{authenticate, register_user},
        session::{removal_cookie, SessionKeys},
    },
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout).post(logout))
}

#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Form(mut form): Form<RegisterForm>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    form.username = form.username.trim().to_string();
    form.validate()?;

    let user = register_user(&state.db, &form.username, &form.password).await?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            message: "Account created!".into(),
            user: PublicUser {
                id: user.id,
                username: user.username,
            },
        }),
    ))
}

#[instrument(skip(state, jar, form))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(mut form): Form<LoginForm>,
) -> ApiResult<(CookieJar, Json<SessionResponse>)> {
    form.username = form.username.trim().to_string();
    form.validate()?;

    let user = authenticate(&state.db, &form.username, &form.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".into()))?;

    let cookie = SessionKeys::from_ref(&state).session_cookie(user.id)?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok((
        jar.add(cookie),
        Json(SessionResponse {
            message: "Logged in".into(),
            user: PublicUser {
                id: user.id,
                username: user.username,
            },
        }),
    ))
}

#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (jar.remove(removal_cookie()), Json(MessageResponse::new("Logged out")))
}
