use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::user_dto::{LoginPayload, SignupPayload},
    error::Result,
    AppState,
};

#[axum::debug_handler]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.user_service.signup(payload).await?;
    tracing::info!(user_id = %user.id, "New user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let response = state.user_service.login(payload).await?;
    Ok(Json(response))
}
