use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::user_dto::{ChangePasswordPayload, UpdateProfilePayload},
    error::Result,
    middleware::auth::Claims,
    AppState,
};

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let profile = state.user_service.profile(claims.user_id()?).await?;
    Ok(Json(profile))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let profile = state
        .user_service
        .update_profile(claims.user_id()?, payload)
        .await?;
    Ok(Json(profile))
}

#[axum::debug_handler]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state
        .user_service
        .change_password(claims.user_id()?, payload)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
