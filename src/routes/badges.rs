use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};

use crate::{error::Result, middleware::auth::Claims, AppState};

/// Badge catalog. Admins also see inactive badges.
#[axum::debug_handler]
pub async fn list_badges(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let badges = state.badge_service.list(claims.is_admin()).await?;
    Ok(Json(badges))
}

#[axum::debug_handler]
pub async fn my_badges(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let badges = state.badge_service.earned_by_user(claims.user_id()?).await?;
    Ok(Json(badges))
}
