use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{error::Result, middleware::auth::Claims, AppState};

#[axum::debug_handler]
pub async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let categories = state.content_service.list_categories().await?;
    Ok(Json(categories))
}

#[axum::debug_handler]
pub async fn list_lessons(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let lessons = state.content_service.list_lessons().await?;
    Ok(Json(lessons))
}

#[axum::debug_handler]
pub async fn get_lesson(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let lesson = state.content_service.get_lesson(id).await?;
    Ok(Json(lesson))
}

#[axum::debug_handler]
pub async fn get_lesson_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let lesson = state.content_service.get_lesson_by_slug(&slug).await?;
    Ok(Json(lesson))
}

/// All lessons with the caller's unlocked/completed flags.
#[axum::debug_handler]
pub async fn lessons_with_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let lessons = state
        .progress_service
        .lessons_with_status(claims.user_id()?)
        .await?;
    Ok(Json(lessons))
}
