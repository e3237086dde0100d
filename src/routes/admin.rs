use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::content_dto::{
        CreateBadgePayload, CreateCategoryPayload, CreateLessonPayload, CreateQuestionPayload,
        NextLevelQuery, UpdateBadgePayload, UpdateCategoryPayload, UpdateLessonPayload,
        UpdateQuestionPayload,
    },
    error::Result,
    AppState,
};

// --- Categories ---

#[axum::debug_handler]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let category = state.content_service.create_category(payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[axum::debug_handler]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let category = state.content_service.update_category(id, payload).await?;
    Ok(Json(category))
}

#[axum::debug_handler]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.content_service.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Lessons ---

#[axum::debug_handler]
pub async fn create_lesson(
    State(state): State<AppState>,
    Json(payload): Json<CreateLessonPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let lesson = state.content_service.create_lesson(payload).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

#[axum::debug_handler]
pub async fn update_lesson(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLessonPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let lesson = state.content_service.update_lesson(id, payload).await?;
    Ok(Json(lesson))
}

#[axum::debug_handler]
pub async fn delete_lesson(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.content_service.delete_lesson(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Next free order slot in a category, for the lesson editor.
#[axum::debug_handler]
pub async fn next_level(
    State(state): State<AppState>,
    Query(query): Query<NextLevelQuery>,
) -> Result<impl IntoResponse> {
    let next = state.content_service.next_level(query.category_id).await?;
    Ok(Json(json!({ "next_level": next })))
}

// --- Quiz questions ---

#[axum::debug_handler]
pub async fn list_questions(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let questions = state.content_service.list_questions().await?;
    Ok(Json(questions))
}

#[axum::debug_handler]
pub async fn create_question(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuestionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let question = state.content_service.create_question(payload).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

#[axum::debug_handler]
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuestionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let question = state.content_service.update_question(id, payload).await?;
    Ok(Json(question))
}

#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.content_service.delete_question(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Badges ---

#[axum::debug_handler]
pub async fn create_badge(
    State(state): State<AppState>,
    Json(payload): Json<CreateBadgePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let badge = state.badge_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(badge)))
}

#[axum::debug_handler]
pub async fn update_badge(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBadgePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let badge = state.badge_service.update(id, payload).await?;
    Ok(Json(badge))
}

#[axum::debug_handler]
pub async fn delete_badge(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.badge_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Users ---

#[axum::debug_handler]
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let users = state.user_service.list_with_stats().await?;
    Ok(Json(users))
}

#[axum::debug_handler]
pub async fn promote_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.user_service.promote_to_admin(id).await?;
    Ok(Json(json!({ "message": "User promoted to admin" })))
}

#[axum::debug_handler]
pub async fn reset_user_progress(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.user_service.reset_progress(id).await?;
    Ok(Json(json!({ "message": "User progress reset" })))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.user_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Grants any threshold badges the user's XP already covers but which have
/// not been awarded yet.
#[axum::debug_handler]
pub async fn award_badges(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let awarded = state.badge_service.award_missing(id).await?;
    Ok(Json(json!({ "awarded": awarded })))
}

// --- Dashboard ---

#[axum::debug_handler]
pub async fn dashboard_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.stats_service.dashboard().await?;
    Ok(Json(stats))
}
