use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::quiz_dto::SubmitQuizPayload, error::Result, middleware::auth::Claims, AppState,
};

/// Questions for a lesson with the correct tags stripped out.
#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(lesson_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let questions = state.quiz_service.questions_for_taker(lesson_id).await?;
    Ok(Json(questions))
}

#[axum::debug_handler]
pub async fn submit_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitQuizPayload>,
) -> Result<impl IntoResponse> {
    let response = state
        .quiz_service
        .submit(claims.user_id()?, payload)
        .await?;
    Ok(Json(response))
}
