use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{dto::quiz_dto::TipPayload, error::Result, AppState};

#[axum::debug_handler]
pub async fn study_tip(
    State(state): State<AppState>,
    Json(payload): Json<TipPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let response = state.tip_service.study_tip(&payload).await?;
    Ok(Json(response))
}
