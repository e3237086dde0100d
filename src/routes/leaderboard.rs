use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{error::Result, AppState};

#[axum::debug_handler]
pub async fn leaderboard(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let entries = state.user_service.leaderboard().await?;
    Ok(Json(entries))
}
