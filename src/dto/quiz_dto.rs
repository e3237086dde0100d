use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitQuizPayload {
    pub lesson_id: Uuid,
    /// Map from question id to the selected option tag (A-D). Questions
    /// missing from the map are graded as incorrect.
    pub answers: HashMap<Uuid, String>,
    /// Elapsed seconds; 0 means the attempt was not timed.
    #[serde(default)]
    pub time_taken_seconds: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBadgeSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitQuizResponse {
    pub score: i32,
    pub passed: bool,
    pub xp_awarded: i32,
    pub base_xp: i32,
    pub time_bonus: i32,
    pub new_total_xp: i32,
    pub new_badges: Vec<NewBadgeSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TipPayload {
    #[validate(length(min = 1))]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipResponse {
    pub suggestion: String,
}
