use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// Append-only audit record of one quiz submission. Written for every
/// submission, pass or fail; never updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizAttempt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub lesson_id: Uuid,
    pub answers: JsonValue,
    pub score: i32,
    pub passed: bool,
    pub xp_awarded: i32,
    pub attempted_at: DateTime<Utc>,
}
