use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LessonProgress {
    pub user_id: Uuid,
    pub lesson_id: Uuid,
    pub is_completed: bool,
    pub is_unlocked: bool,
    pub xp_earned: i32,
    pub completed_at: Option<DateTime<Utc>>,
}
