use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub order_in_category: i32,
    pub pass_threshold: i32,
    pub xp_min: i32,
    pub xp_max: i32,
    pub created_at: DateTime<Utc>,
}

/// Lesson joined with per-user progress flags. A lesson with
/// `order_in_category = 1` counts as unlocked even without a
/// lesson_progress row; the query supplies that default.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LessonWithStatus {
    pub id: Uuid,
    pub category_id: Uuid,
    pub category_name: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub order_in_category: i32,
    pub pass_threshold: i32,
    pub xp_min: i32,
    pub xp_max: i32,
    pub is_completed: bool,
    pub is_unlocked: bool,
}
