use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Badge {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub icon_url: String,
    pub color: String,
    pub xp_threshold: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EarnedBadge {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub icon_url: String,
    pub color: String,
    pub xp_threshold: i32,
    pub earned_at: DateTime<Utc>,
}
