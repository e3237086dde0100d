use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCategoryPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCategoryPayload {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateLessonPayload {
    #[validate(length(min = 1))]
    pub title: String,
    pub description: Option<String>,
    pub category_id: Uuid,
    /// Position in the category's unlock sequence; defaults to the next
    /// free slot when omitted.
    pub order_in_category: Option<i32>,
    #[validate(range(min = 0, max = 100))]
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: i32,
    #[serde(default = "default_xp_min")]
    pub xp_min: i32,
    #[serde(default = "default_xp_max")]
    pub xp_max: i32,
}

fn default_pass_threshold() -> i32 {
    70
}

fn default_xp_min() -> i32 {
    50
}

fn default_xp_max() -> i32 {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateLessonPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub order_in_category: Option<i32>,
    #[validate(range(min = 0, max = 100))]
    pub pass_threshold: Option<i32>,
    pub xp_min: Option<i32>,
    pub xp_max: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuestionPayload {
    pub lesson_id: Uuid,
    #[validate(length(min = 1))]
    pub question_text: String,
    #[validate(length(min = 1))]
    pub option_a: String,
    #[validate(length(min = 1))]
    pub option_b: String,
    #[validate(length(min = 1))]
    pub option_c: String,
    #[validate(length(min = 1))]
    pub option_d: String,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateQuestionPayload {
    #[validate(length(min = 1))]
    pub question_text: Option<String>,
    pub option_a: Option<String>,
    pub option_b: Option<String>,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBadgePayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0))]
    pub xp_threshold: i32,
    pub icon_url: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateBadgePayload {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub xp_threshold: Option<i32>,
    pub icon_url: Option<String>,
    pub color: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextLevelQuery {
    pub category_id: Uuid,
}
