use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The four option tags a question's correct answer may carry.
pub const OPTION_TAGS: [&str; 4] = ["A", "B", "C", "D"];

pub fn is_option_tag(tag: &str) -> bool {
    OPTION_TAGS.contains(&tag)
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizQuestion {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: String,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

/// Question projection handed to quiz takers; the correct tag and
/// explanation stay server-side until submission.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizQuestionPublic {
    pub id: Uuid,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
}

/// Minimal view used by the scoring engine.
#[derive(Debug, Clone, FromRow)]
pub struct AnswerKey {
    pub id: Uuid,
    pub correct_answer: String,
}
