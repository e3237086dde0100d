use crate::error::Result;
use crate::models::lesson::LessonWithStatus;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ProgressService {
    pool: PgPool,
}

impl ProgressService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All lessons with the caller's unlocked/completed flags. The first
    /// lesson of each category defaults to unlocked when no progress row
    /// exists; every other lesson needs an explicit unlock.
    pub async fn lessons_with_status(&self, user_id: Uuid) -> Result<Vec<LessonWithStatus>> {
        let lessons = sqlx::query_as::<_, LessonWithStatus>(
            r#"
            SELECT l.id, l.category_id, c.name AS category_name, l.title, l.slug,
                   l.description, l.order_in_category, l.pass_threshold, l.xp_min, l.xp_max,
                   COALESCE(lp.is_completed, FALSE) AS is_completed,
                   COALESCE(lp.is_unlocked, l.order_in_category = 1) AS is_unlocked
            FROM lessons l
            JOIN categories c ON l.category_id = c.id
            LEFT JOIN lesson_progress lp ON lp.lesson_id = l.id AND lp.user_id = $1
            ORDER BY c.name, l.order_in_category
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lessons)
    }
}
