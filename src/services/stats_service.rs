use crate::dto::user_dto::DashboardStats;
use crate::error::Result;
use sqlx::PgPool;

#[derive(Clone)]
pub struct StatsService {
    pool: PgPool,
}

impl StatsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Counters for the admin dashboard. "Recent" means the last 7 days.
    pub async fn dashboard(&self) -> Result<DashboardStats> {
        let row: (i64, i64, i64, i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            r#"SELECT
                   (SELECT COUNT(*) FROM users),
                   (SELECT COUNT(*) FROM lessons),
                   (SELECT COUNT(*) FROM categories),
                   (SELECT COUNT(*) FROM quiz_questions),
                   (SELECT COUNT(*) FROM badges),
                   (SELECT COUNT(*) FROM lesson_progress WHERE is_completed),
                   (SELECT COUNT(*) FROM users
                    WHERE created_at > NOW() - INTERVAL '7 days'),
                   (SELECT COUNT(*) FROM lesson_progress
                    WHERE is_completed AND completed_at > NOW() - INTERVAL '7 days'),
                   (SELECT COALESCE(SUM(xp), 0) FROM users)"#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardStats {
            total_users: row.0,
            total_lessons: row.1,
            total_categories: row.2,
            total_quiz_questions: row.3,
            total_badges: row.4,
            completed_lessons: row.5,
            recent_users: row.6,
            recent_completions: row.7,
            total_xp_awarded: row.8,
        })
    }
}
