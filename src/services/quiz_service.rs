use crate::dto::quiz_dto::{NewBadgeSummary, SubmitQuizPayload, SubmitQuizResponse};
use crate::error::{Error, Result};
use crate::models::badge::Badge;
use crate::models::lesson::Lesson;
use crate::models::quiz_question::{is_option_tag, AnswerKey, QuizQuestionPublic};
use crate::services::scoring_service::ScoringService;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct QuizService {
    pool: PgPool,
}

impl QuizService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Questions for a lesson with the correct tags withheld.
    pub async fn questions_for_taker(&self, lesson_id: Uuid) -> Result<Vec<QuizQuestionPublic>> {
        let questions = sqlx::query_as::<_, QuizQuestionPublic>(
            r#"SELECT id, question_text, option_a, option_b, option_c, option_d
               FROM quiz_questions WHERE lesson_id = $1 ORDER BY created_at, id"#,
        )
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await?;

        if questions.is_empty() {
            return Err(Error::NotFound(
                "No quiz questions found for this lesson".to_string(),
            ));
        }
        Ok(questions)
    }

    pub async fn submit(
        &self,
        user_id: Uuid,
        payload: SubmitQuizPayload,
    ) -> Result<SubmitQuizResponse> {
        self.submit_with_rng(user_id, payload, StdRng::from_entropy())
            .await
    }

    /// Submission pipeline with an injectable RNG for the XP draw.
    ///
    /// The attempt audit insert, XP update, progress upserts, unlock
    /// propagation and badge scan all run in one serializable transaction;
    /// any failure rolls all of it back.
    pub async fn submit_with_rng<R: Rng + Send>(
        &self,
        user_id: Uuid,
        payload: SubmitQuizPayload,
        mut rng: R,
    ) -> Result<SubmitQuizResponse> {
        if payload.answers.is_empty() {
            return Err(Error::BadRequest("Missing lesson_id or answers".to_string()));
        }
        for tag in payload.answers.values() {
            if !is_option_tag(tag) {
                return Err(Error::BadRequest(format!(
                    "Answer must be one of A, B, C, D (got '{}')",
                    tag
                )));
            }
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        let lesson = sqlx::query_as::<_, Lesson>(
            r#"SELECT id, category_id, title, slug, description, order_in_category,
                      pass_threshold, xp_min, xp_max, created_at
               FROM lessons WHERE id = $1"#,
        )
        .bind(payload.lesson_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Lesson not found".to_string()))?;

        let keys = sqlx::query_as::<_, AnswerKey>(
            r#"SELECT id, correct_answer FROM quiz_questions WHERE lesson_id = $1"#,
        )
        .bind(lesson.id)
        .fetch_all(&mut *tx)
        .await?;

        if keys.is_empty() {
            return Err(Error::NotFound(
                "No quiz questions found for this lesson".to_string(),
            ));
        }

        let outcome = ScoringService::score_submission(
            &mut rng,
            &keys,
            &payload.answers,
            lesson.pass_threshold,
            lesson.xp_min,
            lesson.xp_max,
            payload.time_taken_seconds,
        );

        // Audit record is written for every submission, pass or fail.
        let answers_snapshot = serde_json::to_value(&payload.answers)?;
        sqlx::query(
            r#"INSERT INTO quiz_attempts (user_id, lesson_id, answers, score, passed, xp_awarded)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(user_id)
        .bind(lesson.id)
        .bind(&answers_snapshot)
        .bind(outcome.score)
        .bind(outcome.passed)
        .bind(outcome.xp_awarded)
        .execute(&mut *tx)
        .await?;

        if !outcome.passed {
            let current_xp: i32 = sqlx::query_scalar(r#"SELECT xp FROM users WHERE id = $1"#)
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;
            tx.commit().await?;

            return Ok(SubmitQuizResponse {
                score: outcome.score,
                passed: false,
                xp_awarded: 0,
                base_xp: 0,
                time_bonus: 0,
                new_total_xp: current_xp,
                new_badges: vec![],
                retry_message: Some(format!(
                    "You need to score at least {}% to pass. You can retry the quiz.",
                    lesson.pass_threshold
                )),
            });
        }

        let new_total_xp: i32 = sqlx::query_scalar(
            r#"UPDATE users SET xp = xp + $1 WHERE id = $2 RETURNING xp"#,
        )
        .bind(outcome.xp_awarded)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"INSERT INTO lesson_progress (user_id, lesson_id, is_completed, is_unlocked, xp_earned, completed_at)
               VALUES ($1, $2, TRUE, TRUE, $3, NOW())
               ON CONFLICT (user_id, lesson_id)
               DO UPDATE SET is_completed = TRUE, is_unlocked = TRUE,
                             xp_earned = EXCLUDED.xp_earned, completed_at = EXCLUDED.completed_at"#,
        )
        .bind(user_id)
        .bind(lesson.id)
        .bind(outcome.xp_awarded)
        .execute(&mut *tx)
        .await?;

        // Unlock the next lesson in the same category. The upsert only
        // raises is_unlocked; an existing completed flag is left alone.
        // The last lesson of a category has no successor, which is fine.
        let next_lesson: Option<Uuid> = sqlx::query_scalar(
            r#"SELECT id FROM lessons WHERE category_id = $1 AND order_in_category = $2"#,
        )
        .bind(lesson.category_id)
        .bind(lesson.order_in_category + 1)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(next_id) = next_lesson {
            sqlx::query(
                r#"INSERT INTO lesson_progress (user_id, lesson_id, is_unlocked)
                   VALUES ($1, $2, TRUE)
                   ON CONFLICT (user_id, lesson_id) DO UPDATE SET is_unlocked = TRUE"#,
            )
            .bind(user_id)
            .bind(next_id)
            .execute(&mut *tx)
            .await?;
        }

        let new_badges = sqlx::query_as::<_, Badge>(
            r#"SELECT id, name, description, icon_url, color, xp_threshold, is_active, created_at
               FROM badges b
               WHERE b.xp_threshold <= $1
                 AND b.is_active
                 AND NOT EXISTS (
                     SELECT 1 FROM user_badges ub
                     WHERE ub.user_id = $2 AND ub.badge_id = b.id
                 )
               ORDER BY b.xp_threshold"#,
        )
        .bind(new_total_xp)
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        for badge in &new_badges {
            sqlx::query(r#"INSERT INTO user_badges (user_id, badge_id) VALUES ($1, $2)"#)
                .bind(user_id)
                .bind(badge.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            user_id = %user_id,
            lesson_id = %lesson.id,
            score = outcome.score,
            xp_awarded = outcome.xp_awarded,
            new_badges = new_badges.len(),
            "Quiz passed"
        );

        Ok(SubmitQuizResponse {
            score: outcome.score,
            passed: true,
            xp_awarded: outcome.xp_awarded,
            base_xp: outcome.base_xp,
            time_bonus: outcome.time_bonus,
            new_total_xp,
            new_badges: new_badges
                .into_iter()
                .map(|b| NewBadgeSummary {
                    id: b.id,
                    name: b.name,
                    description: b.description,
                    icon_url: b.icon_url,
                })
                .collect(),
            retry_message: None,
        })
    }
}
