use crate::dto::content_dto::{
    CreateCategoryPayload, CreateLessonPayload, CreateQuestionPayload, UpdateCategoryPayload,
    UpdateLessonPayload, UpdateQuestionPayload,
};
use crate::error::{Error, Result};
use crate::models::category::Category;
use crate::models::lesson::Lesson;
use crate::models::quiz_question::{is_option_tag, QuizQuestion};
use crate::utils::slug::slugify;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ContentService {
    pool: PgPool,
}

impl ContentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- Categories ---

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"SELECT id, name, description, color, icon, slug, created_at
               FROM categories ORDER BY name"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn create_category(&self, payload: CreateCategoryPayload) -> Result<Category> {
        let slug = match payload.slug {
            Some(s) if !s.is_empty() => s,
            _ => slugify(&payload.name),
        };
        let category = sqlx::query_as::<_, Category>(
            r#"INSERT INTO categories (name, description, color, icon, slug)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, name, description, color, icon, slug, created_at"#,
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.color.as_deref().unwrap_or("#3498db"))
        .bind(payload.icon.as_deref().unwrap_or("fas fa-tag"))
        .bind(&slug)
        .fetch_one(&self.pool)
        .await
        .map_err(conflict_on_duplicate("Category name or slug already exists"))?;
        Ok(category)
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        payload: UpdateCategoryPayload,
    ) -> Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            r#"UPDATE categories
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   color = COALESCE($4, color),
                   icon = COALESCE($5, icon),
                   slug = COALESCE($6, slug)
               WHERE id = $1
               RETURNING id, name, description, color, icon, slug, created_at"#,
        )
        .bind(id)
        .bind(payload.name)
        .bind(payload.description)
        .bind(payload.color)
        .bind(payload.icon)
        .bind(payload.slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(conflict_on_duplicate("Category name or slug already exists"))?
        .ok_or_else(|| Error::NotFound("Category not found".to_string()))?;
        Ok(category)
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(r#"DELETE FROM categories WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Category not found".to_string()));
        }
        Ok(())
    }

    // --- Lessons ---

    pub async fn list_lessons(&self) -> Result<Vec<Lesson>> {
        let lessons = sqlx::query_as::<_, Lesson>(
            r#"SELECT id, category_id, title, slug, description, order_in_category,
                      pass_threshold, xp_min, xp_max, created_at
               FROM lessons ORDER BY category_id, order_in_category"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(lessons)
    }

    pub async fn get_lesson(&self, id: Uuid) -> Result<Lesson> {
        let lesson = sqlx::query_as::<_, Lesson>(
            r#"SELECT id, category_id, title, slug, description, order_in_category,
                      pass_threshold, xp_min, xp_max, created_at
               FROM lessons WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Lesson not found".to_string()))?;
        Ok(lesson)
    }

    pub async fn get_lesson_by_slug(&self, slug: &str) -> Result<Lesson> {
        let lesson = sqlx::query_as::<_, Lesson>(
            r#"SELECT id, category_id, title, slug, description, order_in_category,
                      pass_threshold, xp_min, xp_max, created_at
               FROM lessons WHERE slug = $1"#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Lesson not found".to_string()))?;
        Ok(lesson)
    }

    pub async fn create_lesson(&self, payload: CreateLessonPayload) -> Result<Lesson> {
        if payload.xp_min > payload.xp_max {
            return Err(Error::BadRequest(
                "xp_min must not exceed xp_max".to_string(),
            ));
        }

        let order = match payload.order_in_category {
            Some(o) if o > 0 => o,
            Some(_) => {
                return Err(Error::BadRequest(
                    "order_in_category must be positive".to_string(),
                ))
            }
            None => self.next_level(payload.category_id).await?,
        };

        let lesson = sqlx::query_as::<_, Lesson>(
            r#"INSERT INTO lessons (category_id, title, slug, description, order_in_category,
                                    pass_threshold, xp_min, xp_max)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING id, category_id, title, slug, description, order_in_category,
                         pass_threshold, xp_min, xp_max, created_at"#,
        )
        .bind(payload.category_id)
        .bind(&payload.title)
        .bind(slugify(&payload.title))
        .bind(payload.description)
        .bind(order)
        .bind(payload.pass_threshold)
        .bind(payload.xp_min)
        .bind(payload.xp_max)
        .fetch_one(&self.pool)
        .await
        .map_err(conflict_on_duplicate(
            "Lesson slug or category position already taken",
        ))?;
        Ok(lesson)
    }

    pub async fn update_lesson(&self, id: Uuid, payload: UpdateLessonPayload) -> Result<Lesson> {
        // Validate the reward range as it will be after the update, pulling
        // the current lesson only when one side is left unchanged.
        if payload.xp_min.is_some() || payload.xp_max.is_some() {
            let (xp_min, xp_max) = match (payload.xp_min, payload.xp_max) {
                (Some(min), Some(max)) => (min, max),
                _ => {
                    let current = self.get_lesson(id).await?;
                    (
                        payload.xp_min.unwrap_or(current.xp_min),
                        payload.xp_max.unwrap_or(current.xp_max),
                    )
                }
            };
            if xp_min > xp_max {
                return Err(Error::BadRequest(
                    "xp_min must not exceed xp_max".to_string(),
                ));
            }
        }

        // Slug follows the title when it changes.
        let slug = payload.title.as_deref().map(slugify);

        let lesson = sqlx::query_as::<_, Lesson>(
            r#"UPDATE lessons
               SET title = COALESCE($2, title),
                   slug = COALESCE($3, slug),
                   description = COALESCE($4, description),
                   category_id = COALESCE($5, category_id),
                   order_in_category = COALESCE($6, order_in_category),
                   pass_threshold = COALESCE($7, pass_threshold),
                   xp_min = COALESCE($8, xp_min),
                   xp_max = COALESCE($9, xp_max)
               WHERE id = $1
               RETURNING id, category_id, title, slug, description, order_in_category,
                         pass_threshold, xp_min, xp_max, created_at"#,
        )
        .bind(id)
        .bind(payload.title)
        .bind(slug)
        .bind(payload.description)
        .bind(payload.category_id)
        .bind(payload.order_in_category)
        .bind(payload.pass_threshold)
        .bind(payload.xp_min)
        .bind(payload.xp_max)
        .fetch_optional(&self.pool)
        .await
        .map_err(conflict_on_duplicate(
            "Lesson slug or category position already taken",
        ))?
        .ok_or_else(|| Error::NotFound("Lesson not found".to_string()))?;
        Ok(lesson)
    }

    /// Deletes a lesson and closes the gap it leaves in the category's
    /// unlock sequence.
    pub async fn delete_lesson(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let position: Option<(Uuid, i32)> = sqlx::query_as(
            r#"SELECT category_id, order_in_category FROM lessons WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((category_id, deleted_order)) = position else {
            return Err(Error::NotFound("Lesson not found".to_string()));
        };

        sqlx::query(r#"DELETE FROM lessons WHERE id = $1"#)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"UPDATE lessons SET order_in_category = order_in_category - 1
               WHERE category_id = $1 AND order_in_category > $2"#,
        )
        .bind(category_id)
        .bind(deleted_order)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Next free position in a category's unlock sequence.
    pub async fn next_level(&self, category_id: Uuid) -> Result<i32> {
        let next: i32 = sqlx::query_scalar(
            r#"SELECT COALESCE(MAX(order_in_category), 0) + 1 FROM lessons WHERE category_id = $1"#,
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(next)
    }

    // --- Quiz questions ---

    pub async fn list_questions(&self) -> Result<Vec<QuizQuestion>> {
        let questions = sqlx::query_as::<_, QuizQuestion>(
            r#"SELECT id, lesson_id, question_text, option_a, option_b, option_c, option_d,
                      correct_answer, explanation, created_at
               FROM quiz_questions ORDER BY lesson_id, created_at"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    pub async fn create_question(&self, payload: CreateQuestionPayload) -> Result<QuizQuestion> {
        if !is_option_tag(&payload.correct_answer) {
            return Err(Error::BadRequest(
                "Correct answer must be A, B, C, or D".to_string(),
            ));
        }
        self.get_lesson(payload.lesson_id).await?;

        let question = sqlx::query_as::<_, QuizQuestion>(
            r#"INSERT INTO quiz_questions (lesson_id, question_text, option_a, option_b,
                                           option_c, option_d, correct_answer, explanation)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING id, lesson_id, question_text, option_a, option_b, option_c, option_d,
                         correct_answer, explanation, created_at"#,
        )
        .bind(payload.lesson_id)
        .bind(&payload.question_text)
        .bind(&payload.option_a)
        .bind(&payload.option_b)
        .bind(&payload.option_c)
        .bind(&payload.option_d)
        .bind(&payload.correct_answer)
        .bind(&payload.explanation)
        .fetch_one(&self.pool)
        .await?;
        Ok(question)
    }

    pub async fn update_question(
        &self,
        id: Uuid,
        payload: UpdateQuestionPayload,
    ) -> Result<QuizQuestion> {
        if let Some(tag) = &payload.correct_answer {
            if !is_option_tag(tag) {
                return Err(Error::BadRequest(
                    "Correct answer must be A, B, C, or D".to_string(),
                ));
            }
        }

        let question = sqlx::query_as::<_, QuizQuestion>(
            r#"UPDATE quiz_questions
               SET question_text = COALESCE($2, question_text),
                   option_a = COALESCE($3, option_a),
                   option_b = COALESCE($4, option_b),
                   option_c = COALESCE($5, option_c),
                   option_d = COALESCE($6, option_d),
                   correct_answer = COALESCE($7, correct_answer),
                   explanation = COALESCE($8, explanation)
               WHERE id = $1
               RETURNING id, lesson_id, question_text, option_a, option_b, option_c, option_d,
                         correct_answer, explanation, created_at"#,
        )
        .bind(id)
        .bind(payload.question_text)
        .bind(payload.option_a)
        .bind(payload.option_b)
        .bind(payload.option_c)
        .bind(payload.option_d)
        .bind(payload.correct_answer)
        .bind(payload.explanation)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Quiz question not found".to_string()))?;
        Ok(question)
    }

    pub async fn delete_question(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(r#"DELETE FROM quiz_questions WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Quiz question not found".to_string()));
        }
        Ok(())
    }
}

fn conflict_on_duplicate(message: &str) -> impl Fn(sqlx::Error) -> Error + '_ {
    move |err| match err {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            Error::Conflict(message.to_string())
        }
        other => other.into(),
    }
}
