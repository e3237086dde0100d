use crate::dto::content_dto::{CreateBadgePayload, UpdateBadgePayload};
use crate::error::{Error, Result};
use crate::models::badge::{Badge, EarnedBadge};
use sqlx::PgPool;
use uuid::Uuid;

const BADGE_COLUMNS: &str =
    "id, name, description, icon_url, color, xp_threshold, is_active, created_at";

#[derive(Clone)]
pub struct BadgeService {
    pool: PgPool,
}

impl BadgeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Badge catalog ordered by threshold. Regular users only see active
    /// badges; admins see everything.
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<Badge>> {
        let sql = if include_inactive {
            format!("SELECT {BADGE_COLUMNS} FROM badges ORDER BY xp_threshold")
        } else {
            format!("SELECT {BADGE_COLUMNS} FROM badges WHERE is_active ORDER BY xp_threshold")
        };
        let badges = sqlx::query_as::<_, Badge>(&sql).fetch_all(&self.pool).await?;
        Ok(badges)
    }

    pub async fn earned_by_user(&self, user_id: Uuid) -> Result<Vec<EarnedBadge>> {
        let badges = sqlx::query_as::<_, EarnedBadge>(
            r#"SELECT b.id, b.name, b.description, b.icon_url, b.color, b.xp_threshold, ub.earned_at
               FROM badges b
               JOIN user_badges ub ON ub.badge_id = b.id
               WHERE ub.user_id = $1 AND b.is_active
               ORDER BY ub.earned_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(badges)
    }

    /// Grants every active badge the user qualifies for but does not hold
    /// yet, returning the newly granted ones. Re-running with unchanged XP
    /// grants nothing.
    pub async fn award_missing(&self, user_id: Uuid) -> Result<Vec<Badge>> {
        let mut tx = self.pool.begin().await?;

        let user_xp: Option<i32> = sqlx::query_scalar(r#"SELECT xp FROM users WHERE id = $1"#)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(user_xp) = user_xp else {
            return Err(Error::NotFound("User not found".to_string()));
        };

        let missing = sqlx::query_as::<_, Badge>(
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
        .bind(user_xp)
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        for badge in &missing {
            sqlx::query(r#"INSERT INTO user_badges (user_id, badge_id) VALUES ($1, $2)"#)
                .bind(user_id)
                .bind(badge.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(missing)
    }

    pub async fn create(&self, payload: CreateBadgePayload) -> Result<Badge> {
        let badge = sqlx::query_as::<_, Badge>(
            r#"INSERT INTO badges (name, description, icon_url, color, xp_threshold)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, name, description, icon_url, color, xp_threshold, is_active, created_at"#,
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.icon_url.as_deref().unwrap_or(""))
        .bind(payload.color.as_deref().unwrap_or("#FFD700"))
        .bind(payload.xp_threshold)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Error::Conflict("Badge name already exists".to_string())
            }
            other => other.into(),
        })?;
        Ok(badge)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateBadgePayload) -> Result<Badge> {
        let badge = sqlx::query_as::<_, Badge>(
            r#"UPDATE badges
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   icon_url = COALESCE($4, icon_url),
                   color = COALESCE($5, color),
                   xp_threshold = COALESCE($6, xp_threshold),
                   is_active = COALESCE($7, is_active)
               WHERE id = $1
               RETURNING id, name, description, icon_url, color, xp_threshold, is_active, created_at"#,
        )
        .bind(id)
        .bind(payload.name)
        .bind(payload.description)
        .bind(payload.icon_url)
        .bind(payload.color)
        .bind(payload.xp_threshold)
        .bind(payload.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Badge not found".to_string()))?;
        Ok(badge)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(r#"DELETE FROM badges WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Badge not found".to_string()));
        }
        Ok(())
    }
}
