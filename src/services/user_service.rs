use crate::dto::user_dto::{
    ChangePasswordPayload, LeaderboardEntry, LoginPayload, LoginResponse, ProfileResponse,
    SignupPayload, UpdateProfilePayload, UserWithStats,
};
use crate::error::{Error, Result};
use crate::models::user::User;
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::token::issue_token;
use sqlx::PgPool;
use uuid::Uuid;

pub const DEFAULT_AVATAR_URL: &str = "/uploads/profile.png";
const LEADERBOARD_SIZE: i64 = 50;

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn signup(&self, payload: SignupPayload) -> Result<User> {
        let password_hash = hash_password(&payload.password)?;
        let user = sqlx::query_as::<_, User>(
            r#"INSERT INTO users (name, email, password_hash)
               VALUES ($1, $2, $3)
               RETURNING id, name, email, password_hash, role, xp, avatar_url, created_at"#,
        )
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Error::Conflict("Email already exists".to_string())
            }
            other => other.into(),
        })?;
        Ok(user)
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<LoginResponse> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, name, email, password_hash, role, xp, avatar_url, created_at
               FROM users WHERE email = $1"#,
        )
        .bind(&payload.email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::Unauthorized("Invalid credentials".to_string()))?;

        if !verify_password(&payload.password, &user.password_hash)? {
            return Err(Error::Unauthorized("Invalid credentials".to_string()));
        }

        let config = crate::config::get_config();
        let token = issue_token(user.id, &user.role, &config.jwt_secret, config.token_ttl_hours)?;

        Ok(LoginResponse {
            token,
            name: user.name,
            email: user.email,
            role: user.role,
        })
    }

    pub async fn get_by_id(&self, user_id: Uuid) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, name, email, password_hash, role, xp, avatar_url, created_at
               FROM users WHERE id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        Ok(user)
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<ProfileResponse> {
        let user = self.get_by_id(user_id).await?;
        Ok(ProfileResponse {
            name: user.name,
            email: user.email,
            role: user.role,
            xp: user.xp,
            avatar_url: user
                .avatar_url
                .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
        })
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        payload: UpdateProfilePayload,
    ) -> Result<ProfileResponse> {
        sqlx::query(
            r#"UPDATE users
               SET name = COALESCE($2, name),
                   avatar_url = COALESCE($3, avatar_url)
               WHERE id = $1"#,
        )
        .bind(user_id)
        .bind(payload.name)
        .bind(payload.avatar_url)
        .execute(&self.pool)
        .await?;
        self.profile(user_id).await
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        payload: ChangePasswordPayload,
    ) -> Result<()> {
        let user = self.get_by_id(user_id).await?;
        if !verify_password(&payload.current_password, &user.password_hash)? {
            return Err(Error::BadRequest(
                "Current password is incorrect".to_string(),
            ));
        }

        let new_hash = hash_password(&payload.new_password)?;
        sqlx::query(r#"UPDATE users SET password_hash = $2 WHERE id = $1"#)
            .bind(user_id)
            .bind(&new_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Top users by XP; id breaks ties so the order is stable.
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let entries = sqlx::query_as::<_, LeaderboardEntry>(
            r#"SELECT name, xp, COALESCE(avatar_url, $1) AS avatar_url
               FROM users ORDER BY xp DESC, id LIMIT $2"#,
        )
        .bind(DEFAULT_AVATAR_URL)
        .bind(LEADERBOARD_SIZE)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    // --- Admin operations ---

    pub async fn list_with_stats(&self) -> Result<Vec<UserWithStats>> {
        let users = sqlx::query_as::<_, UserWithStats>(
            r#"SELECT u.id, u.name, u.email, u.role, u.xp, u.avatar_url, u.created_at,
                      COUNT(DISTINCT lp.lesson_id) FILTER (WHERE lp.is_completed) AS completed_lessons,
                      COUNT(DISTINCT ub.badge_id) AS badges_earned
               FROM users u
               LEFT JOIN lesson_progress lp ON lp.user_id = u.id
               LEFT JOIN user_badges ub ON ub.user_id = u.id
               GROUP BY u.id
               ORDER BY u.xp DESC, u.id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn promote_to_admin(&self, user_id: Uuid) -> Result<()> {
        let user = self.get_by_id(user_id).await?;
        if user.is_admin() {
            return Err(Error::BadRequest("User is already an admin".to_string()));
        }
        sqlx::query(r#"UPDATE users SET role = 'admin' WHERE id = $1"#)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Wipes XP, progress, badges and attempt history for a user. All four
    /// writes share one transaction.
    pub async fn reset_progress(&self, user_id: Uuid) -> Result<()> {
        self.get_by_id(user_id).await?;

        let mut tx = self.pool.begin().await?;
        sqlx::query(r#"UPDATE users SET xp = 0 WHERE id = $1"#)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(r#"DELETE FROM lesson_progress WHERE user_id = $1"#)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(r#"DELETE FROM user_badges WHERE user_id = $1"#)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(r#"DELETE FROM quiz_attempts WHERE user_id = $1"#)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(user_id = %user_id, "User progress reset");
        Ok(())
    }

    pub async fn delete(&self, user_id: Uuid) -> Result<()> {
        let result = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("User not found".to_string()));
        }
        Ok(())
    }
}
