use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

/// Issues a signed HS256 bearer token for the given user.
pub fn issue_token(user_id: Uuid, role: &str, secret: &str, ttl_hours: i64) -> Result<String> {
    let exp = Utc::now() + Duration::hours(ttl_hours);
    let claims = Claims {
        sub: user_id.to_string(),
        exp: exp.timestamp() as usize,
        role: Some(role.to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

    #[test]
    fn issued_token_round_trips() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, "admin", "test_secret_key", 24).expect("sign");

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test_secret_key"),
            &validation,
        )
        .expect("decode");

        assert_eq!(data.claims.sub, user_id.to_string());
        assert_eq!(data.claims.role.as_deref(), Some("admin"));
    }

    #[test]
    fn wrong_secret_fails_validation() {
        let token = issue_token(Uuid::new_v4(), "user", "secret_a", 24).expect("sign");
        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret_b"),
            &Validation::new(Algorithm::HS256),
        );
        assert!(result.is_err());
    }
}
