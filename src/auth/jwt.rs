//! Bearer token issue and verification (HS256 JWT).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub iat: i64,
    pub exp: i64,
}

/// Signing and verification keys derived once from the configured secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::try_hours(ttl_hours).unwrap_or(Duration::MAX),
        }
    }

    pub fn issue(&self, user_id: Uuid) -> AppResult<String> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("token expiry out of range")))?;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("sign token: {}", e)))
    }

    /// Checks signature and expiry, then returns the user id claim.
    /// Every failure is `Forbidden`: the caller presented a token, just not a good one.
    pub fn verify(&self, token: &str) -> AppResult<Uuid> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| AppError::Forbidden(e.to_string()))?;
        Uuid::parse_str(&data.claims.sub).map_err(|e| AppError::Forbidden(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let keys = JwtKeys::new("test-secret", 1);
        let id = Uuid::new_v4();
        let token = keys.issue(id).unwrap();
        assert_eq!(keys.verify(&token).unwrap(), id);
    }

    #[test]
    fn tampered_token_is_forbidden() {
        let keys = JwtKeys::new("test-secret", 1);
        let mut token = keys.issue(Uuid::new_v4()).unwrap();
        let sig_start = token.rfind('.').unwrap() + 1;
        let flipped = if token.as_bytes()[sig_start + 4] == b'A' { "B" } else { "A" };
        token.replace_range(sig_start + 4..sig_start + 5, flipped);
        assert!(matches!(keys.verify(&token), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn other_secret_is_forbidden() {
        let token = JwtKeys::new("secret-one", 1).issue(Uuid::new_v4()).unwrap();
        let other = JwtKeys::new("secret-two", 1);
        assert!(matches!(other.verify(&token), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn expired_token_is_forbidden() {
        let keys = JwtKeys::new("test-secret", 1);
        let past = Utc::now() - Duration::hours(2);
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: past.timestamp(),
            exp: (past + Duration::hours(1)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(matches!(keys.verify(&token), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn unrepresentable_expiry_is_internal_error() {
        let keys = JwtKeys::new("test-secret", 10_000_000_000);
        assert!(matches!(keys.issue(Uuid::new_v4()), Err(AppError::Internal(_))));
    }

    #[test]
    fn garbage_is_forbidden() {
        let keys = JwtKeys::new("test-secret", 1);
        assert!(matches!(keys.verify("not-a-jwt"), Err(AppError::Forbidden(_))));
    }
}
