//! HS256 token encoding/decoding.
//!
//! Signature handling is isolated here; claim-window checks stay in
//! [`crate::claims`] so they remain deterministic and clock-injectable.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use cropsight_core::UserId;

use crate::claims::{JwtClaims, TokenValidationError, validate_claims};

/// Registered-claim wire shape (numeric timestamps, string subject).
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Token verification seam used by the HTTP middleware.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError>;
}

/// HS256 symmetric-key token codec.
pub struct Hs256Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Hs256Jwt {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Mint a token for `user_id` valid for `ttl` starting now.
    pub fn mint(&self, user_id: UserId, ttl: chrono::Duration) -> Result<String, TokenValidationError> {
        let now = Utc::now();
        let wire = WireClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &wire, &self.encoding)
            .map_err(|e| TokenValidationError::Malformed(e.to_string()))
    }
}

impl JwtValidator for Hs256Jwt {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError> {
        // Expiry is checked by `validate_claims` against the injected clock,
        // not by the decoder's wall-clock check.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = jsonwebtoken::decode::<WireClaims>(token, &self.decoding, &validation)
            .map_err(|e| TokenValidationError::Malformed(e.to_string()))?;

        let claims = JwtClaims {
            sub: data
                .claims
                .sub
                .parse()
                .map_err(|_| TokenValidationError::Malformed("bad subject".to_string()))?,
            issued_at: timestamp(data.claims.iat)?,
            expires_at: timestamp(data.claims.exp)?,
        };

        validate_claims(&claims, now)?;
        Ok(claims)
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, TokenValidationError> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| TokenValidationError::Malformed("timestamp out of range".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn mint_and_validate_round_trip() {
        let jwt = Hs256Jwt::new(b"test-secret");
        let user_id = UserId::new();

        let token = jwt.mint(user_id, Duration::minutes(10)).unwrap();
        let claims = jwt.validate(&token, Utc::now()).unwrap();

        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let jwt = Hs256Jwt::new(b"test-secret");
        let other = Hs256Jwt::new(b"other-secret");

        let token = jwt.mint(UserId::new(), Duration::minutes(10)).unwrap();
        let err = other.validate(&token, Utc::now()).unwrap_err();

        assert!(matches!(err, TokenValidationError::Malformed(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = Hs256Jwt::new(b"test-secret");
        let token = jwt.mint(UserId::new(), Duration::minutes(10)).unwrap();

        let later = Utc::now() + Duration::minutes(11);
        assert_eq!(
            jwt.validate(&token, later).unwrap_err(),
            TokenValidationError::Expired
        );
    }

    #[test]
    fn garbage_is_rejected() {
        let jwt = Hs256Jwt::new(b"test-secret");
        let err = jwt.validate("not.a.token", Utc::now()).unwrap_err();
        assert!(matches!(err, TokenValidationError::Malformed(_)));
    }
}
