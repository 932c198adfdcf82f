//! Token signing for the admin CLI and tests.
//!
//! Production tokens come from the identity provider; this encoder mints
//! tokens with the same shape and secret.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use courtbook_core::config::AuthConfig;
use courtbook_core::error::AppError;
use courtbook_core::types::UserId;
use courtbook_entity::user::UserRole;

use super::claims::Claims;

/// Creates signed HS256 tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Token TTL in minutes.
    ttl_minutes: u64,
    /// Issuer stamped into the claims.
    issuer: Option<String>,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("ttl_minutes", &self.ttl_minutes)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_minutes: config.token_ttl_minutes,
            issuer: config.issuer.clone(),
        }
    }

    /// Sign a token for the given user.
    pub fn issue(
        &self,
        user_id: UserId,
        role: UserRole,
        name: &str,
        email: Option<&str>,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let exp = i64::try_from(self.ttl_minutes)
            .ok()
            .and_then(TimeDelta::try_minutes)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AppError::configuration("auth.token_ttl_minutes is out of range"))?;

        let claims = Claims {
            sub: user_id.into_uuid(),
            role,
            name: name.to_string(),
            email: email.map(str::to_string),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))?;

        Ok((token, exp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtbook_core::ErrorKind;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-with-enough-bytes".to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_expiry_follows_ttl() {
        let config = AuthConfig {
            token_ttl_minutes: 30,
            ..config()
        };
        let before = Utc::now();
        let (_, exp) = JwtEncoder::new(&config)
            .issue(UserId::new(), UserRole::User, "Ana", None)
            .unwrap();
        let ttl = exp - before;
        assert!(ttl >= TimeDelta::minutes(29) && ttl <= TimeDelta::minutes(31));
    }

    #[test]
    fn test_oversized_ttl_is_a_configuration_error() {
        let config = AuthConfig {
            token_ttl_minutes: u64::MAX,
            ..config()
        };
        let err = JwtEncoder::new(&config)
            .issue(UserId::new(), UserRole::User, "Ana", None)
            .unwrap_err();
        assert!(err.is(ErrorKind::Configuration));
    }
}
