//! Player session tokens.
//!
//! A token is an HS256 JWT naming the player's user id and nothing else.
//! Account status is not carried in the token; the bearer extractor re-reads
//! it on every request, so a suspension takes effect immediately.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use spinvault_core::types::DbId;
use uuid::Uuid;

pub const DEFAULT_TOKEN_TTL_MINS: i64 = 60;

#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl_mins: i64,
}

impl TokenConfig {
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_mins * 60
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlayerClaims {
    sub: DbId,
    iat: i64,
    exp: i64,
    jti: String,
}

/// A freshly signed token and its lifetime in seconds.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

pub fn issue(user_id: DbId, config: &TokenConfig) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
    issue_at(user_id, config, chrono::Utc::now().timestamp())
}

/// Sign a token as if issued at Unix time `now`.
pub fn issue_at(
    user_id: DbId,
    config: &TokenConfig,
    now: i64,
) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
    let claims = PlayerClaims {
        sub: user_id,
        iat: now,
        exp: now + config.ttl_secs(),
        jti: Uuid::new_v4().to_string(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok(IssuedToken {
        token,
        expires_in: config.ttl_secs(),
    })
}

/// Check signature and expiry and return the player's user id.
pub fn player_id(token: &str, config: &TokenConfig) -> Result<DbId, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    let data = decode::<PlayerClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TokenConfig {
        TokenConfig {
            secret: "session-secret-for-tests".to_string(),
            ttl_mins: 15,
        }
    }

    #[test]
    fn issued_token_names_the_player() {
        let issued = issue(42, &config()).unwrap();
        assert_eq!(issued.expires_in, 900);
        assert_eq!(player_id(&issued.token, &config()).unwrap(), 42);
    }

    #[test]
    fn token_past_its_ttl_is_rejected() {
        let now = chrono::Utc::now().timestamp();
        let stale = issue_at(7, &config(), now - config().ttl_secs() - 1).unwrap();
        assert!(player_id(&stale.token, &config()).is_err());
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let other = TokenConfig {
            secret: "rotated-secret".to_string(),
            ..config()
        };
        let issued = issue(7, &other).unwrap();
        assert!(player_id(&issued.token, &config()).is_err());
        assert!(player_id("not-a-jwt", &config()).is_err());
    }
}
