//! JWT token generation and validation

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::accounts::{Account, AccountRole};

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Account id
    pub sub: String,
    pub email: String,
    pub roles: BTreeSet<AccountRole>,
    /// Expiration timestamp
    pub exp: u64,
}

/// Issue a token for an authenticated account
pub fn generate_token(
    account: &Account,
    secret: &str,
    lifetime_seconds: u64,
) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let claims = Claims {
        sub: account.id.to_string(),
        email: account.email.clone(),
        roles: account.roles.0.clone(),
        exp: now + lifetime_seconds,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate and decode a token
pub fn validate_token(token: &str, secret: &str) -> anyhow::Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;

    fn account() -> Account {
        Account {
            id: 42,
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$test".to_string(),
            roles: Json(BTreeSet::from([AccountRole::User])),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let secret = "test_secret_key_minimum_32_characters_long";
        let token = generate_token(&account(), secret, 3600).unwrap();

        let claims = validate_token(&token, secret).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "test@example.com");
        assert!(claims.roles.contains(&AccountRole::User));
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let token = generate_token(&account(), "test_secret_key_minimum_32_characters_long", 3600)
            .unwrap();
        assert!(validate_token(&token, "another_secret_key_32_characters_xx").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let secret = "test_secret_key_minimum_32_characters_long";
        let claims = Claims {
            sub: "42".to_string(),
            email: "test@example.com".to_string(),
            roles: BTreeSet::from([AccountRole::User]),
            // Well past the default 60s validation leeway
            exp: 1,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&token, secret).is_err());
    }
}
