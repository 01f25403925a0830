//! Account domain: identity, roles, registration and lookup

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::SqlitePool;
use std::collections::BTreeSet;
use thiserror::Error;
use validator::Validate;

use crate::auth::password;

/// Domain-specific errors for account operations
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("account not found for email {email}")]
    NotFound { email: String },

    #[error("email already exists")]
    EmailAlreadyExists,

    #[error("invalid registration input: {0}")]
    InvalidInput(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type AccountResult<T> = Result<T, AccountError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountRole {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "USER")]
    User,
}

/// A stored account
///
/// The password is only ever held as an argon2id hash; the JSON
/// representation exposes id, email and roles and nothing else.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub roles: Json<BTreeSet<AccountRole>>,
}

impl Account {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&AccountRole::Admin)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

/// Register a new account with the USER role
///
/// The plaintext password is hashed before anything touches the store and
/// is dropped with the input.
pub async fn register(pool: &SqlitePool, input: RegisterInput) -> AccountResult<Account> {
    input
        .validate()
        .map_err(|e| AccountError::InvalidInput(e.to_string()))?;

    let password_hash = password::hash_password(&input.password)
        .map_err(|e| AccountError::Hashing(e.to_string()))?;

    // Uniqueness is enforced by the store, not a pre-check, so two
    // concurrent registrations for the same email cannot both succeed.
    let roles = Json(BTreeSet::from([AccountRole::User]));
    let account = sqlx::query_as::<_, Account>(
        "INSERT INTO accounts (email, password_hash, roles) VALUES (?1, ?2, ?3) \
         RETURNING id, email, password_hash, roles",
    )
    .bind(&input.email)
    .bind(&password_hash)
    .bind(&roles)
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            AccountError::EmailAlreadyExists
        }
        _ => AccountError::Database(e),
    })?;

    Ok(account)
}

/// Look up an account by email
///
/// The error carries the attempted email for diagnostics; callers at the
/// HTTP boundary log it rather than echo it to untrusted parties.
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> AccountResult<Account> {
    sqlx::query_as::<_, Account>(
        "SELECT id, email, password_hash, roles FROM accounts WHERE email = ?1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AccountError::NotFound {
        email: email.to_string(),
    })
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> AccountResult<Option<Account>> {
    let account = sqlx::query_as::<_, Account>(
        "SELECT id, email, password_hash, roles FROM accounts WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(account)
}
