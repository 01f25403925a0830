use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Form, Json,
};
use serde::{Deserialize, Serialize};

use crate::accounts::{self, RegisterInput};
use crate::auth::{jwt, password};
use crate::error::AppError;
use crate::routes::AppState;

/// POST /api/accounts - Register a new account
#[tracing::instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = payload?;
    let account = accounts::register(&state.pool, input).await?;

    tracing::info!(account_id = account.id, "account registered");

    Ok((StatusCode::CREATED, Json(account)))
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub grant_type: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

/// POST /api/auth/token - Password-grant token issuance
///
/// Credential failures are reported with a generic 401; the attempted
/// email only ever reaches the logs (no user enumeration).
#[tracing::instrument(skip(state, form))]
pub async fn token(
    State(state): State<AppState>,
    Form(form): Form<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    if form.grant_type != "password" {
        return Err(AppError::BadRequest(format!(
            "unsupported grant_type: {}",
            form.grant_type
        )));
    }

    let account = accounts::find_by_email(&state.pool, &form.username).await?;

    let password_valid = password::verify_password(&form.password, &account.password_hash)?;
    if !password_valid {
        tracing::warn!(email = %form.username, "failed login attempt (incorrect password)");
        return Err(AppError::Unauthorized);
    }

    let expires_in = state.config.jwt.expiration_seconds();
    let access_token = jwt::generate_token(&account, &state.config.jwt.secret, expires_in)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer",
        expires_in,
    }))
}
