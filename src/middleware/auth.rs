use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::collections::BTreeSet;

use crate::accounts::{self, AccountRole};
use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::routes::AppState;

/// The authenticated caller, inserted as a request extension
#[derive(Clone, Debug)]
pub struct CurrentAccount {
    pub id: i64,
    pub email: String,
    pub roles: BTreeSet<AccountRole>,
}

impl CurrentAccount {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&AccountRole::Admin)
    }
}

/// Bearer-token middleware
///
/// Validates the token, re-checks that the account still exists (tokens
/// outlive deletions), and inserts [`CurrentAccount`]. Responds 401 when:
/// - the Authorization header is missing or not Bearer
/// - the token is invalid or expired
/// - the account no longer exists
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        tracing::warn!("missing bearer token");
        return Err(AppError::Unauthorized);
    };

    let claims = validate_token(bearer.token(), &state.config.jwt.secret).map_err(|e| {
        tracing::warn!("invalid bearer token: {e}");
        AppError::Unauthorized
    })?;

    let account_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized)?;

    let Some(account) = accounts::find_by_id(&state.pool, account_id).await? else {
        tracing::warn!(account_id, "token subject no longer exists");
        return Err(AppError::Unauthorized);
    };

    req.extensions_mut().insert(CurrentAccount {
        id: account.id,
        email: account.email,
        roles: account.roles.0,
    });

    Ok(next.run(req).await)
}
