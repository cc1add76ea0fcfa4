use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::api::AppState;
use crate::database::models::User;
use crate::database::queries::users;
use crate::error::{AppError, AppResult, AuthFailure};

/// The authenticated caller, as resolved by [`require_user`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthFailure> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthFailure::Missing)?
        .to_str()
        .map_err(|_| AuthFailure::Malformed)?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthFailure::Malformed),
    }
}

/// Resolves the request headers to a stored user.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> AppResult<User> {
    let token = bearer_token(headers).map_err(AppError::Unauthorized)?;
    let user_id = state.tokens.verify(token)?;

    users::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Unauthorized(AuthFailure::UserNotFound))
}

pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = match authenticate(&state, request.headers()).await {
        Ok(user) => user,
        Err(e) => {
            if let AppError::Unauthorized(reason) = &e {
                warn!(uri = %request.uri(), reason = ?reason, "Rejected request at auth gate");
            }
            return Err(e);
        }
    };

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized(AuthFailure::Missing))
    }
}
