//! Caller identity extraction.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::AppState;
use super::error::ApiError;
use crate::arena::ArenaError;
use crate::storage::{DatabaseError, User};

/// The authenticated caller, loaded from the `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthenticated("Missing authorization header"))?;

        let claims = state
            .jwt
            .validate(token)
            .map_err(|_| ApiError::Unauthenticated("Invalid token"))?;

        match state.service.db().get_user(&claims.sub).await {
            Ok(user) => Ok(Self(user)),
            Err(DatabaseError::NotFound(_)) => Err(ArenaError::UserNotFound.into()),
            Err(e) => Err(ArenaError::Database(e).into()),
        }
    }
}
