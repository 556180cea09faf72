use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use std::env;

use crate::auth::claims::{AuthUser, Claims};
use crate::response::ApiError;

/// Extracts an authenticated `AuthUser` from the `Authorization` header.
///
/// Checks for a Bearer token, verifies the JWT against the `JWT_SECRET`
/// environment variable, and makes the decoded claims available to the
/// handler. Any failure becomes a 401 in the uniform error shape.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    ApiError::unauthorized("Missing or invalid Authorization header")
                })?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| ApiError::internal("JWT_SECRET must be set"))?;

        let token_data = decode::<Claims>(
            bearer.token(),
            &DecodingKey::from_secret(jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

        Ok(AuthUser(token_data.claims))
    }
}
