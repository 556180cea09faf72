use axum::Json;
use serde::{Deserialize, Serialize};
use std::env;

use crate::auth::generate_jwt;
use crate::response::ApiError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// POST /api/auth/login
///
/// Exchanges the admin password for a bearer token.
///
/// ### Request Body
/// ```json
/// { "password": "..." }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ "access_token": "..." }`
/// - `401 Unauthorized` with message `"Invalid credentials"`
pub async fn login(Json(req): Json<LoginRequest>) -> Result<Json<LoginResponse>, ApiError> {
    let admin_password = env::var("ADMIN_PASSWORD").ok();

    match admin_password {
        Some(expected) if !expected.is_empty() && req.password == expected => {
            Ok(Json(LoginResponse {
                access_token: generate_jwt(),
            }))
        }
        _ => Err(ApiError::unauthorized("Invalid credentials")),
    }
}
