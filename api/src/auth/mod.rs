pub mod claims;
pub mod extractors;

pub use claims::{AuthUser, Claims};

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::env;

/// Generates an HS256 admin JWT using the configured secret and lifetime.
pub fn generate_jwt() -> String {
    let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let jwt_duration_minutes: i64 = env::var("JWT_DURATION_MINUTES")
        .ok()
        .and_then(|m| m.parse().ok())
        .unwrap_or(60);

    let expiry = Utc::now() + Duration::minutes(jwt_duration_minutes);

    let claims = Claims {
        role: "admin".into(),
        exp: expiry.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("Token encoding failed")
}
