use crate::state::AppState;
use axum::{Router, routing::post};

pub mod post;

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(post::login))
}
