use crate::state::AppState;
use axum::{Router, extract::DefaultBodyLimit, routing::get};

pub mod get;
pub mod post;

/// Upload size ceiling enforced at the transport layer, before the intake
/// pipeline sees the request.
pub const MAX_FILE_SIZE_BYTES: usize = 50 * 1024 * 1024;

pub fn submissions_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get::list_submissions).post(post::create_submission),
        )
        .route("/final", get(get::list_final_submissions))
        .route("/check", get(get::check_quota))
        .route("/{id}/download", get(get::download_submission))
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE_BYTES))
}
