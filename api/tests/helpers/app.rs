use api::{routes::routes, state::AppState};
use axum::{Router, body::Body, http::Request, response::Response};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use std::convert::Infallible;
use tempfile::TempDir;
use tower::ServiceExt;
use tower::util::BoxCloneService;

pub const TEST_ADMIN_PASSWORD: &str = "test-admin-password";

/// Builds a fresh application against a throwaway SQLite file and upload
/// root. The `TempDir` must be kept alive for the duration of the test.
pub async fn make_test_app() -> (
    BoxCloneService<Request<Body>, Response, Infallible>,
    AppState,
    TempDir,
) {
    // Tests touching these run under #[serial].
    unsafe {
        std::env::set_var("JWT_SECRET", "test-secret");
        std::env::set_var("JWT_DURATION_MINUTES", "60");
        std::env::set_var("ADMIN_PASSWORD", TEST_ADMIN_PASSWORD);
    }

    let tmp = TempDir::new().expect("Failed to create temp dir");
    let db_path = tmp.path().join("test.db");
    let db = Database::connect(format!("sqlite://{}?mode=rwc", db_path.to_string_lossy()))
        .await
        .expect("Failed to connect to test db");
    Migrator::up(&db, None).await.expect("Failed to migrate");

    let app_state = AppState::new(db, tmp.path().join("uploads"));
    let router: Router = Router::new().nest("/api", routes(app_state.clone()));

    (router.into_service().boxed_clone(), app_state, tmp)
}

pub fn bearer_token() -> String {
    format!("Bearer {}", api::auth::generate_jwt())
}

/// Hand-rolled multipart body: metadata text fields plus an optional
/// `(filename, content, content type)` file part.
pub fn multipart_body(
    fields: &[(&str, &str)],
    file: Option<(&str, &[u8], &str)>,
) -> (String, Vec<u8>) {
    let boundary = "----BoundaryTest".to_string();
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend(format!("--{boundary}\r\n").as_bytes());
        body.extend(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
    }

    if let Some((filename, content, content_type)) = file {
        body.extend(format!("--{boundary}\r\n").as_bytes());
        body.extend(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend(content);
        body.extend(b"\r\n");
    }

    body.extend(format!("--{boundary}--\r\n").as_bytes());
    (boundary, body)
}

/// Minimal ZIP local-file header, enough to satisfy the sniffer.
pub fn zip_bytes() -> Vec<u8> {
    let mut bytes = vec![0x50, 0x4B, 0x03, 0x04];
    bytes.extend_from_slice(b"scratch project payload");
    bytes
}

pub fn png_bytes() -> Vec<u8> {
    let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(b"image payload");
    bytes
}

pub fn jpeg_bytes() -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.extend_from_slice(b"image payload");
    bytes
}
