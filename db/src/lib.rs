pub mod models;

use sea_orm::{Database, DatabaseConnection};
use std::path::Path;

/// Connects to the database given either a full DSN or a bare SQLite file path.
pub async fn connect(database_url: &str) -> DatabaseConnection {
    let url = if database_url.starts_with("sqlite:")
        || database_url.starts_with("postgres://")
        || database_url.starts_with("mysql://")
    {
        database_url.to_string()
    } else {
        // SQLite won't create intermediate directories on its own.
        if let Some(parent) = Path::new(database_url).parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        format!("sqlite://{database_url}?mode=rwc")
    };

    Database::connect(&url)
        .await
        .expect("Failed to connect to database")
}
