//! Application state container shared across Axum route handlers.
//!
//! Handlers receive their collaborators (database handle, upload root) through
//! this struct via Axum's `State<T>` extractor; there are no ambient singletons
//! in the request path.

use sea_orm::DatabaseConnection;
use std::path::{Path, PathBuf};

/// Central application state shared across the server.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    upload_root: PathBuf,
}

impl AppState {
    pub fn new(db: DatabaseConnection, upload_root: PathBuf) -> Self {
        Self { db, upload_root }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Flat directory holding every stored submission file.
    pub fn upload_root(&self) -> &Path {
        &self.upload_root
    }

    /// Returns a cloned copy of the database connection, for contexts that
    /// require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }
}
