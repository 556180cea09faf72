//! Submission intake pipeline: stage the uploaded bytes, sniff the content,
//! then either clean up and reject or hand the metadata to the record store.
//!
//! The file is written before the record is created. A store failure after the
//! write leaves an orphaned file behind, which is an accepted leak cleaned by
//! external maintenance rather than an inconsistency.

use crate::response::ApiError;
use crate::services::{content_sniffer, storage};
use bytes::Bytes;
use db::models::submission::{Category, Model as SubmissionModel};
use sea_orm::DatabaseConnection;
use std::io;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::warn;

/// A fully received multipart file part.
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Validated submission metadata, ready for persistence.
pub struct NewSubmission {
    pub student_name: String,
    pub grade: i32,
    pub class_number: i32,
    pub category: Category,
    pub work_title: String,
}

/// Stages the upload under an opaque name, validates its content against the
/// claimed category, and creates the submission record on acceptance.
///
/// On rejection the staged file is deleted best-effort; a deletion failure is
/// logged and never surfaced to the caller.
pub async fn create_submission(
    db: &DatabaseConnection,
    upload_root: &Path,
    meta: NewSubmission,
    file: UploadedFile,
) -> Result<SubmissionModel, ApiError> {
    // Idempotent: concurrent uploads may race on creating the root.
    tokio::fs::create_dir_all(upload_root)
        .await
        .map_err(|err| ApiError::internal(format!("failed to prepare upload directory: {err}")))?;

    let stored_name = storage::generate_stored_name(&file.file_name);
    let staged_path = upload_root.join(&stored_name);
    tokio::fs::write(&staged_path, &file.bytes)
        .await
        .map_err(|err| ApiError::internal(format!("failed to stage upload: {err}")))?;

    let header = read_header(&staged_path)
        .await
        .map_err(|err| ApiError::internal(format!("failed to read staged upload: {err}")))?;
    let extension = storage::extension_of(&file.file_name).unwrap_or_default();

    if let Err(rejection) = content_sniffer::sniff(&meta.category, &extension, &header) {
        remove_staged(&staged_path).await;
        return Err(ApiError::bad_request(rejection.to_string()));
    }

    let submission = SubmissionModel::create(
        db,
        &meta.student_name,
        meta.grade,
        meta.class_number,
        meta.category,
        &meta.work_title,
        &file.file_name,
        &stored_name,
        file.content_type.as_deref(),
        file.bytes.len() as i64,
    )
    .await?;

    tracing::info!(
        id = %submission.id,
        student_name = %submission.student_name,
        stored_file_name = %stored_name,
        file_size = submission.file_size,
        "Submission accepted"
    );

    Ok(submission)
}

/// Reads up to the first [`content_sniffer::HEADER_LEN`] bytes of the staged
/// file.
async fn read_header(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut buf = [0u8; content_sniffer::HEADER_LEN];
    let mut filled = 0;

    loop {
        let n = file.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
        if filled == buf.len() {
            break;
        }
    }

    Ok(buf[..filled].to_vec())
}

async fn remove_staged(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %err, "Failed to delete rejected upload");
    }
}
