use axum::{
    Json,
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::io;
use tokio_util::io::ReaderStream;
use tracing::warn;

use crate::auth::AuthUser;
use crate::response::ApiError;
use crate::services::storage;
use crate::state::AppState;
use db::models::submission::Model as SubmissionModel;

/// GET /api/submissions
///
/// Full submission history, newest first. Requires a bearer token.
pub async fn list_submissions(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<SubmissionModel>>, ApiError> {
    let submissions = SubmissionModel::find_all(state.db()).await?;
    Ok(Json(submissions))
}

/// GET /api/submissions/final
///
/// One record per distinct (grade, classNumber, studentName, category) group,
/// keeping the most recent submission within each. Requires a bearer token.
pub async fn list_final_submissions(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<SubmissionModel>>, ApiError> {
    let submissions = SubmissionModel::find_latest_per_group(state.db()).await?;
    Ok(Json(submissions))
}

#[derive(Debug, Deserialize)]
pub struct CheckQuotaQuery {
    #[serde(rename = "studentName")]
    pub student_name: Option<String>,
}

/// GET /api/submissions/check?studentName=...
///
/// Unauthenticated daily-quota check: `canSubmit` is false once the student
/// has a submission within the server's local calendar day.
pub async fn check_quota(
    State(state): State<AppState>,
    Query(query): Query<CheckQuotaQuery>,
) -> Result<Json<Value>, ApiError> {
    let student_name = query
        .student_name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::bad_request("studentName is required"))?;

    let has_submission = SubmissionModel::has_submitted_today(state.db(), &student_name).await?;

    Ok(Json(json!({ "canSubmit": !has_submission })))
}

/// GET /api/submissions/{id}/download
///
/// Streams the stored file as an attachment. The on-disk path is resolved
/// from the record's `storedFileName` only; an unknown id and a record whose
/// file is missing from disk produce the same 404.
pub async fn download_submission(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let submission = SubmissionModel::find_by_id(state.db(), &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Submission not found"))?;

    let fs_path = state.upload_root().join(&submission.stored_file_name);

    let file = match tokio::fs::File::open(&fs_path).await {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!(
                id = %submission.id,
                stored_file_name = %submission.stored_file_name,
                "Submission record exists but file is missing on disk"
            );
            return Err(ApiError::not_found("Submission not found"));
        }
        Err(err) => {
            return Err(ApiError::internal(format!(
                "failed to open stored file: {err}"
            )));
        }
    };

    let extension =
        storage::preferred_extension(&submission.file_name, &submission.stored_file_name);
    let download_name = storage::build_download_name(
        submission.grade,
        submission.class_number,
        &submission.student_name,
        &extension,
    );
    let content_type = submission
        .file_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or("application/octet-stream");

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        attachment_disposition(&download_name),
    );

    let body = Body::from_stream(ReaderStream::new(file));
    Ok((StatusCode::OK, headers, body).into_response())
}

/// Builds a `Content-Disposition: attachment` value with an ASCII fallback
/// filename plus an RFC 5987 `filename*` so non-ASCII student names survive
/// header encoding.
fn attachment_disposition(download_name: &str) -> HeaderValue {
    let fallback: String = download_name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let encoded = utf8_percent_encode(download_name, NON_ALPHANUMERIC);

    HeaderValue::from_str(&format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}"
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_disposition_keeps_ascii_names_readable() {
        let value = attachment_disposition("3-2-Alice.sb3");
        let value = value.to_str().unwrap();
        assert!(value.contains("filename=\"3-2-Alice.sb3\""));
        assert!(value.starts_with("attachment;"));
    }

    #[test]
    fn attachment_disposition_encodes_non_ascii_names() {
        let value = attachment_disposition("1-10-小明.png");
        let value = value.to_str().unwrap();
        assert!(value.is_ascii());
        assert!(value.contains("filename*=UTF-8''"));
        assert!(value.contains("filename=\"1-10-__.png\""));
    }
}
