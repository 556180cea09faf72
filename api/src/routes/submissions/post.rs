use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use std::borrow::Cow;
use std::collections::HashMap;
use validator::{Validate, ValidationError};

use crate::response::ApiError;
use crate::services::intake::{self, NewSubmission, UploadedFile};
use crate::state::AppState;
use db::models::submission::{Category, Model as SubmissionModel};

#[derive(Debug, Validate)]
pub struct CreateSubmissionRequest {
    #[validate(length(
        min = 2,
        max = 10,
        message = "studentName must be between 2 and 10 characters"
    ))]
    pub student_name: String,

    #[validate(range(min = 1, max = 6, message = "grade must be between 1 and 6"))]
    pub grade: i32,

    #[validate(range(min = 1, message = "classNumber must be a positive integer"))]
    pub class_number: i32,

    #[validate(custom(function = validate_category))]
    pub category: String,

    #[validate(length(
        min = 1,
        max = 50,
        message = "workTitle must be between 1 and 50 characters"
    ))]
    pub work_title: String,
}

fn validate_category(value: &str) -> Result<(), ValidationError> {
    value.parse::<Category>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("category");
        err.message = Some(Cow::Borrowed("Unsupported submission category"));
        err
    })
}

impl CreateSubmissionRequest {
    /// Assembles the request from the multipart text fields, collecting every
    /// missing or malformed field into one structured validation error.
    fn from_fields(fields: &HashMap<String, String>) -> Result<Self, ApiError> {
        let mut messages = Vec::new();

        let text = |name: &str, messages: &mut Vec<String>| -> String {
            match fields.get(name) {
                Some(value) => value.clone(),
                None => {
                    messages.push(format!("{name} is required"));
                    String::new()
                }
            }
        };
        let integer = |name: &str, messages: &mut Vec<String>| -> i32 {
            match fields.get(name) {
                Some(value) => match value.trim().parse() {
                    Ok(number) => number,
                    Err(_) => {
                        messages.push(format!("{name} must be an integer"));
                        0
                    }
                },
                None => {
                    messages.push(format!("{name} is required"));
                    0
                }
            }
        };

        let request = CreateSubmissionRequest {
            student_name: text("studentName", &mut messages),
            grade: integer("grade", &mut messages),
            class_number: integer("classNumber", &mut messages),
            category: text("category", &mut messages),
            work_title: text("workTitle", &mut messages),
        };

        if messages.is_empty() {
            Ok(request)
        } else {
            messages.sort();
            Err(ApiError::Validation(messages))
        }
    }
}

/// POST /api/submissions
///
/// Accepts a multipart form with the submission metadata and a single `file`
/// part. Metadata validation runs before any file I/O; the file is then
/// staged, content-sniffed against the claimed category, and either rejected
/// (staged bytes deleted) or persisted.
///
/// ### Multipart Body (form-data)
/// - `studentName` (2–10 characters)
/// - `grade` (1–6)
/// - `classNumber` (positive integer)
/// - `category` (`PROGRAMMING` or `AIGC`)
/// - `workTitle` (1–50 characters)
/// - `file` (single file, 50 MiB ceiling)
///
/// ### Responses
/// - `201 Created` with the created record
/// - `400 Bad Request` (validation failure, missing file, or content
///   rejection)
pub async fn create_submission(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<SubmissionModel>), ApiError> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(format!("Invalid multipart request: {err}")))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_owned();
            let content_type = field.content_type().map(str::to_owned);
            let bytes = field.bytes().await.map_err(|err| {
                ApiError::bad_request(format!("Failed to read uploaded file: {err}"))
            })?;
            file = Some(UploadedFile {
                file_name,
                content_type,
                bytes,
            });
        } else {
            let value = field.text().await.map_err(|err| {
                ApiError::bad_request(format!("Invalid multipart request: {err}"))
            })?;
            fields.insert(name, value);
        }
    }

    let request = CreateSubmissionRequest::from_fields(&fields)?;
    request
        .validate()
        .map_err(|errors| ApiError::Validation(common::validation_messages(&errors)))?;

    let file = file.ok_or_else(|| ApiError::bad_request("File is required"))?;

    // Already validated; the parse cannot fail here.
    let category: Category = request
        .category
        .parse()
        .map_err(|_| ApiError::bad_request("Unsupported submission category"))?;

    let submission = intake::create_submission(
        state.db(),
        state.upload_root(),
        NewSubmission {
            student_name: request.student_name,
            grade: request.grade,
            class_number: request.class_number,
            category,
            work_title: request.work_title,
        },
        file,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(submission)))
}
