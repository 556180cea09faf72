//! Storage naming: opaque on-disk names and safe user-facing download names.
//!
//! Stored names are UUID-based and never derived from user input; download
//! names are reconstructed from record metadata with header-injection and
//! path characters stripped out.

use std::path::Path;
use uuid::Uuid;

/// Extension of a file name including the leading dot (`".sb3"`), or `None`
/// if there is none.
pub fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
}

/// Generates a globally unique on-disk name, preserving the extension of the
/// original upload name (or none if absent).
pub fn generate_stored_name(original_name: &str) -> String {
    match extension_of(original_name) {
        Some(ext) => format!("{}{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    }
}

/// Extension to use for a download: the original upload name's, else the
/// stored name's, else empty.
pub fn preferred_extension(original_name: &str, stored_name: &str) -> String {
    extension_of(original_name)
        .or_else(|| extension_of(stored_name))
        .unwrap_or_default()
}

/// Builds `"{grade}-{class_number}-{student_name}{extension}"` with the
/// student name sanitized: `\r`/`\n` removed (header injection), `"`, `\` and
/// `/` replaced with `_`. A name that collapses to whitespace falls back to
/// the literal base `"download"`.
pub fn build_download_name(
    grade: i32,
    class_number: i32,
    student_name: &str,
    extension: &str,
) -> String {
    let sanitized: String = student_name
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .map(|c| match c {
            '"' | '\\' | '/' => '_',
            other => other,
        })
        .collect();
    let sanitized = sanitized.trim();

    let base = if sanitized.is_empty() {
        "download".to_string()
    } else {
        format!("{grade}-{class_number}-{sanitized}")
    };

    format!("{base}{extension}")
}
