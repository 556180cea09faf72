pub mod config;

use validator::ValidationErrors;

/// Flattens `ValidationErrors` into one human-readable message per violated
/// constraint, in the shape the API returns for 400 responses.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect();
    messages.sort();
    messages
}
