use chrono::NaiveDate;

use crate::error::{AppError, AppResult};

/// Extensions accepted for leave documents.
pub const LEAVE_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg"];

/// Extensions a profile photo may be stored under. Each maps to a raster
/// `image/*` type when served.
pub const PHOTO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Returns the trimmed value or a `BadRequest` carrying `message`.
pub fn require_text(value: Option<&str>, message: &str) -> AppResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::bad_request(message)),
    }
}

pub fn validate_email(email: &str) -> AppResult<()> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if !valid {
        return Err(AppError::bad_request("Email inválido"));
    }
    Ok(())
}

/// Parses `YYYY-MM-DD`. An empty string clears the field.
pub fn parse_birth_date(value: &str) -> AppResult<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| AppError::bad_request("Formato de data inválido. Use YYYY-MM-DD"))
}

pub fn file_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    (!ext.is_empty()).then(|| ext.to_lowercase())
}

pub fn validate_leave_file(filename: &str) -> AppResult<String> {
    match file_extension(filename) {
        Some(ext) if LEAVE_EXTENSIONS.contains(&ext.as_str()) => Ok(ext),
        _ => Err(AppError::bad_request("Tipo de arquivo não permitido")),
    }
}

/// Reduces a client supplied file name to ASCII letters, digits, `.`, `-` and
/// `_`. Separators become `_`; leading dots are stripped.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    cleaned.trim_start_matches('.').to_string()
}

/// Storage keys are relative paths made of sanitized segments.
pub fn is_safe_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('/')
        && key
            .split('/')
            .all(|seg| !seg.is_empty() && seg != "." && seg != ".." && !seg.contains('\\'))
}
