//! Common validation utilities for client-built payloads.

use std::path::Path;

use validator::ValidationError;

/// Spreadsheet extensions accepted by the bulk import endpoints.
const SPREADSHEET_EXTENSIONS: [&str; 2] = ["xls", "xlsx"];

/// Maximum attachment size accepted by the notice endpoints (20 MiB).
pub const MAX_ATTACHMENT_BYTES: u64 = 20 * 1024 * 1024;

/// Validates that a text field is not made only of whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that an id used as a path segment is safe to splice into a URL.
pub fn validate_path_id(value: &str) -> Result<(), ValidationError> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("path_id");
        err.message = Some("Id may only contain letters, digits, '-', '_' and '.'".into());
        Err(err)
    }
}

/// Validates that an upload is an Excel workbook by extension.
pub fn validate_spreadsheet_path(path: &Path) -> Result<(), ValidationError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => {
            let mut err = ValidationError::new("spreadsheet_extension");
            err.message = Some("File must be an .xls or .xlsx workbook".into());
            Err(err)
        }
    }
}

/// Validates an attachment size against [`MAX_ATTACHMENT_BYTES`].
pub fn validate_attachment_size(bytes: u64) -> Result<(), ValidationError> {
    if bytes <= MAX_ATTACHMENT_BYTES {
        Ok(())
    } else {
        let mut err = ValidationError::new("attachment_size");
        err.message = Some("Attachment must be at most 20 MiB".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::lorem::en::Word;
    use fake::Fake;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("title").is_ok());
        assert!(validate_not_blank("  x ").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   \t").is_err());
    }

    #[test]
    fn test_validate_not_blank_error_message() {
        let err = validate_not_blank(" ").unwrap_err();
        assert_eq!(err.message.unwrap().to_string(), "Value must not be blank");
    }

    #[test]
    fn test_validate_path_id() {
        assert!(validate_path_id("42").is_ok());
        assert!(validate_path_id("SIM-2024_01.v2").is_ok());
        assert!(validate_path_id("").is_err());
        assert!(validate_path_id("../admin").is_err());
        assert!(validate_path_id("a b").is_err());
        assert!(validate_path_id("a?b=1").is_err());
    }

    #[test]
    fn test_validate_path_id_random_words() {
        for _ in 0..20 {
            let word: String = Word().fake();
            assert!(validate_path_id(&word).is_ok(), "{} should be accepted", word);
        }
    }

    #[test]
    fn test_validate_spreadsheet_path() {
        assert!(validate_spreadsheet_path(Path::new("machines.xlsx")).is_ok());
        assert!(validate_spreadsheet_path(Path::new("/tmp/ROUTING.XLS")).is_ok());
        assert!(validate_spreadsheet_path(Path::new("machines.csv")).is_err());
        assert!(validate_spreadsheet_path(Path::new("machines")).is_err());
    }

    #[test]
    fn test_validate_attachment_size() {
        assert!(validate_attachment_size(0).is_ok());
        assert!(validate_attachment_size(MAX_ATTACHMENT_BYTES).is_ok());
        assert!(validate_attachment_size(MAX_ATTACHMENT_BYTES + 1).is_err());
    }
}
