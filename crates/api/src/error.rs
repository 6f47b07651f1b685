use persistence::StoreError;
use thiserror::Error;

/// Message shown when a failed response carries no `message` of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "요청 처리 중 오류가 발생했습니다.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS, ...).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    /// The owning view went away before the response arrived.
    #[error("Request cancelled")]
    Cancelled,

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request body could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Local state error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// HTTP status for [`ApiError::Status`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short message suitable for showing in place of the data.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Validation(message) => message.clone(),
            Self::NotAuthenticated => "로그인이 필요합니다.".to_string(),
            Self::Cancelled => "요청이 취소되었습니다.".to_string(),
            _ => FALLBACK_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    let message = e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{}: {}", field, message)
                })
            })
            .collect();
        details.sort();

        let message = if details.len() == 1 {
            details.remove(0)
        } else {
            format!("{} validation errors: {}", details.len(), details.join("; "))
        };

        ApiError::Validation(message)
    }
}

impl From<validator::ValidationError> for ApiError {
    fn from(error: validator::ValidationError) -> Self {
        ApiError::Validation(
            error
                .message
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::CommentPayload;
    use validator::Validate;

    #[test]
    fn test_status_error_displays_server_message() {
        let error = ApiError::Status {
            status: 409,
            message: "이미 존재하는 제품입니다".to_string(),
        };
        assert_eq!(error.to_string(), "이미 존재하는 제품입니다");
        assert_eq!(error.status(), Some(409));
        assert_eq!(error.user_message(), "이미 존재하는 제품입니다");
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(ApiError::Cancelled.to_string(), "Request cancelled");
        assert_eq!(ApiError::NotAuthenticated.to_string(), "Not signed in");
        assert_eq!(
            ApiError::Validation("test".to_string()).to_string(),
            "Validation error: test"
        );
        assert_eq!(ApiError::Cancelled.status(), None);
    }

    #[test]
    fn test_from_validation_errors() {
        let errors = CommentPayload {
            content: String::new(),
        }
        .validate()
        .unwrap_err();

        match ApiError::from(errors) {
            ApiError::Validation(msg) => assert!(msg.starts_with("content: ")),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_single_validation_error() {
        let error = shared::validation::validate_path_id("a/b").unwrap_err();
        match ApiError::from(error) {
            ApiError::Validation(msg) => assert!(msg.contains("Id may only contain")),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_io_errors_fall_back_to_generic_message() {
        let error = ApiError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "x"));
        assert_eq!(error.user_message(), FALLBACK_ERROR_MESSAGE);
    }
}
