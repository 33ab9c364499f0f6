use thiserror::Error;

/// Messages the backend is known to return for business-rule rejections.
/// There is no error-code channel; matching is exact string comparison.
pub const MSG_DUPLICATE_DAY: &str = "이미 일정이 존재합니다.";
pub const MSG_DUPLICATE_EMAIL: &str = "이미 존재하는 이메일입니다.";

/// What a call to the service can fail with. The only structured
/// distinction the client makes is "one of the known messages or not";
/// everything else is generic and terminal for the triggering action.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {0}")]
    Status(reqwest::StatusCode),

    /// The backend said no. The message is shown to the user verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The backend message, when there is one.
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_duplicate_day(&self) -> bool {
        self.message() == Some(MSG_DUPLICATE_DAY)
    }

    pub fn is_duplicate_email(&self) -> bool {
        self.message() == Some(MSG_DUPLICATE_EMAIL)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_messages_are_recognized() {
        let err = ApiError::Rejected(MSG_DUPLICATE_DAY.to_string());
        assert!(err.is_duplicate_day());
        assert!(!err.is_duplicate_email());
        assert_eq!(err.to_string(), MSG_DUPLICATE_DAY);
    }

    #[test]
    fn near_misses_are_not_special_cased() {
        let err = ApiError::Rejected("이미 일정이 존재합니다".to_string()); // no trailing dot
        assert!(!err.is_duplicate_day());
    }
}
