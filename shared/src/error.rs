use serde::{Serialize, Deserialize};
use std::fmt;
use thiserror::Error;

/// Postgres `unique_violation`, surfaced by the store when a voter already has a row.
pub const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone, Copy, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    #[error("Network request failed")]
    Network,
    #[error("Resource conflict")]
    Conflict,
    #[error("Operation not authorized")]
    Unauthorized,
    #[error("Resource not found")]
    NotFound,
    #[error("Malformed response")]
    Decode,
    #[error("Browser storage unavailable")]
    Storage,
    #[error("Internal system error")]
    SystemError,
}

/// Error body returned by the hosted table store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(details) = &self.details {
            write!(f, "{}: {} ({})", self.code, self.message, details)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Classifies a store error body. Uniqueness violations become `Conflict`.
    pub fn from_store(status: u16, body: ErrorResponse) -> Self {
        let code = match (status, body.code.as_deref()) {
            (_, Some(UNIQUE_VIOLATION)) | (409, _) => ErrorCode::Conflict,
            (401 | 403, _) => ErrorCode::Unauthorized,
            (404, _) => ErrorCode::NotFound,
            _ => ErrorCode::SystemError,
        };
        match body.code {
            Some(store_code) => Self::with_details(code, body.message, store_code),
            None => Self::new(code, body.message),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Network, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Decode, message)
    }

    pub fn is_conflict(&self) -> bool {
        self.code == ErrorCode::Conflict
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn body(code: Option<&str>) -> ErrorResponse {
        ErrorResponse { code: code.map(String::from), message: "duplicate key".into() }
    }

    #[test]
    fn unique_violation_is_conflict() {
        let err = Error::from_store(400, body(Some(UNIQUE_VIOLATION)));
        assert!(err.is_conflict());
        assert_eq!(err.details.as_deref(), Some(UNIQUE_VIOLATION));
    }

    #[test]
    fn status_fallbacks() {
        assert_eq!(Error::from_store(401, body(None)).code, ErrorCode::Unauthorized);
        assert_eq!(Error::from_store(409, body(None)).code, ErrorCode::Conflict);
        assert_eq!(Error::from_store(500, body(Some("XX000"))).code, ErrorCode::SystemError);
    }
}
