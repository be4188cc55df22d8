use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotezError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service responded {status}: {body}")]
    Status { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("Api Error: {0}")]
    Api(String),

    #[error(transparent)]
    Failed(#[from] Failure),
}

pub type Result<T> = std::result::Result<T, NotezError>;

/// Which controller operation failed. Each kind maps to one user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ListLoadFailed,
    SingleLoadFailed,
    SaveFailed,
    DeleteFailed,
}

impl FailureKind {
    pub fn message(&self) -> &'static str {
        match self {
            FailureKind::ListLoadFailed => "Could not load notes. Is the backend running?",
            FailureKind::SingleLoadFailed => "Could not load that note.",
            FailureKind::SaveFailed => "Could not save note.",
            FailureKind::DeleteFailed => "Could not delete note.",
        }
    }
}

/// A failed controller operation, as shown in the message area.
///
/// `Display` renders only the user message; `detail` keeps the underlying
/// error text for logs and verbose output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub detail: String,
}

impl Failure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn from_error(kind: FailureKind, err: &NotezError) -> Self {
        Self::new(kind, err.to_string())
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for Failure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_displays_user_message_only() {
        let failure = Failure::new(FailureKind::ListLoadFailed, "connection refused");
        assert_eq!(
            failure.to_string(),
            "Could not load notes. Is the backend running?"
        );
        assert_eq!(failure.detail, "connection refused");
    }

    #[test]
    fn status_error_carries_code_and_body() {
        let err = NotezError::Status {
            status: 404,
            body: "{\"detail\":\"Note not found\"}".into(),
        };
        let failure = Failure::from_error(FailureKind::DeleteFailed, &err);
        assert!(failure.detail.contains("404"));
        assert_eq!(failure.message(), "Could not delete note.");
    }

    #[test]
    fn wrapped_failure_displays_as_the_user_message() {
        let err: NotezError = Failure::new(FailureKind::SaveFailed, "503").into();
        assert_eq!(err.to_string(), "Could not save note.");
    }
}
