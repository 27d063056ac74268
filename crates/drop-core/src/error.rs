//! Error taxonomy shared by every core operation.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Caller is not authenticated, or presented the wrong secret.
    #[error("authentication required")]
    Auth,

    /// Malformed input: empty selection, blank text, unsafe file name.
    #[error("{0}")]
    Validation(String),

    #[error("file not found: {0}")]
    NotFound(String),

    /// Upload larger than the configured maximum. Raised before any write.
    #[error("upload of {size} bytes exceeds the {limit} byte limit")]
    SizeLimit { size: u64, limit: u64 },

    /// Filesystem failure underneath the store or the text slot.
    #[error("{context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn storage(context: impl Into<String>, source: io::Error) -> Self {
        Error::Storage {
            context: context.into(),
            source,
        }
    }

    /// Stable machine-readable code reported alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Auth => "auth_required",
            Error::Validation(_) => "invalid_request",
            Error::NotFound(_) => "not_found",
            Error::SizeLimit { .. } => "too_large",
            Error::Storage { .. } => "storage_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            Error::Auth,
            Error::validation("x"),
            Error::NotFound("x".into()),
            Error::SizeLimit { size: 2, limit: 1 },
            Error::storage("x", io::Error::other("boom")),
        ];
        let mut codes: Vec<_> = errors.iter().map(Error::code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_storage_message_includes_context() {
        let err = Error::storage(
            "writing report.pdf",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "writing report.pdf: denied");
    }
}
