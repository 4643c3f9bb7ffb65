use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComparisonError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("correction service {context}: {message}")]
    Service {
        context: &'static str,
        message: String,
    },
    #[error("correction service did not answer within {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("invalid rule pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl ComparisonError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub fn service(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Service {
            context,
            message: err.to_string(),
        }
    }

    pub(crate) fn timeout(timeout_ms: u64) -> Self {
        Self::Timeout { timeout_ms }
    }

    pub(crate) fn pattern(pattern: &str, source: regex::Error) -> Self {
        Self::Pattern {
            pattern: pattern.to_string(),
            source,
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
