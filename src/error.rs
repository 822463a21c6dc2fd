use async_openai::error::OpenAIError;
use std::io;
use thiserror::Error;

/// Custom result type alias for the application
pub type Result<T> = std::result::Result<T, AnalystError>;

/// Errors that can occur while analyzing or exporting a repository report
#[derive(Debug, Error)]
pub enum AnalystError {
    /// The input does not look like a repository URL
    #[error("Malformed repository URL `{0}`: expected https://github.com/<owner>/<repo>")]
    MalformedUrl(String),

    /// The forge answered with a non-200 status
    #[error("GitHub API error: {status} - {body}")]
    UpstreamApi {
        /// HTTP status code returned by the forge
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The forge did not answer within the configured timeout
    #[error("Request to the GitHub API timed out, please try again later")]
    UpstreamTimeout,

    /// Connection or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// The external text-generation service failed
    #[error("Analysis service error: {0}")]
    AnalysisService(String),

    /// Export requested in a format we do not produce
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// Document rendering errors
    #[error("Export error: {0}")]
    Export(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// I/O errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing/serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<OpenAIError> for AnalystError {
    fn from(err: OpenAIError) -> Self {
        Self::AnalysisService(err.to_string())
    }
}

impl From<reqwest::Error> for AnalystError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::UpstreamTimeout
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl AnalystError {
    /// Whether the failure was caused by what the caller sent us
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MalformedUrl(_) | Self::UnsupportedFormat(_))
    }

    /// HTTP status the web service answers with for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MalformedUrl(_) | Self::UnsupportedFormat(_) => 400,
            Self::UpstreamApi { status: 404, .. } => 404,
            Self::UpstreamApi { .. } | Self::Network(_) | Self::Json(_) => 502,
            Self::UpstreamTimeout => 504,
            Self::AnalysisService(_)
            | Self::Export(_)
            | Self::Config(_)
            | Self::Io(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(AnalystError::MalformedUrl("x".into()), 400 ; "malformed url")]
    #[test_case(AnalystError::UnsupportedFormat("docx".into()), 400 ; "unsupported format")]
    #[test_case(AnalystError::UpstreamApi { status: 404, body: String::new() }, 404 ; "missing repo")]
    #[test_case(AnalystError::UpstreamApi { status: 403, body: String::new() }, 502 ; "rate limited")]
    #[test_case(AnalystError::UpstreamTimeout, 504 ; "timeout")]
    #[test_case(AnalystError::AnalysisService("down".into()), 500 ; "llm failure")]
    fn test_status_code(error: AnalystError, expected: u16) {
        assert_eq!(error.status_code(), expected);
    }

    #[test]
    fn test_is_client_error() {
        assert!(AnalystError::MalformedUrl("github.com".into()).is_client_error());
        assert!(!AnalystError::Network("connection refused".into()).is_client_error());
    }

    #[test]
    fn test_upstream_message_carries_status_and_body() {
        let error = AnalystError::UpstreamApi {
            status: 404,
            body: r#"{"message":"Not Found"}"#.into(),
        };
        assert_eq!(
            error.to_string(),
            r#"GitHub API error: 404 - {"message":"Not Found"}"#
        );
    }
}
