use thiserror::Error;
use url::Url;

use crate::{config::ConfigError, errors::OperationError, version::ApiVersion};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("[E101] Invalid base URL: {0}\n\nSuggestions:\n  • Provide a valid HTTP or HTTPS URL\n  • Example: https://api.amazonalexa.com")]
    CannotBeBase(Url),

    #[error("[E102] Invalid URL format: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("[E103] Invalid access token\n\nSuggestions:\n  • The token must be a non-empty string without line breaks\n  • Exchange a refresh token with --refresh-token")]
    InvalidToken,

    #[error("[E104] Operation `{operation}` is not available in API version {version}")]
    Unsupported {
        operation: &'static str,
        version: ApiVersion,
    },

    #[error("[E105] Operation `{operation}` requires argument `{slot}`")]
    MissingArgument {
        operation: &'static str,
        slot: &'static str,
    },

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error("[E106] Unexpected response payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::CannotBeBase(_) => "E101",
            Self::UrlParse(_) => "E102",
            Self::InvalidToken => "E103",
            Self::Unsupported { .. } => "E104",
            Self::MissingArgument { .. } => "E105",
            Self::Operation(_) => "E100",
            Self::Decode(_) => "E106",
            Self::Config(ConfigError::Io(_)) => "E120",
            Self::Config(ConfigError::Toml(_)) => "E121",
            Self::Reqwest(_) => "E999",
        }
    }

    /// HTTP status behind this error; `None` when no response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Operation(e) => Some(e.status),
            Self::Reqwest(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub const fn as_operation(&self) -> Option<&OperationError> {
        match self {
            Self::Operation(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.as_operation().is_some_and(OperationError::is_rate_limited)
    }
}
