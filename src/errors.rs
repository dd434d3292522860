use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::fmt::{self, Formatter};
use thiserror::Error;

/// Normalized non-2xx outcome of a remote call.
///
/// Every operation reports failures in this one shape regardless of which
/// endpoint produced them, so retry decisions only ever look at `status`.
#[derive(Clone, Debug, Error, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationError {
    pub status: u16,
    pub status_text: String,
    pub data: Value,
}

impl OperationError {
    pub fn new(status: StatusCode, data: Value) -> Self {
        Self {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            data,
        }
    }

    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.status == StatusCode::TOO_MANY_REQUESTS.as_u16()
    }

    /// Server supplied `message` field, when the payload carries one.
    pub fn message(&self) -> Option<&str> {
        self.data.get("message").and_then(Value::as_str)
    }

    fn suggestions(&self) -> &'static [&'static str] {
        match self.status {
            401 => &[
                "Refresh the access token with --refresh-token",
                "Check that the token was issued for this region",
            ],
            403 => &["Verify that the vendor owns the skill being accessed"],
            404 => &[
                "Check that the skill and stage identifiers are correct",
                "The legacy API version does not expose every resource",
            ],
            429 => &[
                "Wait a moment before retrying",
                "Consider reducing request frequency",
            ],
            500..=599 => &["The service is having trouble, try again later"],
            _ => &[],
        }
    }
}

impl fmt::Display for OperationError {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "[E100] HTTP {} {}", self.status, self.status_text)?;

        match self.message() {
            Some(message) => write!(formatter, ": {message}")?,
            None if !self.data.is_null() => write!(formatter, ": {}", self.data)?,
            None => {}
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            write!(formatter, "\n\nSuggestions:")?;
            for suggestion in suggestions {
                write!(formatter, "\n  • {suggestion}")?;
            }
        }

        Ok(())
    }
}
