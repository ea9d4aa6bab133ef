//! Error types for the BlastSMS adapter.

use serde::Serialize;
use thiserror::Error;

/// Structured field validation failure.
///
/// Serializes to the JSON body returned with HTTP 400; each list is only
/// present when non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("missing parameters {missing_parameter:?}, unexpected parameters {unexpected_parameter:?}")]
pub struct ValidationError {
    /// Expected fields absent from the request, sorted.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_parameter: Vec<String>,
    /// Fields outside the schema, sorted.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unexpected_parameter: Vec<String>,
}

impl ValidationError {
    /// Returns true if neither list has entries.
    pub fn is_empty(&self) -> bool {
        self.missing_parameter.is_empty() && self.unexpected_parameter.is_empty()
    }

    /// Returns the JSON error body.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Errors produced while turning an HTTP request into field values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The request body could not be decoded.
    #[error("malformed request: {reason}")]
    MalformedBody {
        /// Reason for failure.
        reason: String,
    },

    /// Fields are missing or unexpected.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ExtractError {
    /// Creates a malformed body error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedBody {
            reason: reason.into(),
        }
    }

    /// Returns the JSON error body sent with HTTP 400.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::MalformedBody { reason } => serde_json::json!({ "invalid_request": reason }),
            Self::Validation(e) => e.to_json(),
        }
    }
}

/// Reasons an outbound message cannot be delivered.
///
/// The display strings are the nack reasons published on the bus.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutboundError {
    /// The reply has no text.
    #[error("Outbound message has no content.")]
    NoContent,

    /// The message does not reference an inbound message.
    #[error("Outbound message is not a reply")]
    NotAReply,

    /// The parked HTTP request could not be completed.
    #[error("Response to http request failed.")]
    ResponseFailed,

    /// The reply document could not be produced.
    #[error("Failed to render reply: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_json_omits_empty_lists() {
        let err = ValidationError {
            missing_parameter: vec!["msisdn".to_string(), "shortcode".to_string()],
            unexpected_parameter: vec![],
        };
        assert_eq!(
            err.to_json(),
            serde_json::json!({"missing_parameter": ["msisdn", "shortcode"]})
        );
    }

    #[test]
    fn test_nack_reasons() {
        assert_eq!(
            OutboundError::NoContent.to_string(),
            "Outbound message has no content."
        );
        assert_eq!(
            OutboundError::NotAReply.to_string(),
            "Outbound message is not a reply"
        );
        assert_eq!(
            OutboundError::ResponseFailed.to_string(),
            "Response to http request failed."
        );
    }
}
