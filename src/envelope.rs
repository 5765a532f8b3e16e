//! The fixed response envelope expected by the invoking orchestration
//! framework.
//!
//! Every invocation, successful or not, returns this shape. The result
//! payload is serialized into the `TEXT.body` field as a JSON string;
//! serde_json leaves non-ASCII characters literal, so localized summaries
//! survive the double encoding intact.

use crate::tools::SearchOutcome;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Action group reported when the event does not carry one
pub const DEFAULT_ACTION_GROUP: &str = "WebSearchGroup";

/// Function name reported when the event does not carry one
pub const DEFAULT_FUNCTION: &str = "tavily_search";

/// Payload type discriminator used by the invoking framework
const PAYLOAD_TYPE: &str = "search_results";

/// Result payload embedded (JSON-encoded) in the envelope body
#[derive(Debug, Clone, Serialize)]
pub struct ResultPayload {
    #[serde(rename = "type")]
    pub payload_type: String,
    pub query: String,
    pub search_performed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub outcome: SearchOutcome,
}

impl ResultPayload {
    /// Successful search payload.
    ///
    /// Note the provider-failure fallback also flows through here with
    /// `search_performed: true` and an empty outcome; that mirrors the
    /// upstream contract this gateway reproduces.
    #[must_use]
    pub fn success(query: String, processing_time: f64, outcome: SearchOutcome) -> Self {
        Self {
            payload_type: PAYLOAD_TYPE.to_string(),
            query,
            search_performed: true,
            processing_time: Some(processing_time),
            error: None,
            outcome,
        }
    }

    /// Failure payload for validation, configuration, and unexpected errors
    #[must_use]
    pub fn failure(query: String, error_message: String) -> Self {
        let summary = format!("エラーが発生しました: {error_message}");
        Self {
            payload_type: PAYLOAD_TYPE.to_string(),
            query,
            search_performed: false,
            processing_time: None,
            error: Some(error_message),
            outcome: SearchOutcome::empty_with_summary(summary),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseEnvelope {
    #[serde(rename = "messageVersion")]
    pub message_version: String,
    pub response: EnvelopeResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvelopeResponse {
    #[serde(rename = "actionGroup")]
    pub action_group: String,
    pub function: String,
    #[serde(rename = "functionResponse")]
    pub function_response: FunctionResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionResponse {
    #[serde(rename = "responseBody")]
    pub response_body: ResponseBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseBody {
    #[serde(rename = "TEXT")]
    pub text: TextBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextBody {
    pub body: String,
}

impl ResponseEnvelope {
    /// Wrap a payload for the given event.
    ///
    /// `actionGroup` and `function` are copied from the event when present.
    /// Construction is infallible: a payload that cannot be serialized is
    /// replaced by a minimal error body rather than propagating.
    #[must_use]
    pub fn wrap(event: &Value, payload: &ResultPayload) -> Self {
        let body = serde_json::to_string(payload).unwrap_or_else(|e| {
            format!("{{\"type\":\"search_results\",\"error\":\"serialization failed: {e}\"}}")
        });

        Self {
            message_version: "1.0".to_string(),
            response: EnvelopeResponse {
                action_group: event_string(event, "actionGroup", DEFAULT_ACTION_GROUP),
                function: event_string(event, "function", DEFAULT_FUNCTION),
                function_response: FunctionResponse {
                    response_body: ResponseBody {
                        text: TextBody { body },
                    },
                },
            },
        }
    }

    /// Decode the embedded payload body back into JSON (test and debugging
    /// aid)
    pub fn payload(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.response.function_response.response_body.text.body)
    }
}

fn event_string(event: &Value, key: &str, default: &str) -> String {
    event
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}
