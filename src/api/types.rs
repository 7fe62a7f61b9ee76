//! API request and response types

use crate::state_machine::{Draft, Event, FormSubmission, Stage, UiHint};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Request to run one chat turn.
///
/// Every field is optional and read leniently: a field of the wrong type is
/// treated as absent, and a body that is not JSON at all is an empty request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub message: Option<String>,
    pub form: Option<FormSubmission>,
}

impl ChatRequest {
    pub fn from_body(body: &[u8]) -> Self {
        let value = match serde_json::from_slice::<Value>(body) {
            Ok(value) => value,
            Err(e) => {
                if !body.is_empty() {
                    tracing::debug!(error = %e, "Unparseable chat body, using empty request");
                }
                return Self::default();
            }
        };

        let text_field = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        let form = value.get("form").and_then(|form| {
            serde_json::from_value::<FormSubmission>(form.clone())
                .inspect_err(|e| tracing::debug!(error = %e, "Ignoring malformed form"))
                .ok()
        });

        Self {
            session_id: text_field("sessionId").filter(|id| !id.trim().is_empty()),
            message: text_field("message"),
            form,
        }
    }

    /// A form wins over free text when both are present
    pub fn into_event(self) -> Event {
        match self.form {
            Some(form) => Event::FormSubmit(form),
            None => Event::message(self.message.unwrap_or_default()),
        }
    }
}

/// Reply to one chat turn
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    pub session_id: Option<String>,
    pub ui: Option<UiHint>,
}

impl ChatResponse {
    pub const APOLOGY: &'static str = "Sorry, something went wrong. Please try again.";

    /// The fixed reply for a turn that failed internally
    pub fn apology() -> Self {
        Self {
            reply: Self::APOLOGY.to_string(),
            session_id: None,
            ui: None,
        }
    }
}

/// Current state of one session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub stage: Stage,
    pub draft: Draft,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub live_sessions: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
