use crate::error::{LogSearchError, Result};
use serde_json::Value;

const MAX_BODY_PREVIEW: usize = 200;

/// A backend reply the session knows how to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentReply {
    /// The agent asks the user a follow-up question
    InputRequired { prompt: String },
    /// A final answer to the query
    Answer { result: String },
}

/// The recognized reply shapes.
///
/// The backend protocol version is not pinned, so each shape accepts both the
/// old `status` and the new `type` discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    InputRequired,
    Answer,
}

/// Order in which shapes are tried. A body matching both is an input request.
pub const REPLY_PRECEDENCE: [ReplyKind; 2] = [ReplyKind::InputRequired, ReplyKind::Answer];

impl ReplyKind {
    pub fn matches(self, body: &Value) -> bool {
        match self {
            ReplyKind::InputRequired => {
                field_is(body, "type", "human_input_required")
                    || field_is(body, "status", "requires_input")
            }
            ReplyKind::Answer => {
                field_is(body, "status", "success") || field_is(body, "type", "normal_response")
            }
        }
    }

    fn extract(self, body: &Value) -> AgentReply {
        match self {
            ReplyKind::InputRequired => AgentReply::InputRequired {
                prompt: text_field(body, "prompt"),
            },
            ReplyKind::Answer => AgentReply::Answer {
                result: text_field(body, "result"),
            },
        }
    }
}

impl AgentReply {
    /// Interprets a response body. Bodies matching no known shape are a
    /// protocol error.
    pub fn decode(body: &Value) -> Result<Self> {
        REPLY_PRECEDENCE
            .iter()
            .find(|kind| kind.matches(body))
            .map(|kind| kind.extract(body))
            .ok_or_else(|| {
                LogSearchError::Protocol(format!(
                    "unrecognized reply {}",
                    preview(&body.to_string())
                ))
            })
    }

    pub fn kind(&self) -> ReplyKind {
        match self {
            AgentReply::InputRequired { .. } => ReplyKind::InputRequired,
            AgentReply::Answer { .. } => ReplyKind::Answer,
        }
    }

    /// Text for the agent message
    pub fn into_content(self) -> String {
        match self {
            AgentReply::InputRequired { prompt } => prompt,
            AgentReply::Answer { result } => result,
        }
    }
}

fn field_is(body: &Value, key: &str, expected: &str) -> bool {
    body.get(key).and_then(Value::as_str) == Some(expected)
}

// Missing content renders as an empty reply; non-string content is shown as JSON.
fn text_field(body: &Value, key: &str) -> String {
    match body.get(key) {
        Some(Value::String(text)) => text.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= MAX_BODY_PREVIEW {
        return text.to_string();
    }
    let truncated: String = text.chars().take(MAX_BODY_PREVIEW).collect();
    format!("{}...", truncated)
}
