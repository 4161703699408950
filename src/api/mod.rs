use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::participant::Participant;

/// Body of the single POST issued per [`send_message`] call.
///
/// `messages` is the prior conversation history, passed through verbatim;
/// this layer never inspects individual turns.
///
/// [`send_message`]: crate::core::chat_stream::MultiChatClient::send_message
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<Value>,
    pub participants: Vec<Participant>,
    pub system_prompt: String,
    pub extended_thinking: bool,
    pub budget_tokens: u32,
    pub prefill_content: String,
}

/// One decoded event from the response stream.
///
/// The wire format is a `data: <json>` line per event, tagged by `type`.
/// Kinds outside the known set deserialize to [`StreamEvent::Unknown`] and
/// are dropped by the dispatch loop rather than treated as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    /// Partial text attributed to one participant.
    Chunk {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        participant: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
    /// Server-reported application error; terminal for the call.
    Error {
        #[serde(default)]
        message: String,
    },
    /// Terminal marker; nothing after it is read.
    Complete,
    /// Pacing hint from the server, in milliseconds.
    Delay { delay: u64 },
    #[serde(other)]
    Unknown,
}
