//! JSON-RPC wire types for the upstream agent gateway.
//!
//! Outbound: the `message/stream` request envelope, built once per chat
//! message. Inbound: the streamed result schema, decoded defensively — every
//! nested field is optional with a stated default, so no frame can fail a
//! session by shape alone.

use serde::{Deserialize, Serialize};

use parley_core::RequestId;

// ─────────────────────────────────────────────────────────────────────────────
// Protocol constants
// ─────────────────────────────────────────────────────────────────────────────

/// JSON-RPC protocol version marker.
pub const JSONRPC_VERSION: &str = "2.0";

/// Streaming send-message method name.
pub const METHOD_MESSAGE_STREAM: &str = "message/stream";

/// Metadata sender value marking a human-initiated request.
pub const SENDER_HUMAN: &str = "human";

/// Lifecycle label for in-flight work; also the decode default for a frame
/// that carries no state.
pub const STATE_WORKING: &str = "working";

/// Lifecycle label on the orchestrator's final answer.
pub const STATE_COMPLETED: &str = "completed";

/// Message-id prefix marking an intermediate agent-to-agent step.
pub const INTERMEDIATE_PREFIX: &str = "intermediate-";

// ─────────────────────────────────────────────────────────────────────────────
// Outbound request envelope
// ─────────────────────────────────────────────────────────────────────────────

/// Outbound `message/stream` request envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StreamRequest {
    /// Always [`JSONRPC_VERSION`].
    pub jsonrpc: String,
    /// Fresh unique request id.
    pub id: RequestId,
    /// Always [`METHOD_MESSAGE_STREAM`].
    pub method: String,
    /// Call parameters.
    pub params: StreamParams,
}

/// Parameters of a `message/stream` call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StreamParams {
    /// The message being sent.
    pub message: OutboundMessage,
    /// Accepted output configuration.
    pub configuration: StreamConfiguration,
    /// Request metadata.
    pub metadata: StreamMetadata,
}

/// The user message inside the request params.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    /// Always `"user"`.
    pub role: String,
    /// A single text part.
    pub parts: Vec<OutboundPart>,
    /// Carries the generation timestamp (`msg-<epoch millis>`).
    pub message_id: String,
}

/// One part of an outbound message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutboundPart {
    /// Always `"text"`.
    #[serde(rename = "type")]
    pub part_type: String,
    /// The text payload.
    pub text: String,
}

/// Output-modality declaration: text only.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamConfiguration {
    /// Accepted output modes.
    pub accepted_output_modes: Vec<String>,
}

/// Request metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StreamMetadata {
    /// Who initiated the request; always [`SENDER_HUMAN`] here.
    pub sender: String,
}

impl StreamRequest {
    /// Build a `message/stream` request for one human chat message.
    #[must_use]
    pub fn for_text(text: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            id: RequestId::new(),
            method: METHOD_MESSAGE_STREAM.into(),
            params: StreamParams {
                message: OutboundMessage {
                    role: "user".into(),
                    parts: vec![OutboundPart {
                        part_type: "text".into(),
                        text: text.into(),
                    }],
                    message_id: format!("msg-{}", chrono::Utc::now().timestamp_millis()),
                },
                configuration: StreamConfiguration {
                    accepted_output_modes: vec!["text".into()],
                },
                metadata: StreamMetadata {
                    sender: SENDER_HUMAN.into(),
                },
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inbound response envelope
// ─────────────────────────────────────────────────────────────────────────────

/// One decoded upstream frame payload.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StreamEnvelope {
    /// The RPC result; frames without one are dropped.
    pub result: Option<RpcResult>,
}

/// The `result` object of a streamed frame.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RpcResult {
    /// Result-level id; preferred over the message id when present.
    pub id: Option<String>,
    /// Task status update.
    pub status: Option<TaskStatus>,
}

/// Task status inside a result.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TaskStatus {
    /// Free-text lifecycle label.
    pub state: Option<String>,
    /// The status message, if any.
    pub message: Option<StatusMessage>,
}

/// Message attached to a status update.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StatusMessage {
    /// Message-level id; fallback when the result has none.
    #[serde(rename = "messageId")]
    pub message_id: Option<String>,
    /// Message parts; only the first is consulted.
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

/// One part of a status message.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MessagePart {
    /// Text payload.
    pub text: Option<String>,
    /// Free-text metadata.
    pub metadata: Option<PartMetadata>,
}

/// Part metadata carrying the directional annotation.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PartMetadata {
    /// Annotation of the form `[<from> -> <to>]`.
    pub from_to: Option<String>,
}

/// Fields pulled out of one frame of interest, defaults applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameFields {
    /// First part's text; empty when absent.
    pub text: String,
    /// Raw directional annotation; empty when absent.
    pub from_to: String,
    /// Lifecycle label; [`STATE_WORKING`] when absent.
    pub state: String,
    /// Result id, falling back to the message id, falling back to empty.
    pub message_id: String,
}

impl StreamEnvelope {
    /// Unwrap the nested result schema.
    ///
    /// Returns `None` when the frame has no `result` or no first message
    /// part — such frames are dropped before classification.
    #[must_use]
    pub fn extract(&self) -> Option<FrameFields> {
        let result = self.result.as_ref()?;
        let status = result.status.as_ref()?;
        let message = status.message.as_ref()?;
        let part = message.parts.first()?;

        // Empty strings count as absent, like the upstream's own clients
        // treat them.
        Some(FrameFields {
            text: part.text.clone().unwrap_or_default(),
            from_to: part
                .metadata
                .as_ref()
                .and_then(|m| m.from_to.clone())
                .unwrap_or_default(),
            state: status
                .state
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| STATE_WORKING.to_string()),
            message_id: result
                .id
                .clone()
                .filter(|s| !s.is_empty())
                .or_else(|| message.message_id.clone().filter(|s| !s.is_empty()))
                .unwrap_or_default(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
