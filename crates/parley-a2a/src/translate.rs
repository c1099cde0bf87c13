//! Frame-to-chat-message translation.
//!
//! Takes the payload lines produced by [`crate::sse`], decodes each one as an
//! RPC envelope, extracts agent routing from the free-text annotation, and
//! classifies the message kind. One [`ChatMessage`] per recognized frame, in
//! arrival order; anything malformed is dropped without ending the session.

use std::sync::LazyLock;

use bytes::Bytes;
use futures::Stream;
use regex::Regex;
use tokio_stream::StreamExt;
use tracing::debug;

use parley_core::{ChatMessage, MessageType};

use crate::envelope::{INTERMEDIATE_PREFIX, STATE_COMPLETED, StreamEnvelope};
use crate::sse::{FrameParserOptions, parse_frame_lines};

/// Directional annotation grammar: `[<from> -> <to>]`, whitespace-tolerant
/// around the arrow, lazy captures. Kept deliberately narrow — this is a
/// fixed tag format, not a general parser.
static FROM_TO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.+?)\s*->\s*(.+?)\]").expect("valid regex"));

/// Options steering translation.
#[derive(Clone, Debug)]
pub struct TranslateOptions {
    /// Substring identifying the orchestrating agent in `from` ids.
    ///
    /// Substring containment is the upstream contract: two distinct agent
    /// ids sharing this substring classify identically.
    pub orchestrator: String,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            orchestrator: "person_a".into(),
        }
    }
}

/// Parse the directional annotation.
///
/// On a match, returns the `(from, to)` pair; otherwise both sides are
/// empty strings.
#[must_use]
pub fn parse_from_to(annotation: &str) -> (String, String) {
    match FROM_TO.captures(annotation) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string()),
        None => (String::new(), String::new()),
    }
}

/// Classify one frame into a message kind.
///
/// Evaluated in this exact priority order:
/// 1. a completed lifecycle state wins over everything else
/// 2. an intermediate-step message id with distinct endpoints is directional:
///    a request when `from` contains the orchestrator tag, a response
///    otherwise
/// 3. anything else is an orchestrator-originated request
#[must_use]
pub fn classify(
    state: &str,
    message_id: &str,
    from: &str,
    to: &str,
    orchestrator: &str,
) -> MessageType {
    if state == STATE_COMPLETED {
        return MessageType::FinalResponse;
    }
    if message_id.starts_with(INTERMEDIATE_PREFIX) && from != to {
        if from.contains(orchestrator) {
            return MessageType::InterAgentRequest;
        }
        return MessageType::InterAgentResponse;
    }
    MessageType::InterAgentRequest
}

/// Translate one marker-stripped payload line into a chat message.
///
/// Returns `None` for undecodable payloads and for frames without a
/// `result` or first message part.
#[must_use]
pub fn translate_frame(payload: &str, options: &TranslateOptions) -> Option<ChatMessage> {
    let envelope: StreamEnvelope = match serde_json::from_str(payload) {
        Ok(envelope) => envelope,
        Err(e) => {
            debug!(error = %e, "dropping undecodable frame payload");
            return None;
        }
    };

    let fields = envelope.extract()?;
    let (from, to) = parse_from_to(&fields.from_to);
    let message_type = classify(
        &fields.state,
        &fields.message_id,
        &from,
        &to,
        &options.orchestrator,
    );

    Some(ChatMessage::new(message_type, fields.text, from, to))
}

/// Translate an upstream byte stream into chat messages.
///
/// One message per recognized frame, in upstream arrival order — no
/// reordering, no batching, no buffering beyond line reassembly. The stream
/// ends when the upstream connection ends, cleanly or not; the caller owns
/// the terminal sentinel. Pull-driven: dropping the returned stream drops
/// the upstream connection with it.
pub fn translate_frames<S, E>(
    byte_stream: S,
    options: TranslateOptions,
) -> impl Stream<Item = ChatMessage> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + Unpin + 'static,
    E: std::fmt::Display + Send + 'static,
{
    parse_frame_lines(byte_stream, FrameParserOptions::default())
        .filter_map(move |line| translate_frame(&line, &options))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
