//! Chat message vocabulary shared by the translator and its consumers.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::ids::MessageId;

/// Kind of a chat message shown to the client.
///
/// The stream translator only ever produces the three non-[`User`] kinds;
/// `User` exists so clients can echo the human's own message into the same
/// transcript. No fifth kind may ever appear on the wire.
///
/// [`User`]: MessageType::User
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// The human's own message, echoed client-side.
    User,
    /// An agent asking another agent to do work.
    InterAgentRequest,
    /// An agent answering another agent.
    InterAgentResponse,
    /// The orchestrator's final answer to the human.
    FinalResponse,
}

/// One chat message emitted to the client.
///
/// Created once, from exactly one upstream frame, and immutable thereafter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique per message; no ordering implied by the format.
    pub id: MessageId,
    /// Message kind.
    #[serde(rename = "type")]
    pub message_type: MessageType,
    /// Text payload. Possibly empty, never absent.
    pub content: String,
    /// Sending agent id; empty when no annotation was present.
    pub from: String,
    /// Receiving agent id; empty when no annotation was present.
    pub to: String,
    /// Milliseconds since the Unix epoch, stamped at emission.
    pub timestamp: i64,
    /// Groups messages of one agent-pair exchange; set by consumers,
    /// never by the translator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
}

impl ChatMessage {
    /// Create a message with a fresh id and the current timestamp.
    #[must_use]
    pub fn new(
        message_type: MessageType,
        content: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            message_type,
            content: content.into(),
            from: from.into(),
            to: to.into(),
            timestamp: Utc::now().timestamp_millis(),
            channel_id: None,
        }
    }

    /// Whether this message is one leg of an agent-to-agent exchange.
    #[must_use]
    pub fn is_inter_agent(&self) -> bool {
        matches!(
            self.message_type,
            MessageType::InterAgentRequest | MessageType::InterAgentResponse
        )
    }
}

/// Canonical channel id for an unordered agent pair.
///
/// Both directions of an exchange map to the same id.
#[must_use]
pub fn channel_id(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}<->{b}")
    } else {
        format!("{b}<->{a}")
    }
}

/// A grouped agent-to-agent exchange.
///
/// Derived by the consumer of the translated stream (e.g. a UI layer);
/// the gateway core never constructs channels itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Channel {
    /// Canonical unordered-pair id (see [`channel_id`]).
    pub id: String,
    /// The two participants, sorted.
    pub participants: [String; 2],
    /// Messages of this exchange, in arrival order.
    pub messages: Vec<ChatMessage>,
}

/// Bucket inter-agent messages into channels by unordered participant pair.
///
/// Non-inter-agent messages are left out. Each bucketed message gets its
/// `channel_id` filled in; order within a channel follows input order.
#[must_use]
pub fn group_into_channels(messages: &[ChatMessage]) -> Vec<Channel> {
    let mut channels: Vec<Channel> = Vec::new();
    for msg in messages.iter().filter(|m| m.is_inter_agent()) {
        let id = channel_id(&msg.from, &msg.to);
        let mut tagged = msg.clone();
        tagged.channel_id = Some(id.clone());
        if let Some(pos) = channels.iter().position(|c| c.id == id) {
            channels[pos].messages.push(tagged);
        } else {
            let mut participants = [msg.from.clone(), msg.to.clone()];
            participants.sort();
            channels.push(Channel {
                id,
                participants,
                messages: vec![tagged],
            });
        }
    }
    channels
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn inter(message_type: MessageType, from: &str, to: &str) -> ChatMessage {
        ChatMessage::new(message_type, "text", from, to)
    }

    // ── ChatMessage ─────────────────────────────────────────────────

    #[test]
    fn new_stamps_timestamp() {
        let msg = ChatMessage::new(MessageType::FinalResponse, "done", "a", "user");
        assert!(msg.timestamp > 0);
        assert!(msg.channel_id.is_none());
    }

    #[test]
    fn new_ids_are_unique() {
        let a = ChatMessage::new(MessageType::FinalResponse, "x", "", "");
        let b = ChatMessage::new(MessageType::FinalResponse, "x", "", "");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn inter_agent_predicate() {
        assert!(inter(MessageType::InterAgentRequest, "a", "b").is_inter_agent());
        assert!(inter(MessageType::InterAgentResponse, "b", "a").is_inter_agent());
        assert!(!inter(MessageType::FinalResponse, "a", "user").is_inter_agent());
        assert!(!inter(MessageType::User, "", "").is_inter_agent());
    }

    // ── Wire format ─────────────────────────────────────────────────

    #[test]
    fn type_serializes_snake_case() {
        let msg = inter(MessageType::InterAgentRequest, "a", "b");
        let v: Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["type"], "inter_agent_request");
    }

    #[test]
    fn all_four_kinds_roundtrip() {
        for (kind, wire) in [
            (MessageType::User, "\"user\""),
            (MessageType::InterAgentRequest, "\"inter_agent_request\""),
            (MessageType::InterAgentResponse, "\"inter_agent_response\""),
            (MessageType::FinalResponse, "\"final_response\""),
        ] {
            assert_eq!(serde_json::to_string(&kind).unwrap(), wire);
            let back: MessageType = serde_json::from_str(wire).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn channel_id_omitted_when_absent() {
        let msg = inter(MessageType::InterAgentRequest, "a", "b");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("channel_id"));
    }

    #[test]
    fn channel_id_present_when_set() {
        let mut msg = inter(MessageType::InterAgentRequest, "a", "b");
        msg.channel_id = Some("a<->b".into());
        let v: Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["channel_id"], "a<->b");
    }

    #[test]
    fn wire_format_fixture() {
        let raw = r#"{"id":"m1","type":"final_response","content":"hi","from":"person_a_scheduling_agent","to":"user","timestamp":1700000000000}"#;
        let msg: ChatMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.id.as_str(), "m1");
        assert_eq!(msg.message_type, MessageType::FinalResponse);
        assert_eq!(msg.content, "hi");
        assert_eq!(msg.from, "person_a_scheduling_agent");
        assert_eq!(msg.timestamp, 1_700_000_000_000);
        assert!(msg.channel_id.is_none());
    }

    // ── channel_id ──────────────────────────────────────────────────

    #[test]
    fn channel_id_is_direction_independent() {
        assert_eq!(channel_id("person_a", "person_b"), channel_id("person_b", "person_a"));
    }

    #[test]
    fn channel_id_sorted_pair() {
        assert_eq!(channel_id("person_b", "person_a"), "person_a<->person_b");
    }

    // ── group_into_channels ─────────────────────────────────────────

    #[test]
    fn groups_both_directions_together() {
        let messages = vec![
            inter(MessageType::InterAgentRequest, "person_a", "person_b"),
            inter(MessageType::InterAgentResponse, "person_b", "person_a"),
        ];
        let channels = group_into_channels(&messages);
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].messages.len(), 2);
        assert_eq!(channels[0].participants, ["person_a".to_string(), "person_b".to_string()]);
    }

    #[test]
    fn separate_pairs_get_separate_channels() {
        let messages = vec![
            inter(MessageType::InterAgentRequest, "person_a", "person_b"),
            inter(MessageType::InterAgentRequest, "person_a", "person_c"),
        ];
        let channels = group_into_channels(&messages);
        assert_eq!(channels.len(), 2);
    }

    #[test]
    fn final_responses_are_not_grouped() {
        let messages = vec![
            inter(MessageType::InterAgentRequest, "person_a", "person_b"),
            inter(MessageType::FinalResponse, "person_a", "user"),
        ];
        let channels = group_into_channels(&messages);
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].messages.len(), 1);
    }

    #[test]
    fn grouped_messages_carry_channel_id() {
        let messages = vec![inter(MessageType::InterAgentRequest, "person_a", "person_b")];
        let channels = group_into_channels(&messages);
        assert_eq!(
            channels[0].messages[0].channel_id.as_deref(),
            Some("person_a<->person_b")
        );
    }

    #[test]
    fn order_within_channel_follows_input() {
        let mut first = inter(MessageType::InterAgentRequest, "person_a", "person_b");
        first.content = "one".into();
        let mut second = inter(MessageType::InterAgentResponse, "person_b", "person_a");
        second.content = "two".into();
        let channels = group_into_channels(&[first, second]);
        assert_eq!(channels[0].messages[0].content, "one");
        assert_eq!(channels[0].messages[1].content, "two");
    }

    #[test]
    fn empty_input_yields_no_channels() {
        assert!(group_into_channels(&[]).is_empty());
    }
}
