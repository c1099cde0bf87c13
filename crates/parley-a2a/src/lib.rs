//! # parley-a2a
//!
//! Upstream protocol plumbing for the parley chat gateway.
//!
//! - JSON-RPC `message/stream` request envelope and the defensive decode of
//!   the nested response schema
//! - Byte-buffered SSE frame-line parser (frame boundaries never align with
//!   network chunk boundaries)
//! - Frame translation: agent-pair annotation parsing, message-kind
//!   classification, and the chat-message stream adapter
//! - Dispatching client with the gateway failure taxonomy

#![deny(unsafe_code)]

pub mod client;
pub mod envelope;
pub mod sse;
pub mod translate;

pub use client::{AgentGateway, GatewayError, GatewayResult};
pub use translate::{TranslateOptions, translate_frames};
