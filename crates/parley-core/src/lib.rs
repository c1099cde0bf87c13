//! # parley-core
//!
//! Foundation types for the parley chat gateway.
//!
//! This crate provides the shared vocabulary the other parley crates depend on:
//!
//! - **Branded IDs**: [`MessageId`] and [`RequestId`] as uuid-v7 newtypes
//! - **Chat vocabulary**: [`MessageType`] and [`ChatMessage`], the unit the
//!   gateway emits to clients
//! - **Channels**: unordered agent-pair [`Channel`] grouping for stream
//!   consumers

#![deny(unsafe_code)]

pub mod chat;
pub mod ids;

pub use chat::{Channel, ChatMessage, MessageType};
pub use ids::{MessageId, RequestId};
