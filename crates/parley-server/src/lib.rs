//! # parley-server
//!
//! Axum HTTP server for the parley chat gateway.
//!
//! - `POST /api/chat`: one human message in, a translated SSE stream of
//!   chat messages out, always terminated by the `[DONE]` sentinel
//! - `GET /health`: liveness probe
//! - Graceful shutdown via `tokio_util::sync::CancellationToken`
//! - Immutable process-wide configuration injected at startup

#![deny(unsafe_code)]

pub mod chat;
pub mod config;
pub mod health;
pub mod server;
pub mod shutdown;
