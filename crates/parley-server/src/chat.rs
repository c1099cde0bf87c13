//! `POST /api/chat` — ingress, upstream dispatch, stream translation, SSE
//! egress.
//!
//! The handler is the whole per-request pipeline: parse the inbound body,
//! dispatch one `message/stream` call, translate the live byte stream, and
//! re-emit each chat message as one SSE frame. The `[DONE]` sentinel is
//! chained after the translated stream, so it goes out exactly once whether
//! the upstream ended cleanly, failed mid-stream, or produced only garbage.
//! Dropping the response body (client disconnect) drops the translated
//! stream and the upstream connection with it.

use std::convert::Infallible;

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use parley_a2a::GatewayError;
use parley_a2a::sse::STREAM_DONE;
use parley_a2a::translate::translate_frames;

use crate::server::AppState;

/// Inbound chat request body.
///
/// The message text is not validated beyond JSON shape; a body that does not
/// parse gets axum's default rejection.
#[derive(Clone, Debug, Deserialize)]
pub struct ChatRequest {
    /// The human's message.
    pub message: String,
}

/// A gateway failure surfaced as a single 502 before any streaming begins.
#[derive(Debug)]
pub struct GatewayRejection(GatewayError);

impl From<GatewayError> for GatewayRejection {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for GatewayRejection {
    fn into_response(self) -> Response {
        warn!(error = %self.0, "upstream dispatch failed");
        (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

/// `POST /api/chat`.
///
/// One upstream connection, one translation session, one outbound stream.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, GatewayRejection> {
    info!(chars = request.message.len(), "chat request received");

    let bytes = state.gateway.stream_message(&request.message).await?;

    let events = translate_frames(bytes, state.translate.clone())
        .filter_map(|message| async move { Event::default().json_data(&message).ok() })
        .chain(stream::once(async {
            Event::default().data(STREAM_DONE)
        }))
        .map(Ok::<_, Infallible>);

    Ok((
        [(header::CACHE_CONTROL, "no-cache")],
        Sse::new(events),
    ))
}
