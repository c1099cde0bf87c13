//! Byte-buffered SSE frame-line parser for the upstream stream.
//!
//! The upstream gateway frames events as `data: <json>` lines, but network
//! chunks cut the byte stream at arbitrary offsets. This parser:
//! - buffers raw bytes and splits on newlines, so a line straddling two
//!   chunks is reconstructed intact before processing
//! - never converts partial bytes to text — a multi-byte UTF-8 character
//!   split across chunks is whole again before any `&str` conversion
//!   (newline bytes cannot occur inside a multi-byte sequence)
//! - extracts the `data:` payload, skipping comments, other SSE fields,
//!   empty payloads, and `[DONE]` markers
//! - stops quietly on an upstream read error; a decode problem never
//!   terminates the session

use bytes::{Bytes, BytesMut};
use futures::Stream;
use tokio_stream::StreamExt;
use tracing::warn;

/// Fixed marker prefixing every event frame line.
pub const FRAME_MARKER: &str = "data:";

/// Terminal sentinel payload, both on this parser's input (skipped) and on
/// the gateway's client-facing output (appended exactly once per session).
pub const STREAM_DONE: &str = "[DONE]";

/// Options for the frame-line parser.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameParserOptions {
    /// Whether a trailing line left unterminated at end-of-stream is still
    /// processed. The chat pipeline leaves this off: frames end with a
    /// newline, and an unterminated fragment is dropped.
    pub process_trailing_line: bool,
}

/// Parse frame lines from a byte stream and yield payload strings.
///
/// Implemented as an async generator over the chunk stream:
/// 1. Buffer incoming bytes
/// 2. Split on `\n` (tolerating `\r\n`); keep the unterminated tail buffered
/// 3. Extract the [`FRAME_MARKER`] payload from completed lines
/// 4. Skip comments, non-data fields, empty payloads, and [`STREAM_DONE`]
///
/// The returned payloads are raw JSON strings for the translator to decode.
pub fn parse_frame_lines<S, E>(
    byte_stream: S,
    options: FrameParserOptions,
) -> impl Stream<Item = String> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + Unpin + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let process_trailing = options.process_trailing_line;

    futures::stream::unfold(
        (byte_stream, BytesMut::with_capacity(8192), false),
        move |(mut stream, mut buffer, done)| async move {
            if done {
                return None;
            }

            loop {
                // A completed line is everything up to the next \n
                if let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                    let mut line_bytes = buffer.split_to(newline_pos + 1);
                    // Drop the terminator, tolerating \r\n
                    line_bytes.truncate(line_bytes.len() - 1);
                    if line_bytes.last() == Some(&b'\r') {
                        line_bytes.truncate(line_bytes.len() - 1);
                    }

                    let Ok(line) = std::str::from_utf8(&line_bytes) else {
                        continue; // skip invalid UTF-8 lines
                    };

                    if let Some(payload) = extract_frame_payload(line) {
                        return Some((payload, (stream, buffer, false)));
                    }
                    continue;
                }

                // No full line buffered; pull more raw bytes before any text
                // conversion
                match stream.next().await {
                    Some(Ok(chunk)) => {
                        buffer.extend_from_slice(&chunk);
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "upstream read failed, ending frame stream");
                        return None;
                    }
                    None => {
                        // Stream ended — flush the unterminated tail if asked
                        if process_trailing && !buffer.is_empty() {
                            let Ok(line) = std::str::from_utf8(&buffer) else {
                                return None;
                            };
                            if let Some(payload) = extract_frame_payload(line.trim()) {
                                buffer.clear();
                                return Some((payload, (stream, buffer, true)));
                            }
                        }
                        return None;
                    }
                }
            }
        },
    )
}

/// Extract the payload from one frame line.
///
/// Returns `None` for comments, empty lines, lines without the marker,
/// empty payloads, and [`STREAM_DONE`] markers.
fn extract_frame_payload(line: &str) -> Option<String> {
    let trimmed = line.trim();

    // Skip empty lines and comments
    if trimmed.is_empty() || trimmed.starts_with(':') {
        return None;
    }

    let payload = trimmed.strip_prefix(FRAME_MARKER)?.trim();

    if payload.is_empty() || payload == STREAM_DONE {
        return None;
    }

    Some(payload.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
