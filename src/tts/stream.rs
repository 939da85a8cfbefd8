//! Streaming decoder for the `:stream` endpoint (Bytes -> audio chunks).
//!
//! The endpoint answers with newline-delimited JSON. Each line is an envelope
//! carrying one base64 audio chunk, so every line is decoded on its own and
//! yielded in arrival order.

use super::audio::decode_audio_content;
use crate::{BoxStream, Error, ErrorContext, Result};
use bytes::Bytes;
use futures::{stream, StreamExt};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamEnvelope {
    result: Option<ChunkPayload>,
    error: Option<StreamFault>,
    // Some deployments send the chunk unwrapped.
    audio_content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChunkPayload {
    audio_content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamFault {
    code: Option<i64>,
    message: Option<String>,
}

fn decode_line(line: &[u8]) -> Result<Option<Bytes>> {
    let text = std::str::from_utf8(line).map_err(|e| {
        Error::protocol_with_context(
            format!("stream chunk is not UTF-8: {}", e),
            ErrorContext::new().with_source("stream_decoder"),
        )
    })?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let envelope: StreamEnvelope = serde_json::from_str(trimmed).map_err(|e| {
        Error::protocol_with_context(
            format!("malformed stream chunk: {}", e),
            ErrorContext::new().with_source("stream_decoder"),
        )
    })?;

    if let Some(fault) = envelope.error {
        let mut context = ErrorContext::new().with_source("stream_decoder");
        if let Some(code) = fault.code {
            context = context.with_details(format!("code {}", code));
        }
        return Err(Error::protocol_with_context(
            fault
                .message
                .unwrap_or_else(|| "stream reported an error".to_string()),
            context,
        ));
    }

    let encoded = envelope
        .result
        .and_then(|r| r.audio_content)
        .or(envelope.audio_content);
    match encoded {
        // Envelopes without audio (e.g. timestamp-only frames) are skipped.
        None => Ok(None),
        Some(encoded) if encoded.is_empty() => Ok(None),
        Some(encoded) => decode_audio_content(&encoded, "stream_decoder")
            .map(|audio| Some(Bytes::from(audio))),
    }
}

struct DecodeState {
    input: BoxStream<'static, Bytes>,
    buf: Vec<u8>,
    done: bool,
}

/// Decode a raw NDJSON byte stream into audio chunks.
///
/// The first error (transport, malformed line or error envelope) is yielded
/// and ends the stream.
pub(crate) fn decode_audio_stream(input: BoxStream<'static, Bytes>) -> BoxStream<'static, Bytes> {
    let state = DecodeState {
        input,
        buf: Vec::new(),
        done: false,
    };

    let stream = stream::unfold(state, |mut state| async move {
        loop {
            if state.done {
                return None;
            }

            // Emit complete lines from the buffer first.
            if let Some(pos) = state.buf.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = state.buf.drain(..=pos).collect();
                match decode_line(&line) {
                    Ok(Some(chunk)) => return Some((Ok(chunk), state)),
                    Ok(None) => continue,
                    Err(e) => {
                        state.done = true;
                        return Some((Err(e), state));
                    }
                }
            }

            match state.input.next().await {
                Some(Ok(bytes)) => state.buf.extend_from_slice(&bytes),
                Some(Err(e)) => {
                    state.done = true;
                    return Some((Err(e), state));
                }
                None => {
                    // Trailing line without a newline terminator.
                    state.done = true;
                    let rest = std::mem::take(&mut state.buf);
                    match decode_line(&rest) {
                        Ok(Some(chunk)) => return Some((Ok(chunk), state)),
                        Ok(None) => return None,
                        Err(e) => return Some((Err(e), state)),
                    }
                }
            }
        }
    });

    Box::pin(stream)
}
