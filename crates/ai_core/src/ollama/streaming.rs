//! NDJSON stream decoding for `/api/generate`
//!
//! The body arrives in arbitrary byte chunks; lines are reassembled before
//! parsing so a JSON object split across reads is still decoded.

use std::time::Duration;

use bytes::{Buf, Bytes, BytesMut};
use futures::{Stream, StreamExt};
use reqwest::Response;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::{error::EngineError, ports::ChunkStream};

/// One line of a streaming `/api/generate` body
#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Decoded content of a single line
#[derive(Debug, PartialEq)]
enum ParsedLine {
    Text(String),
    /// Final line; may still carry a last fragment
    Done(String),
    Failed(String),
}

/// Create a chunk stream from a streaming HTTP response
pub fn create_stream(response: Response, timeout: Duration) -> ChunkStream {
    Box::pin(parse_ndjson(response.bytes_stream(), timeout))
}

/// Decode one line; blank or malformed lines yield `None`
fn parse_line(line: &[u8]) -> Option<ParsedLine> {
    let text = match std::str::from_utf8(line) {
        Ok(t) => t.trim(),
        Err(e) => {
            trace!(error = %e, "Skipping non UTF-8 line");
            return None;
        },
    };
    if text.is_empty() {
        return None;
    }

    let chunk: GenerateChunk = match serde_json::from_str(text) {
        Ok(c) => c,
        Err(e) => {
            trace!(line = %text, error = %e, "Skipping malformed line");
            return None;
        },
    };

    if let Some(error) = chunk.error {
        Some(ParsedLine::Failed(error))
    } else if chunk.done {
        Some(ParsedLine::Done(chunk.response))
    } else {
        Some(ParsedLine::Text(chunk.response))
    }
}

/// Reassemble lines from `bytes` and turn them into text chunks
///
/// Ends after a `done` line, an `error` line, or a transport failure.
/// Empty `response` fragments are not forwarded; text on the `done` line is.
fn parse_ndjson<S>(
    bytes: S,
    timeout: Duration,
) -> impl Stream<Item = Result<String, EngineError>> + Send
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    async_stream::stream! {
        let mut bytes = Box::pin(bytes);
        let mut buffer = BytesMut::new();

        while let Some(next) = bytes.next().await {
            let chunk = match next {
                Ok(chunk) => chunk,
                Err(e) => {
                    debug!(error = %e, "Stream transport failed");
                    yield Err(EngineError::from_transport(&e, timeout));
                    return;
                },
            };
            buffer.extend_from_slice(&chunk);

            while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                let line = buffer.split_to(pos);
                buffer.advance(1);
                match parse_line(&line) {
                    Some(ParsedLine::Text(text)) if !text.is_empty() => yield Ok(text),
                    Some(ParsedLine::Done(text)) => {
                        if !text.is_empty() {
                            yield Ok(text);
                        }
                        return;
                    },
                    Some(ParsedLine::Failed(error)) => {
                        yield Err(EngineError::StreamError(error));
                        return;
                    },
                    _ => {},
                }
            }
        }

        match parse_line(&buffer) {
            Some(ParsedLine::Text(text) | ParsedLine::Done(text)) if !text.is_empty() => {
                yield Ok(text);
            },
            Some(ParsedLine::Failed(error)) => yield Err(EngineError::StreamError(error)),
            _ => {},
        }
    }
}
