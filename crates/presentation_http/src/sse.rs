//! Server-sent events wire format
//!
//! Each event is written as
//!
//! ```text
//! event: <kind>
//! data: <line 1>
//! data: <line 2>
//!
//! ```
//!
//! Every line of the payload gets its own `data: ` prefix; an empty payload
//! still produces one empty `data: ` line.

use bytes::Bytes;
use domain::StreamEvent;

/// Content type of an event stream response
pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream";

/// Encode one protocol event
pub fn encode(event: &StreamEvent) -> Bytes {
    encode_frame(event.kind().as_str(), &event.payload().render())
}

/// Encode a raw event name and payload
pub fn encode_frame(event: &str, data: &str) -> Bytes {
    let mut out = String::with_capacity(event.len() + data.len() + 16);
    out.push_str("event: ");
    out.push_str(event);
    out.push('\n');
    for line in split_lines(data) {
        out.push_str("data: ");
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    Bytes::from(out)
}

/// Split on `\r\n`, `\r` or `\n`
///
/// Always returns at least one element; a trailing break yields a trailing
/// empty line so the payload survives a round trip.
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            },
            b'\r' => {
                lines.push(&text[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            },
            _ => i += 1,
        }
    }
    lines.push(&text[start..]);
    lines
}

/// A decoded event frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: String,
    /// `data` lines joined with `\n`
    pub data: String,
}

/// Decode a complete event stream body into frames
///
/// Understands the subset of the format that [`encode_frame`] writes.
/// Comment lines and unknown fields are ignored.
pub fn parse_frames(body: &str) -> Vec<SseFrame> {
    let mut frames = Vec::new();
    let mut event: Option<String> = None;
    let mut data: Vec<&str> = Vec::new();

    for line in body.split('\n') {
        if line.is_empty() {
            if event.is_some() || !data.is_empty() {
                frames.push(SseFrame {
                    event: event.take().unwrap_or_else(|| "message".to_string()),
                    data: data.join("\n"),
                });
                data.clear();
            }
        } else if let Some(value) = field_value(line, "event") {
            event = Some(value.to_string());
        } else if let Some(value) = field_value(line, "data") {
            data.push(value);
        }
    }

    frames
}

/// Value of `name: value` or `name:value`
fn field_value<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(name)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

#[cfg(test)]
mod tests {
    use domain::{StreamMeta, TraceId};
    use proptest::prelude::*;

    use super::*;

    fn text(bytes: &Bytes) -> &str {
        std::str::from_utf8(bytes).unwrap()
    }

    #[test]
    fn encodes_single_line_payload() {
        let bytes = encode(&StreamEvent::Token("Hi".to_string()));
        assert_eq!(text(&bytes), "event: token\ndata: Hi\n\n");
    }

    #[test]
    fn prefixes_every_line_of_multiline_payload() {
        let bytes = encode(&StreamEvent::Token("a\nb\r\nc\rd".to_string()));
        assert_eq!(
            text(&bytes),
            "event: token\ndata: a\ndata: b\ndata: c\ndata: d\n\n"
        );
    }

    #[test]
    fn empty_payload_emits_one_empty_data_line() {
        let bytes = encode_frame("token", "");
        assert_eq!(text(&bytes), "event: token\ndata: \n\n");
    }

    #[test]
    fn trailing_newline_keeps_empty_last_line() {
        assert_eq!(split_lines("x\n"), vec!["x", ""]);
        assert_eq!(split_lines("\r\n\r\n"), vec!["", "", ""]);
    }

    #[test]
    fn done_event_carries_sentinel() {
        let bytes = encode(&StreamEvent::Done);
        assert_eq!(text(&bytes), "event: done\ndata: [DONE]\n\n");
    }

    #[test]
    fn json_payload_keeps_non_ascii() {
        let event = StreamEvent::Meta(StreamMeta {
            trace_id: TraceId::parse("t-1").unwrap(),
            provider: "mock".to_string(),
        });
        let frames = parse_frames(text(&encode(&event)));
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "meta");
        let value: serde_json::Value = serde_json::from_str(&frames[0].data).unwrap();
        assert_eq!(value["trace_id"], "t-1");

        let token = encode(&StreamEvent::Token("héllo 世界".to_string()));
        assert_eq!(text(&token), "event: token\ndata: héllo 世界\n\n");
    }

    #[test]
    fn parses_consecutive_frames() {
        let body = "event: meta\ndata: {}\n\nevent: token\ndata: a\ndata: b\n\nevent: done\ndata:[DONE]\n\n";
        let frames = parse_frames(body);
        assert_eq!(
            frames,
            vec![
                SseFrame {
                    event: "meta".into(),
                    data: "{}".into()
                },
                SseFrame {
                    event: "token".into(),
                    data: "a\nb".into()
                },
                SseFrame {
                    event: "done".into(),
                    data: "[DONE]".into()
                },
            ]
        );
    }

    #[test]
    fn ignores_comments_and_incomplete_tail() {
        let frames = parse_frames(": keep-alive\n\nevent: token\ndata: x\n\nevent: token\ndata: y");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "x");
    }

    proptest! {
        #[test]
        fn token_round_trip_recovers_payload(payload in "[a-zA-Z0-9 \n{}\":,.é世]{0,64}") {
            let bytes = encode(&StreamEvent::Token(payload.clone()));
            let frames = parse_frames(text(&bytes));
            prop_assert_eq!(frames.len(), 1);
            prop_assert_eq!(frames[0].event.as_str(), "token");
            prop_assert_eq!(&frames[0].data, &payload);
        }

        #[test]
        fn every_payload_line_is_prefixed(payload in "[a-z\r\n]{0,32}") {
            let bytes = encode_frame("token", &payload);
            let encoded = text(&bytes);
            let body = encoded
                .strip_prefix("event: token\n")
                .and_then(|rest| rest.strip_suffix("\n\n"))
                .unwrap();
            for line in body.split('\n') {
                prop_assert!(line.starts_with("data: "));
            }
            prop_assert_eq!(body.split('\n').count(), split_lines(&payload).len());
        }
    }
}
