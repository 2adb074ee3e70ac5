use std::fmt::Display;

use futures_util::{Stream, StreamExt};
use memchr::memchr;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{GenerateContentRequest, GenerateContentResponse, StreamPayload};
use crate::core::message::{MessageId, Source};
use crate::utils::url::stream_generate_url;

#[derive(Clone, Debug, PartialEq)]
pub enum StreamMessage {
    Chunk(String),
    Sources(Vec<Source>),
    Error(String),
    End,
}

/// Every event carries the id of the placeholder it belongs to.
pub type StreamEvent = (StreamMessage, MessageId);

type StreamSender = mpsc::UnboundedSender<StreamEvent>;

fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

fn sources_from(response: &GenerateContentResponse) -> Vec<Source> {
    response
        .web_sources()
        .filter_map(|web| {
            let uri = web.uri.as_deref()?.trim();
            if uri.is_empty() {
                return None;
            }
            let title = web
                .title
                .as_deref()
                .map(str::trim)
                .filter(|title| !title.is_empty())
                .unwrap_or(uri);
            Some(Source {
                title: title.to_string(),
                uri: uri.to_string(),
            })
        })
        .collect()
}

/// Returns true when the stream must stop.
fn handle_data_payload(payload: &str, tx: &StreamSender, stream_id: MessageId) -> bool {
    if payload.trim().is_empty() {
        return false;
    }

    match serde_json::from_str::<StreamPayload>(payload) {
        Ok(StreamPayload::Response(response)) => {
            let text = response.text();
            if !text.is_empty() {
                let _ = tx.send((StreamMessage::Chunk(text), stream_id));
            }
            let sources = sources_from(&response);
            if !sources.is_empty() {
                let _ = tx.send((StreamMessage::Sources(sources), stream_id));
            }
            match response.finish_reason() {
                Some("STOP") => debug!(stream = %stream_id, "model finished"),
                Some(reason) => warn!(stream = %stream_id, reason, "model stopped early"),
                None => {}
            }
            false
        }
        Ok(StreamPayload::Failure { .. }) | Err(_) => {
            let formatted_error = format_api_error(payload);
            let _ = tx.send((StreamMessage::Error(formatted_error), stream_id));
            let _ = tx.send((StreamMessage::End, stream_id));
            true
        }
    }
}

fn process_sse_line(line: &str, tx: &StreamSender, stream_id: MessageId) -> bool {
    extract_data_payload(line)
        .map(|payload| handle_data_payload(payload, tx, stream_id))
        .unwrap_or(false)
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        collapsed.trim().to_string()
    })
}

/// Render an error body for display: a one-line summary when one can be
/// found, followed by the payload in a fenced block.
pub fn format_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();

    if trimmed.is_empty() {
        return "API Error:\n```\n<empty>\n```".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Ok(pretty_json) = serde_json::to_string_pretty(&json_value) {
            if let Some(summary) = extract_error_summary(&json_value) {
                if !summary.is_empty() {
                    return format!("API Error: {}\n```json\n{}\n```", summary, pretty_json);
                }
            }
            return format!("API Error:\n```json\n{}\n```", pretty_json);
        }
    }

    if trimmed.starts_with('<') && trimmed.ends_with('>') {
        format!("API Error:\n```xml\n{}\n```", trimmed)
    } else {
        format!("API Error:\n```\n{}\n```", trimmed)
    }
}

/// First line of a formatted error, for one-line status displays.
pub fn error_headline(formatted: &str) -> &str {
    formatted.lines().next().unwrap_or(formatted).trim()
}

/// Consume a server-sent-events body line by line until it ends or fails.
///
/// Lines may be split across network chunks, so bytes are buffered until a
/// newline arrives. Every exit path sends exactly one `End`.
pub(crate) async fn pump_sse<S, B, E>(body: S, tx: &StreamSender, stream_id: MessageId)
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let mut body = std::pin::pin!(body);
    let mut buffer: Vec<u8> = Vec::new();

    while let Some(chunk) = body.next().await {
        let chunk_bytes = match chunk {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(stream = %stream_id, error = %e, "stream body failed");
                let formatted_error = format_api_error(&e.to_string());
                let _ = tx.send((StreamMessage::Error(formatted_error), stream_id));
                let _ = tx.send((StreamMessage::End, stream_id));
                return;
            }
        };
        buffer.extend_from_slice(chunk_bytes.as_ref());

        while let Some(newline_pos) = memchr(b'\n', &buffer) {
            let should_end = match std::str::from_utf8(&buffer[..newline_pos]) {
                Ok(line) => process_sse_line(line.trim(), tx, stream_id),
                Err(e) => {
                    warn!(stream = %stream_id, "invalid UTF-8 in stream: {e}");
                    false
                }
            };
            buffer.drain(..=newline_pos);
            if should_end {
                return;
            }
        }
    }

    // A final event may arrive without a trailing newline.
    if let Ok(line) = std::str::from_utf8(&buffer) {
        if process_sse_line(line.trim(), tx, stream_id) {
            return;
        }
    }

    let _ = tx.send((StreamMessage::End, stream_id));
}

pub struct StreamParams {
    pub client: reqwest::Client,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub request: GenerateContentRequest,
    pub stream_id: MessageId,
}

#[derive(Clone)]
pub struct ChatStreamService {
    tx: StreamSender,
}

impl ChatStreamService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<StreamEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Issue one streaming request on the runtime. Results arrive on the
    /// receiver returned by [`ChatStreamService::new`].
    pub fn spawn_stream(&self, params: StreamParams) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            run_stream(params, &tx).await;
        });
    }
}

async fn run_stream(params: StreamParams, tx: &StreamSender) {
    let StreamParams {
        client,
        base_url,
        api_key,
        model,
        request,
        stream_id,
    } = params;

    let url = stream_generate_url(&base_url, &model);
    debug!(
        stream = %stream_id,
        %model,
        turns = request.contents.len(),
        search = !request.tools.is_empty(),
        "starting stream"
    );

    let response = client
        .post(url)
        .header("Content-Type", "application/json")
        .header("x-goog-api-key", api_key)
        .json(&request)
        .send()
        .await;

    match response {
        Ok(response) => {
            let status = response.status();
            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<no body>".to_string());
                warn!(stream = %stream_id, %status, "request rejected");
                let formatted_error = format_api_error(&error_text);
                let _ = tx.send((StreamMessage::Error(formatted_error), stream_id));
                let _ = tx.send((StreamMessage::End, stream_id));
                return;
            }

            pump_sse(response.bytes_stream(), tx, stream_id).await;
            debug!(stream = %stream_id, "stream finished");
        }
        Err(e) => {
            warn!(stream = %stream_id, error = %e, "request failed");
            let formatted_error = format_api_error(&e.to_string());
            let _ = tx.send((StreamMessage::Error(formatted_error), stream_id));
            let _ = tx.send((StreamMessage::End, stream_id));
        }
    }
}
