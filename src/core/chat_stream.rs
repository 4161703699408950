use futures_util::StreamExt;
use memchr::memchr;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{ChatRequest, StreamEvent};
use crate::core::config::MultiChatConfig;
use crate::utils::url::construct_api_url;

/// Path the server exposes the multi-chat completion endpoint on.
pub const DEFAULT_ENDPOINT_PATH: &str = "/api/multi-chat";

/// Default reasoning token budget forwarded with each request.
pub const DEFAULT_BUDGET_TOKENS: u32 = 2000;

/// Event line prefix. Lines without it are ignored, not errors.
const DATA_PREFIX: &str = "data: ";

/// Receives decoded stream events for one `send_message` call.
///
/// All methods default to no-ops so callers implement only what they
/// consume. Events arrive in exact line order; after `on_error` or
/// `on_complete` no further calls are made.
pub trait StreamHandler {
    fn on_chunk(&mut self, event: StreamEvent) {
        let _ = event;
    }

    fn on_error(&mut self, message: &str) {
        let _ = message;
    }

    fn on_complete(&mut self) {}
}

/// One dispatched event, as forwarded by [`ChannelHandler`].
#[derive(Clone, Debug, PartialEq)]
pub enum StreamMessage {
    Chunk(StreamEvent),
    Error(String),
    Complete,
}

/// Forwards every dispatched event into an unbounded channel, for callers
/// that drain stream output from a select loop instead of callbacks.
#[derive(Clone)]
pub struct ChannelHandler {
    tx: mpsc::UnboundedSender<StreamMessage>,
}

impl ChannelHandler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<StreamMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl StreamHandler for ChannelHandler {
    fn on_chunk(&mut self, event: StreamEvent) {
        let _ = self.tx.send(StreamMessage::Chunk(event));
    }

    fn on_error(&mut self, message: &str) {
        let _ = self.tx.send(StreamMessage::Error(message.to_string()));
    }

    fn on_complete(&mut self) {
        let _ = self.tx.send(StreamMessage::Complete);
    }
}

/// Per-call request options. Defaults mirror the server's: no system
/// prompt, extended thinking off, a 2000-token reasoning budget, no
/// prefill.
#[derive(Debug, Clone)]
pub struct SendOptions {
    pub system_prompt: String,
    pub extended_thinking: bool,
    pub budget_tokens: u32,
    pub prefill_content: String,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            system_prompt: String::new(),
            extended_thinking: false,
            budget_tokens: DEFAULT_BUDGET_TOKENS,
            prefill_content: String::new(),
        }
    }
}

/// Reassembles newline-delimited records from arbitrarily split byte
/// reads. A trailing fragment (including a partial multi-byte character)
/// stays buffered until its line completes.
#[derive(Default)]
struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    fn new() -> Self {
        Self::default()
    }

    fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Pop the next complete line, without its newline.
    fn next_line(&mut self) -> Option<Vec<u8>> {
        let newline_pos = memchr(b'\n', &self.buf)?;
        let line = self.buf[..newline_pos].to_vec();
        self.buf.drain(..=newline_pos);
        Some(line)
    }
}

/// Decode one complete line and dispatch it. Returns true when the event
/// was terminal and consumption must stop.
fn process_stream_line(line: &[u8], handler: &mut dyn StreamHandler) -> bool {
    let text = match std::str::from_utf8(line) {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "skipping stream line with invalid UTF-8");
            return false;
        }
    };

    let Some(payload) = text.strip_prefix(DATA_PREFIX) else {
        return false;
    };

    match serde_json::from_str::<StreamEvent>(payload) {
        Ok(event @ StreamEvent::Chunk { .. }) => {
            handler.on_chunk(event);
            false
        }
        Ok(StreamEvent::Error { message }) => {
            handler.on_error(&message);
            true
        }
        Ok(StreamEvent::Complete) => {
            handler.on_complete();
            true
        }
        Ok(StreamEvent::Delay { delay }) => {
            debug!(delay_ms = delay, "ignoring delay hint");
            false
        }
        Ok(StreamEvent::Unknown) => {
            debug!(line = payload, "ignoring unrecognized event kind");
            false
        }
        Err(err) => {
            // One bad line never aborts the stream.
            warn!(error = %err, line = payload, "skipping malformed event line");
            false
        }
    }
}

/// Thin client for the multi-chat completion endpoint.
///
/// Holds only the endpoint URL and a connection pool, so one instance is
/// safe to share across concurrent `send_message` calls. No retry, no
/// cancellation, and no timeout are applied at this layer; a hung
/// connection hangs the call.
#[derive(Clone)]
pub struct MultiChatClient {
    endpoint: String,
    http: reqwest::Client,
}

impl MultiChatClient {
    /// Client posting to an explicit endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    /// Client posting to [`DEFAULT_ENDPOINT_PATH`] under a server base URL.
    pub fn for_base_url(base_url: &str) -> Self {
        Self::new(construct_api_url(base_url, DEFAULT_ENDPOINT_PATH))
    }

    /// Client reusing an existing `reqwest::Client` pool.
    pub fn with_client(endpoint: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post the conversation and consume the event stream.
    ///
    /// Issues exactly one POST carrying `messages` (passed through
    /// verbatim), the configuration's participants, and `options`, then
    /// decodes the response incrementally and dispatches each event to
    /// `handler` in arrival order. Every failure mode is reported once
    /// through [`StreamHandler::on_error`]; this method never returns an
    /// error and never panics. A terminal `complete` or `error` event stops
    /// reading immediately; a stream that ends without either resolves with
    /// no terminal callback.
    pub async fn send_message(
        &self,
        messages: Vec<Value>,
        config: &MultiChatConfig,
        options: SendOptions,
        handler: &mut dyn StreamHandler,
    ) {
        let request = ChatRequest {
            messages,
            participants: config.participants.clone(),
            system_prompt: options.system_prompt,
            extended_thinking: options.extended_thinking,
            budget_tokens: options.budget_tokens,
            prefill_content: options.prefill_content,
        };

        let response = match self
            .http
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                handler.on_error(&format!("request failed: {err}"));
                return;
            }
        };

        if !response.status().is_success() {
            handler.on_error(&format!(
                "API request failed: {}",
                response.status().as_u16()
            ));
            return;
        }

        let mut stream = response.bytes_stream();
        let mut buffer = LineBuffer::new();

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(bytes) => bytes,
                Err(err) => {
                    handler.on_error(&format!("error reading response stream: {err}"));
                    return;
                }
            };

            buffer.extend(&bytes);
            while let Some(line) = buffer.next_line() {
                if process_stream_line(&line, handler) {
                    // Terminal event: stop before any queued bytes.
                    return;
                }
            }
        }

        // Stream ended without a terminal event. Preserved behavior: resolve
        // without invoking any terminal callback.
    }
}
