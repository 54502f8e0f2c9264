//! OllamaApiAgent - REST implementation for a local Ollama server.
//!
//! Calls `POST {base_url}/api/chat`. Streaming responses arrive as
//! newline-delimited JSON objects, one per content chunk.

use async_trait::async_trait;
use futures::future::ready;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use lookout_core::session::ConversationMessage;
use lookout_core::{LookoutError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::backend::{ChatBackend, ChunkStream};

const CHAT_PATH: &str = "/api/chat";

/// Agent implementation that talks to the Ollama HTTP API.
#[derive(Clone)]
pub struct OllamaApiAgent {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OllamaApiAgent {
    /// Creates a new agent for `model` served at `base_url`.
    ///
    /// Requests carry no timeout; a stalled model call stalls its caller.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            temperature: 0.0,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{CHAT_PATH}", self.base_url.trim_end_matches('/'))
    }

    fn request<'a>(&'a self, messages: &'a [ConversationMessage], stream: bool) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages,
            stream,
            options: ChatOptions {
                temperature: self.temperature,
            },
        }
    }

    async fn send_request(&self, body: &ChatRequest<'_>) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(self.endpoint())
            .json(body)
            .send()
            .await
            .map_err(|err| LookoutError::http(format!("Ollama request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Ollama error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatBackend for OllamaApiAgent {
    async fn chat(&self, messages: &[ConversationMessage]) -> Result<String> {
        let response = self.send_request(&self.request(messages, false)).await?;
        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| LookoutError::model(format!("Failed to parse Ollama response: {err}")))?;
        parsed.into_content()
    }

    async fn chat_stream(&self, messages: &[ConversationMessage]) -> Result<ChunkStream> {
        let response = self.send_request(&self.request(messages, true)).await?;

        Ok(decode_chunks(response.bytes_stream()).boxed())
    }
}

/// Turns a raw NDJSON byte stream into non-empty content chunks.
///
/// A final line without a trailing newline is still parsed once the bytes end.
fn decode_chunks<S, B, E>(bytes: S) -> impl Stream<Item = Result<String>>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    bytes
        .map(Some)
        .chain(stream::once(ready(None)))
        .scan(LineDecoder::default(), |decoder, item| {
            let lines = match item {
                Some(Ok(bytes)) => decoder.push(bytes.as_ref()),
                Some(Err(err)) => {
                    let err = LookoutError::http(format!("Ollama stream interrupted: {err}"));
                    return ready(Some(stream::iter(vec![Err(err)])));
                }
                None => decoder.finish().into_iter().collect(),
            };
            let items: Vec<Result<String>> = lines
                .iter()
                .filter_map(|line| parse_stream_line(line).transpose())
                .collect();
            ready(Some(stream::iter(items)))
        })
        .flatten()
        .try_filter(|chunk| ready(!chunk.is_empty()))
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ConversationMessage],
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ResponseMessage>,
    #[serde(default)]
    error: Option<String>,
}

impl ChatResponse {
    fn into_content(self) -> Result<String> {
        if let Some(error) = self.error {
            return Err(LookoutError::model(error));
        }
        self.message
            .map(|message| message.content)
            .ok_or_else(|| LookoutError::model("Ollama returned no message in the response"))
    }
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

/// Splits a byte stream into complete lines.
///
/// Bytes are buffered until a newline arrives so multi-byte characters split
/// across network chunks decode correctly.
#[derive(Debug, Default)]
struct LineDecoder {
    buffer: Vec<u8>,
}

impl LineDecoder {
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|byte| *byte == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line).trim().to_string();
            if !text.is_empty() {
                lines.push(text);
            }
        }
        lines
    }

    /// Returns whatever is left after the last newline.
    fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        let text = String::from_utf8_lossy(&rest).trim().to_string();
        (!text.is_empty()).then_some(text)
    }
}

/// Parses one NDJSON line into its content chunk, if any.
fn parse_stream_line(line: &str) -> Result<Option<String>> {
    let parsed: ChatResponse = serde_json::from_str(line)?;
    if let Some(error) = parsed.error {
        return Err(LookoutError::model(error));
    }
    Ok(parsed.message.map(|message| message.content))
}

fn map_http_error(status: StatusCode, body: String) -> LookoutError {
    let message = serde_json::from_str::<ChatResponse>(&body)
        .ok()
        .and_then(|wrapper| wrapper.error)
        .unwrap_or(body);
    LookoutError::http_status(status.as_u16(), message)
}
