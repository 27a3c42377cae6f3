use anyhow::{Result, anyhow};
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::Client;
use serde::Serialize;

use crate::state::{ChatMessage, OutgoingMessage};

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    history: &'a [ChatMessage],
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Post one chat turn and hand back the streamed reply body.
    ///
    /// A non-2xx status is an error; the body is only read on success.
    pub async fn send(&self, outgoing: &OutgoingMessage) -> Result<ReplyStream> {
        let url = format!("{}/chat", self.base_url);

        let request = ChatRequest {
            message: &outgoing.message,
            history: &outgoing.history,
        };

        tracing::info!(history = outgoing.history.len(), "sending chat message");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&outgoing.token)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Chat request failed with status {}: {}", status, text));
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .boxed();

        Ok(ReplyStream::new(body))
    }
}

/// Streamed assistant reply, yielded as decoded text chunks
pub struct ReplyStream {
    body: BoxStream<'static, reqwest::Result<Vec<u8>>>,
    decoder: Utf8Decoder,
    done: bool,
}

impl ReplyStream {
    fn new(body: BoxStream<'static, reqwest::Result<Vec<u8>>>) -> Self {
        Self {
            body,
            decoder: Utf8Decoder::default(),
            done: false,
        }
    }

    /// Next non-empty chunk of text, `None` once the body is exhausted
    pub async fn next_chunk(&mut self) -> Option<Result<String>> {
        while !self.done {
            match self.body.next().await {
                Some(Ok(bytes)) => {
                    let text = self.decoder.decode(&bytes);
                    if !text.is_empty() {
                        return Some(Ok(text));
                    }
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.done = true;
                    let rest = self.decoder.finish();
                    if !rest.is_empty() {
                        return Some(Ok(rest));
                    }
                }
            }
        }
        None
    }

    /// Drain the whole reply into one string
    pub async fn collect_text(mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(chunk) = self.next_chunk().await {
            text.push_str(&chunk?);
        }
        Ok(text)
    }
}

/// Incremental UTF-8 decoder for a chunked byte stream.
///
/// A character split across two chunks is held back until the rest of it
/// arrives. Invalid sequences become U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::new();

        loop {
            let err = match std::str::from_utf8(&self.pending) {
                Ok(s) => {
                    out.push_str(s);
                    self.pending.clear();
                    break;
                }
                Err(e) => e,
            };

            let valid = err.valid_up_to();
            out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));

            match err.error_len() {
                // Incomplete sequence at the end: wait for more bytes
                None => {
                    self.pending.drain(..valid);
                    break;
                }
                Some(len) => {
                    out.push(char::REPLACEMENT_CHARACTER);
                    self.pending.drain(..valid + len);
                }
            }
        }

        out
    }

    /// Flush whatever is left once the stream has ended
    pub fn finish(&mut self) -> String {
        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        rest
    }
}
