//! UI-agnostic session state
//!
//! The chat session owns the message history, the busy flag, the open/closed
//! chat overlay, the selected product image and the identity token. Every
//! change goes through one of the transition methods below so the UI layer
//! never mutates the message list directly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First assistant turn shown when the chat opens on an empty history
pub const WELCOME_MESSAGE: &str =
    "Welcome to GenAI Sports! I'm Finn, your AI Sport Shopping Assistant. How can I help you today?";

/// Assistant turn appended when a chat request fails
pub const APOLOGY_MESSAGE: &str = "I'm sorry, I encountered an error. Please try again.";

/// A chat message in the shopping conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Why a message could not be sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("Please sign in with Google first!")]
    NotSignedIn,
    #[error("a reply is still streaming")]
    Busy,
    #[error("message is empty")]
    Empty,
}

/// Everything the backend needs for one chat turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub token: String,
    pub message: String,
    /// Conversation as it stood before `message` was added
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    busy: bool,
    chat_open: bool,
    selected_image: Option<String>,
    id_token: Option<String>,
    // Set once the first chunk of the in-flight reply has been appended
    streaming_reply: bool,
}

impl ChatSession {
    pub fn new(id_token: Option<String>) -> Self {
        Self {
            id_token,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_chat_open(&self) -> bool {
        self.chat_open
    }

    pub fn selected_image(&self) -> Option<&str> {
        self.selected_image.as_deref()
    }

    pub fn id_token(&self) -> Option<&str> {
        self.id_token.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.id_token.is_some()
    }

    /// Open the chat overlay, seeding the welcome message on first use
    pub fn open_chat(&mut self) {
        self.chat_open = true;
        if self.messages.is_empty() {
            self.messages.push(ChatMessage::assistant(WELCOME_MESSAGE));
        }
    }

    pub fn close_chat(&mut self) {
        self.chat_open = false;
        self.selected_image = None;
    }

    pub fn sign_in(&mut self, token: impl Into<String>) {
        self.id_token = Some(token.into());
    }

    pub fn sign_out(&mut self) {
        self.id_token = None;
    }

    /// Validate and record a user message, returning the request to send.
    ///
    /// On success the session is busy until [`finish_reply`](Self::finish_reply)
    /// or [`fail_reply`](Self::fail_reply) is called.
    pub fn begin_send(&mut self, input: &str) -> Result<OutgoingMessage, SendError> {
        let message = input.trim();
        if message.is_empty() {
            return Err(SendError::Empty);
        }
        if self.busy {
            return Err(SendError::Busy);
        }
        let token = self.id_token.clone().ok_or(SendError::NotSignedIn)?;

        let history = self.messages.clone();
        self.messages.push(ChatMessage::user(message));
        self.busy = true;
        self.streaming_reply = false;

        Ok(OutgoingMessage {
            token,
            message: message.to_string(),
            history,
        })
    }

    /// Grow the in-flight assistant reply by one decoded chunk
    pub fn append_reply_chunk(&mut self, chunk: &str) {
        if !self.busy {
            return;
        }
        if self.streaming_reply {
            if let Some(last) = self.messages.last_mut() {
                last.content.push_str(chunk);
                return;
            }
        }
        self.messages.push(ChatMessage::assistant(chunk));
        self.streaming_reply = true;
    }

    pub fn finish_reply(&mut self) {
        self.busy = false;
        self.streaming_reply = false;
    }

    /// End the in-flight request with the apology turn.
    ///
    /// Whatever part of the reply already streamed stays in the history.
    pub fn fail_reply(&mut self) {
        self.messages.push(ChatMessage::assistant(APOLOGY_MESSAGE));
        self.busy = false;
        self.streaming_reply = false;
    }

    pub fn select_image(&mut self, url: impl Into<String>) {
        self.selected_image = Some(url.into());
    }

    pub fn close_image(&mut self) {
        self.selected_image = None;
    }

    /// Most recent assistant message, if any
    pub fn last_reply(&self) -> Option<&ChatMessage> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::Assistant)
    }
}
