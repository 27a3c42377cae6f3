pub mod backend;
pub mod config;
pub mod reply;
pub mod state;

// Re-export main types for convenience
pub use backend::{image_url, ChatClient, ReplyStream};
pub use config::Config;
pub use reply::{classify, detect, ClassifiedView, ParseError, Shape};
pub use state::{ChatMessage, ChatRole, ChatSession, OutgoingMessage, SendError};
