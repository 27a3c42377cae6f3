pub mod chat;
pub mod images;

pub use chat::{ChatClient, ReplyStream, Utf8Decoder};
pub use images::image_url;
