use thiserror::Error;

/// Why a reply could not be turned into its structured view
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("delivery block {index} is malformed: {reason}")]
    MalformedBlock { index: usize, reason: String },
    #[error("none of the {blocks} delivery block(s) is well formed")]
    NoDeliveryOptions { blocks: usize },
}
