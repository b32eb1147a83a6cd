//! Error types for the Huffman codec.

use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = core::result::Result<T, HuffmanError>;

/// Every failure the codec can report. All of them are terminal for the
/// call that produced them.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// No symbol has a non-zero frequency, so there is no tree to build.
    #[error("cannot build a Huffman tree from empty input")]
    EmptyInput,

    /// The bit string holds something other than `'0'` or `'1'`.
    #[error("invalid bit {bit:?} at position {position}")]
    InvalidBit { bit: char, position: usize },

    /// The bit string ended in the middle of a code word.
    #[error("bit string truncated mid code word after {consumed} bits")]
    TruncatedInput { consumed: usize },

    /// The encoder met a byte the code table has no entry for.
    #[error("byte 0x{0:02x} has no entry in the code table")]
    UnknownSymbol(u8),

    /// Decoding walked onto the synthetic leaf, which no encoder output reaches.
    #[error("bit string reaches the sentinel leaf at position {position}")]
    UnexpectedSentinel { position: usize },

    /// A reloaded tree breaks the shape the builder guarantees.
    #[error("malformed tree: {0}")]
    MalformedTree(String),

    /// I/O error while reading or writing a message.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A saved message could not be parsed or rendered.
    #[error("message encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HuffmanError {
    /// True for errors that indicate a corrupted or foreign bit string.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            HuffmanError::InvalidBit { .. }
                | HuffmanError::TruncatedInput { .. }
                | HuffmanError::UnexpectedSentinel { .. }
                | HuffmanError::MalformedTree(_)
        )
    }
}
