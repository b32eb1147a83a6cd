//! # huffman_codec
//!
//! A Huffman coding codec over bytes. Compression builds an optimal prefix
//! code from the input's byte frequencies and produces a bit string of
//! `'0'`/`'1'` markers together with the tree needed to read it back.
//!
//! ```rust
//! use huffman_codec::{compress, decompress};
//!
//! let message = compress(b"hello world!")?;
//! assert!(message.bit_len() <= 12 * 8);
//! assert_eq!(decompress(&message)?, b"hello world!");
//! # Ok::<(), huffman_codec::HuffmanError>(())
//! ```

pub mod code_table;
pub mod codec;
pub mod error;
pub mod frequency;
pub mod stats;
pub mod tree;

pub use code_table::CodeTable;
pub use codec::{EncodedMessage, compress, decode, decompress, encode};
pub use error::{HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use stats::CompressionStats;
pub use tree::{HuffmanNode, HuffmanTree, Symbol};
