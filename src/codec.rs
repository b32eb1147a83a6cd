//! Encoding, decoding and the compress/decompress pipeline.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::code_table::{CodeTable, LEFT_BIT, RIGHT_BIT};
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::stats::CompressionStats;
use crate::tree::{HuffmanNode, HuffmanTree, Symbol};

/// Bit string plus the tree needed to read it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedMessage {
    bits: String,
    tree: HuffmanTree,
}

impl EncodedMessage {
    pub fn new(bits: String, tree: HuffmanTree) -> Self {
        Self { bits, tree }
    }

    pub fn bits(&self) -> &str {
        &self.bits
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    /// Number of bit characters, matching the positions decode errors report.
    pub fn bit_len(&self) -> usize {
        self.bits.chars().count()
    }

    pub fn code_table(&self) -> CodeTable {
        CodeTable::from_tree(&self.tree)
    }

    /// Size figures for this message. The sentinel weight is not input.
    pub fn stats(&self) -> CompressionStats {
        let (input_bytes, distinct) = count_leaves(self.tree.root());
        CompressionStats {
            input_bytes,
            encoded_bits: self.bit_len() as u64,
            distinct_symbols: distinct,
        }
    }

    /// Write the message as pretty JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Read a message written by [`EncodedMessage::write_json`]. The tree is
    /// validated while parsing; the bits are checked when decoded.
    pub fn read_json<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

fn count_leaves(node: &HuffmanNode) -> (u64, usize) {
    match node {
        HuffmanNode::Leaf { freq, symbol: Symbol::Byte(_) } => (*freq, 1),
        HuffmanNode::Leaf { symbol: Symbol::Sentinel, .. } => (0, 0),
        HuffmanNode::Internal { left, right, .. } => {
            let (lw, ld) = count_leaves(left);
            let (rw, rd) = count_leaves(right);
            (lw + rw, ld + rd)
        }
    }
}

/// Concatenate the code word of every byte of `data`, in order.
pub fn encode(data: &[u8], table: &CodeTable) -> Result<String> {
    let mut bits = String::new();
    for &byte in data {
        let code = table.get(byte).ok_or(HuffmanError::UnknownSymbol(byte))?;
        bits.push_str(code);
    }
    Ok(bits)
}

/// Walk `tree` bit by bit, emitting a byte at every leaf.
pub fn decode(tree: &HuffmanTree, bits: &str) -> Result<Vec<u8>> {
    let root = tree.root();
    let mut output = Vec::new();
    let mut current = root;
    let mut consumed = 0;

    for (position, bit) in bits.chars().enumerate() {
        let (left, right) = current
            .children()
            .ok_or_else(|| HuffmanError::MalformedTree("root must have two children".to_string()))?;
        current = match bit {
            LEFT_BIT => left,
            RIGHT_BIT => right,
            _ => return Err(HuffmanError::InvalidBit { bit, position }),
        };
        consumed = position + 1;

        match current.symbol() {
            Some(Symbol::Byte(byte)) => {
                output.push(byte);
                current = root;
            }
            Some(Symbol::Sentinel) => {
                return Err(HuffmanError::UnexpectedSentinel { position });
            }
            None => {}
        }
    }

    if !std::ptr::eq(current, root) {
        return Err(HuffmanError::TruncatedInput { consumed });
    }
    Ok(output)
}

/// Count, build, tabulate and encode `data` in one call.
pub fn compress(data: &[u8]) -> Result<EncodedMessage> {
    let freqs = FrequencyTable::from_bytes(data);
    let tree = HuffmanTree::from_frequencies(&freqs)?;
    let table = CodeTable::from_tree(&tree);
    let bits = encode(data, &table)?;
    info!(
        input_bytes = data.len(),
        encoded_bits = bits.len(),
        distinct = freqs.distinct(),
        "compressed"
    );
    Ok(EncodedMessage::new(bits, tree))
}

/// Inverse of [`compress`].
pub fn decompress(message: &EncodedMessage) -> Result<Vec<u8>> {
    let data = decode(&message.tree, &message.bits)?;
    debug!(
        encoded_bits = message.bit_len(),
        output_bytes = data.len(),
        "decompressed"
    );
    Ok(data)
}
