//! Symbol to code word lookup, derived from a tree.

use std::collections::BTreeMap;

use tracing::debug;

use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanNode, HuffmanTree, Symbol};

/// Marker for descending to the left child.
pub const LEFT_BIT: char = '0';
/// Marker for descending to the right child.
pub const RIGHT_BIT: char = '1';

/// Byte to code word map. Code words are strings of [`LEFT_BIT`] and
/// [`RIGHT_BIT`]; none is a prefix of another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, String>,
}

impl CodeTable {
    /// Walk the whole tree, recording the root-to-leaf path of every byte leaf.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        let mut path = String::with_capacity(tree.depth());
        collect_codes(tree.root(), &mut path, &mut codes);
        debug!(entries = codes.len(), "built code table");
        CodeTable { codes }
    }

    pub fn get(&self, byte: u8) -> Option<&str> {
        self.codes.get(&byte).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &str)> {
        self.codes.iter().map(|(&byte, code)| (byte, code.as_str()))
    }

    /// Bits needed to encode an input with these counts.
    pub fn encoded_len(&self, freqs: &FrequencyTable) -> u64 {
        freqs
            .iter()
            .filter_map(|(byte, count)| self.get(byte).map(|code| count * code.len() as u64))
            .sum()
    }
}

fn collect_codes(node: &HuffmanNode, path: &mut String, codes: &mut BTreeMap<u8, String>) {
    match node {
        HuffmanNode::Leaf { symbol: Symbol::Byte(byte), .. } => {
            codes.insert(*byte, path.clone());
        }
        // the sentinel only pads the tree; nothing encodes to it
        HuffmanNode::Leaf { symbol: Symbol::Sentinel, .. } => {}
        HuffmanNode::Internal { left, right, .. } => {
            path.push(LEFT_BIT);
            collect_codes(left, path, codes);
            path.pop();
            path.push(RIGHT_BIT);
            collect_codes(right, path, codes);
            path.pop();
        }
    }
}
