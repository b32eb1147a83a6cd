//! Huffman tree data model and construction.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{HuffmanError, Result};
use crate::frequency::{ALPHABET_SIZE, FrequencyTable};

/// Weight given to the synthetic leaf that pads a single-symbol tree.
pub const SENTINEL_FREQUENCY: u64 = 1;

/// A leaf label: one of the 256 data bytes, or the synthetic sentinel that
/// orders before all of them and never appears in data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    Sentinel,
    Byte(u8),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Byte(b) if b.is_ascii_graphic() => write!(f, "'{}'", *b as char),
            Symbol::Byte(b' ') => write!(f, "' '"),
            Symbol::Byte(b) => write!(f, "0x{b:02x}"),
            Symbol::Sentinel => write!(f, "<sentinel>"),
        }
    }
}

/// A node of the tree. Children are exclusively owned; a node has either
/// a symbol or exactly two children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HuffmanNode {
    Leaf {
        freq: u64,
        symbol: Symbol,
    },
    Internal {
        freq: u64,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    pub fn leaf(symbol: Symbol, freq: u64) -> Self {
        HuffmanNode::Leaf { freq, symbol }
    }

    /// Join two subtrees; `left` is the one taken from the heap first.
    pub fn merge(left: HuffmanNode, right: HuffmanNode) -> Self {
        HuffmanNode::Internal {
            freq: left.freq() + right.freq(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn freq(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { freq, .. } | HuffmanNode::Internal { freq, .. } => *freq,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            HuffmanNode::Leaf { symbol, .. } => Some(*symbol),
            HuffmanNode::Internal { .. } => None,
        }
    }

    pub fn children(&self) -> Option<(&HuffmanNode, &HuffmanNode)> {
        match self {
            HuffmanNode::Leaf { .. } => None,
            HuffmanNode::Internal { left, right, .. } => Some((left, right)),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 1,
            HuffmanNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Length of the longest root-to-leaf path below this node.
    pub fn depth(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 0,
            HuffmanNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize, label: &str) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            HuffmanNode::Leaf { freq, symbol } => {
                writeln!(f, "{indent}{label}-> Leaf {symbol} [weight: {freq}]")
            }
            HuffmanNode::Internal { freq, left, right } => {
                writeln!(f, "{indent}{label}-> Internal [weight: {freq}]")?;
                left.fmt_indented(f, depth + 1, "L")?;
                right.fmt_indented(f, depth + 1, "R")
            }
        }
    }
}

/// Secondary key among equal weights: merged nodes first, in creation
/// order, then leaves by symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Internal(u64),
    Leaf(Symbol),
}

/// Heap entry ordered by ascending frequency, then by [`Rank`]. Symbols are
/// distinct and merge sequence numbers are unique, so no two entries tie.
struct HeapEntry {
    node: HuffmanNode,
    rank: Rank,
}

impl HeapEntry {
    fn leaf(symbol: Symbol, freq: u64) -> Self {
        Self {
            node: HuffmanNode::leaf(symbol, freq),
            rank: Rank::Leaf(symbol),
        }
    }

    fn merged(first: HeapEntry, second: HeapEntry, seq: u64) -> Self {
        Self {
            node: HuffmanNode::merge(first.node, second.node),
            rank: Rank::Internal(seq),
        }
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

// Reversed so BinaryHeap pops the lowest entry first.
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .node
            .freq()
            .cmp(&self.node.freq())
            .then_with(|| other.rank.cmp(&self.rank))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A complete Huffman tree. The root always has two children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HuffmanNode", into = "HuffmanNode")]
pub struct HuffmanTree {
    root: HuffmanNode,
}

impl HuffmanTree {
    /// Build the tree for `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_frequencies(&FrequencyTable::from_bytes(data))
    }

    /// Run Huffman's greedy merge over every non-zero entry of `freqs`.
    pub fn from_frequencies(freqs: &FrequencyTable) -> Result<Self> {
        let mut heap: BinaryHeap<HeapEntry> = freqs
            .iter()
            .map(|(byte, count)| HeapEntry::leaf(Symbol::Byte(byte), count))
            .collect();

        if heap.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }
        if heap.len() == 1 {
            debug!("single distinct symbol, adding sentinel leaf");
            heap.push(HeapEntry::leaf(Symbol::Sentinel, SENTINEL_FREQUENCY));
        }

        let distinct = heap.len();
        let mut seq = 0u64;
        loop {
            let first = heap.pop().ok_or(HuffmanError::EmptyInput)?;
            let Some(second) = heap.pop() else {
                let tree = HuffmanTree { root: first.node };
                debug!(
                    distinct,
                    weight = tree.weight(),
                    depth = tree.depth(),
                    "built huffman tree"
                );
                return Ok(tree);
            };
            trace!(
                left = ?first.rank,
                left_freq = first.node.freq(),
                right = ?second.rank,
                right_freq = second.node.freq(),
                "merging"
            );
            heap.push(HeapEntry::merged(first, second, seq));
            seq += 1;
        }
    }

    pub fn root(&self) -> &HuffmanNode {
        &self.root
    }

    /// Total weight, i.e. the input length plus the sentinel weight if present.
    pub fn weight(&self) -> u64 {
        self.root.freq()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    fn validate(node: &HuffmanNode, seen: &mut [bool; ALPHABET_SIZE + 1]) -> Result<()> {
        match node {
            HuffmanNode::Leaf { symbol, .. } => {
                let slot = match symbol {
                    Symbol::Byte(b) => *b as usize,
                    Symbol::Sentinel => ALPHABET_SIZE,
                };
                if seen[slot] {
                    return Err(HuffmanError::MalformedTree(format!(
                        "symbol {symbol} appears twice"
                    )));
                }
                seen[slot] = true;
                Ok(())
            }
            HuffmanNode::Internal { freq, left, right } => {
                if left.freq().checked_add(right.freq()) != Some(*freq) {
                    return Err(HuffmanError::MalformedTree(format!(
                        "internal weight {freq} is not the sum of {} and {}",
                        left.freq(),
                        right.freq()
                    )));
                }
                Self::validate(left, seen)?;
                Self::validate(right, seen)
            }
        }
    }
}

impl TryFrom<HuffmanNode> for HuffmanTree {
    type Error = HuffmanError;

    fn try_from(root: HuffmanNode) -> Result<Self> {
        if root.is_leaf() {
            return Err(HuffmanError::MalformedTree(
                "root must have two children".to_string(),
            ));
        }
        Self::validate(&root, &mut [false; ALPHABET_SIZE + 1])?;
        Ok(HuffmanTree { root })
    }
}

impl From<HuffmanTree> for HuffmanNode {
    fn from(tree: HuffmanTree) -> Self {
        tree.root
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt_indented(f, 0, "root")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_weights(node: &HuffmanNode) {
        if let Some((left, right)) = node.children() {
            assert_eq!(node.freq(), left.freq() + right.freq());
            assert_weights(left);
            assert_weights(right);
        }
    }

    #[test]
    fn test_two_symbols() {
        let tree = HuffmanTree::from_bytes(b"aab").unwrap();
        let (left, right) = tree.root().children().unwrap();
        assert_eq!(left.symbol(), Some(Symbol::Byte(b'b')));
        assert_eq!(right.symbol(), Some(Symbol::Byte(b'a')));
        assert_eq!(tree.weight(), 3);
    }

    #[test]
    fn test_tie_break_by_symbol() {
        // equal weights: lower byte value is popped first and becomes the left child
        let tree = HuffmanTree::from_bytes(b"ba").unwrap();
        let (left, right) = tree.root().children().unwrap();
        assert_eq!(left.symbol(), Some(Symbol::Byte(b'a')));
        assert_eq!(right.symbol(), Some(Symbol::Byte(b'b')));
    }

    #[test]
    fn test_merged_node_wins_tie_against_leaf() {
        // b,c merge into weight 2, which ties with 'a' and is popped first
        let tree = HuffmanTree::from_bytes(b"aabc").unwrap();
        let (left, right) = tree.root().children().unwrap();
        assert!(!left.is_leaf());
        assert_eq!(right.symbol(), Some(Symbol::Byte(b'a')));
    }

    #[test]
    fn test_merged_node_wins_tie_against_byte_zero() {
        let tree = HuffmanTree::from_bytes(&[0, 0, 1, 2]).unwrap();
        let (left, right) = tree.root().children().unwrap();
        assert!(!left.is_leaf());
        assert_eq!(right.symbol(), Some(Symbol::Byte(0)));
    }

    #[test]
    fn test_merged_nodes_ordered_by_creation() {
        // a+b is merged before c+d, so it is popped first at equal weight
        let tree = HuffmanTree::from_bytes(b"abcd").unwrap();
        let (left, right) = tree.root().children().unwrap();
        let (ll, _) = left.children().unwrap();
        let (rl, _) = right.children().unwrap();
        assert_eq!(ll.symbol(), Some(Symbol::Byte(b'a')));
        assert_eq!(rl.symbol(), Some(Symbol::Byte(b'c')));
    }

    #[test]
    fn test_sentinel_wins_tie_against_byte() {
        let tree = HuffmanTree::from_bytes(b"a").unwrap();
        let (left, right) = tree.root().children().unwrap();
        assert_eq!(left.symbol(), Some(Symbol::Sentinel));
        assert_eq!(right.symbol(), Some(Symbol::Byte(b'a')));
    }

    #[test]
    fn test_single_symbol_gets_sentinel() {
        let tree = HuffmanTree::from_bytes(b"aaaa").unwrap();
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.depth(), 1);
        let (left, right) = tree.root().children().unwrap();
        assert_eq!(left.symbol(), Some(Symbol::Sentinel));
        assert_eq!(left.freq(), SENTINEL_FREQUENCY);
        assert_eq!(right.symbol(), Some(Symbol::Byte(b'a')));
        assert_eq!(tree.weight(), 5);
    }

    #[test]
    fn test_single_zero_byte_does_not_collide() {
        let tree = HuffmanTree::from_bytes(&[0, 0, 0]).unwrap();
        let symbols: Vec<_> = {
            let (l, r) = tree.root().children().unwrap();
            vec![l.symbol().unwrap(), r.symbol().unwrap()]
        };
        assert!(symbols.contains(&Symbol::Byte(0)));
        assert!(symbols.contains(&Symbol::Sentinel));
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = HuffmanTree::from_bytes(b"").unwrap_err();
        assert!(matches!(err, HuffmanError::EmptyInput));
    }

    #[test]
    fn test_weight_invariant_hello_world() {
        let tree = HuffmanTree::from_bytes(b"hello world!").unwrap();
        assert_eq!(tree.weight(), 12);
        assert_eq!(tree.leaf_count(), 9);
        assert_weights(tree.root());
    }

    #[test]
    fn test_all_bytes() {
        let data: Vec<u8> = (0..=255u8).collect();
        let tree = HuffmanTree::from_bytes(&data).unwrap();
        assert_eq!(tree.leaf_count(), 256);
        // 256 equal weights give a perfectly balanced tree
        assert_eq!(tree.depth(), 8);
    }

    #[test]
    fn test_deterministic() {
        let a = HuffmanTree::from_bytes(b"mississippi river").unwrap();
        let b = HuffmanTree::from_bytes(b"mississippi river").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_display() {
        let tree = HuffmanTree::from_bytes(b"aab").unwrap();
        let rendered = tree.to_string();
        assert_eq!(
            rendered,
            "root-> Internal [weight: 3]\n  L-> Leaf 'b' [weight: 1]\n  R-> Leaf 'a' [weight: 2]\n"
        );
    }

    #[test]
    fn test_rejects_leaf_root() {
        let err = HuffmanTree::try_from(HuffmanNode::leaf(Symbol::Byte(1), 3)).unwrap_err();
        assert!(matches!(err, HuffmanError::MalformedTree(_)));
    }

    #[test]
    fn test_rejects_bad_weight() {
        let root = HuffmanNode::Internal {
            freq: 10,
            left: Box::new(HuffmanNode::leaf(Symbol::Byte(1), 1)),
            right: Box::new(HuffmanNode::leaf(Symbol::Byte(2), 1)),
        };
        assert!(HuffmanTree::try_from(root).is_err());
    }

    #[test]
    fn test_rejects_duplicate_symbol() {
        let root = HuffmanNode::merge(
            HuffmanNode::leaf(Symbol::Byte(7), 1),
            HuffmanNode::leaf(Symbol::Byte(7), 1),
        );
        assert!(HuffmanTree::try_from(root).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let tree = HuffmanTree::from_bytes(b"hello world!").unwrap();
        let json = serde_json::to_string(&tree).unwrap();
        let back: HuffmanTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}
