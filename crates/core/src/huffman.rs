//! Frequency-driven Huffman coding of a raw byte stream.
//!
//! # Tree construction
//!
//! One leaf is created per symbol with a non-zero count, in ascending symbol
//! order, then stably sorted by frequency. While more than one node remains,
//! the two lowest-frequency nodes are taken (first becomes the left child,
//! second the right child) and their parent is inserted after every node
//! whose frequency is less than or equal to the parent's. Ties therefore
//! resolve by position in the working list: older nodes before newer ones,
//! and initial leaves by symbol value.
//!
//! # Code table
//!
//! Codes are root-to-leaf paths, `0` for left and `1` for right. A tree with a
//! single leaf has no path to walk, so that leaf gets the one-bit code `0`
//! and the decoder emits it once per bit.
//!
//! # Stream format
//!
//! The compressed bytes are the concatenated codes, padded with `0` bits to a
//! byte boundary and packed MSB-first. Codes are streamed through a
//! [`BitWriter`] and read back through a [`BitReader`], so no per-bit buffer
//! is built on either side. Neither the tree nor the symbol count
//! is stored: the caller keeps the [`HuffmanTree`] returned by [`compress`]
//! and hands it to [`decompress`]. Since the padding bits are decoded like
//! any other bits, the output may carry spurious trailing symbols (copies of
//! the leaf on the all-zero path). The [`crate::framing`] module wraps the
//! stream with a length and checksum for callers that need exact output.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use crate::bitio::{BitReader, BitWriter};
use crate::error::{HuffmanError, Result};

/// Number of distinct byte symbols.
pub const SYMBOLS: usize = 256;

/// Count occurrences of every byte value.
pub fn histogram(data: &[u8]) -> [u64; SYMBOLS] {
    let mut freqs = [0u64; SYMBOLS];
    for &byte in data {
        freqs[byte as usize] += 1;
    }
    freqs
}

/// A node of the code tree. Parents own their children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        symbol: u8,
        frequency: u64,
    },
    Internal {
        frequency: u64,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    /// Symbol count for a leaf, sum of both children for an internal node.
    pub fn frequency(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { frequency, .. } | HuffmanNode::Internal { frequency, .. } => {
                *frequency
            }
        }
    }

    fn merge(left: HuffmanNode, right: HuffmanNode) -> Self {
        HuffmanNode::Internal {
            frequency: left.frequency() + right.frequency(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 1,
            HuffmanNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 0,
            HuffmanNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn collect_codes(&self, path: &mut Vec<bool>, codes: &mut BTreeMap<u8, Vec<bool>>) {
        match self {
            HuffmanNode::Leaf { symbol, .. } => {
                codes.insert(*symbol, path.clone());
            }
            HuffmanNode::Internal { left, right, .. } => {
                path.push(false);
                left.collect_codes(path, codes);
                path.pop();

                path.push(true);
                right.collect_codes(path, codes);
                path.pop();
            }
        }
    }
}

/// Prefix-code tree built from a symbol histogram.
///
/// The tree is the only carrier of the code table: keep it from
/// [`compress`] until the matching [`decompress`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HuffmanTree {
    root: Option<HuffmanNode>,
}

impl HuffmanTree {
    /// Build a tree from a 256-bucket histogram.
    ///
    /// Symbols with zero frequency never enter the tree. An all-zero
    /// histogram yields a tree without a root.
    pub fn from_frequencies(freqs: &[u64; SYMBOLS]) -> Self {
        let mut nodes: Vec<HuffmanNode> = freqs
            .iter()
            .enumerate()
            .filter(|&(_, &frequency)| frequency > 0)
            .map(|(symbol, &frequency)| HuffmanNode::Leaf {
                symbol: symbol as u8,
                frequency,
            })
            .collect();

        // Stable: equal frequencies keep ascending symbol order
        nodes.sort_by_key(HuffmanNode::frequency);

        while nodes.len() > 1 {
            let first = nodes.remove(0);
            let second = nodes.remove(0);
            let parent = HuffmanNode::merge(first, second);

            let at = nodes.partition_point(|n| n.frequency() <= parent.frequency());
            nodes.insert(at, parent);
        }

        let tree = Self { root: nodes.pop() };
        debug!(
            "built huffman tree: {} leaves, depth {}",
            tree.leaf_count(),
            tree.depth()
        );
        tree
    }

    /// Root node, `None` for a tree built from an empty buffer.
    pub fn root(&self) -> Option<&HuffmanNode> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of distinct symbols in the tree.
    pub fn leaf_count(&self) -> usize {
        self.root.as_ref().map_or(0, HuffmanNode::leaf_count)
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, HuffmanNode::depth)
    }

    /// Derive the symbol to bit-string mapping by depth-first traversal.
    pub fn code_table(&self) -> CodeTable {
        let mut codes = BTreeMap::new();
        match &self.root {
            None => {}
            Some(HuffmanNode::Leaf { symbol, .. }) => {
                codes.insert(*symbol, vec![false]);
            }
            Some(root) => root.collect_codes(&mut Vec::new(), &mut codes),
        }
        CodeTable { codes }
    }

    /// Walk the tree for every code in the packed bit stream and emit the
    /// reached symbols.
    ///
    /// Every bit of `packed` is consumed, padding included. Bits left over
    /// after the last complete code are ignored.
    ///
    /// # Errors
    /// `HuffmanError::EmptyTree` if `packed` is non-empty and the tree has no
    /// root.
    pub fn decode(&self, packed: &[u8]) -> Result<Vec<u8>> {
        let bit_len = packed.len() * 8;
        let root = match &self.root {
            Some(root) => root,
            None if packed.is_empty() => return Ok(Vec::new()),
            None => return Err(HuffmanError::EmptyTree { bits: bit_len }.into()),
        };

        if let HuffmanNode::Leaf { symbol, .. } = root {
            return Ok(vec![*symbol; bit_len]);
        }

        let mut reader = BitReader::new(packed);
        let mut output = Vec::with_capacity(packed.len());
        let mut node = root;
        while !reader.is_empty() {
            if let HuffmanNode::Internal { left, right, .. } = node {
                node = if reader.read_bit()? { &**right } else { &**left };
            }
            if let HuffmanNode::Leaf { symbol, .. } = node {
                output.push(*symbol);
                node = root;
            }
        }

        if !std::ptr::eq(node, root) {
            debug!("dropped incomplete trailing code");
        }

        Ok(output)
    }
}

/// Mapping from symbol to its code, a sequence of bits (`false` = 0).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeTable {
    codes: BTreeMap<u8, Vec<bool>>,
}

impl CodeTable {
    pub fn get(&self, symbol: u8) -> Option<&[bool]> {
        self.codes.get(&symbol).map(Vec::as_slice)
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[bool])> {
        self.codes.iter().map(|(&symbol, code)| (symbol, code.as_slice()))
    }

    /// Mean code length in bits, weighted by `freqs`.
    pub fn average_code_length(&self, freqs: &[u64; SYMBOLS]) -> f64 {
        let (bits, total) = self.iter().fold((0u64, 0u64), |(bits, total), (symbol, code)| {
            let count = freqs[symbol as usize];
            (bits + count * code.len() as u64, total + count)
        });
        if total == 0 {
            0.0
        } else {
            bits as f64 / total as f64
        }
    }

    /// Number of bits the codes of a buffer with histogram `freqs` occupy,
    /// padding excluded.
    pub fn encoded_bit_len(&self, freqs: &[u64; SYMBOLS]) -> u64 {
        self.iter()
            .map(|(symbol, code)| freqs[symbol as usize] * code.len() as u64)
            .sum()
    }

    /// Stream the code of every byte of `data` into `writer`.
    ///
    /// # Errors
    /// `HuffmanError::MissingSymbol` for a byte the table has no code for.
    pub fn write_codes(&self, data: &[u8], writer: &mut BitWriter) -> Result<()> {
        for &byte in data {
            let code = self.get(byte).ok_or(HuffmanError::MissingSymbol(byte))?;
            for &bit in code {
                writer.write_bit(bit);
            }
        }
        Ok(())
    }
}

impl fmt::Display for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, code) in self.iter() {
            let text: String = code.iter().map(|&b| if b { '1' } else { '0' }).collect();
            writeln!(f, "{symbol:3} {text}")?;
        }
        Ok(())
    }
}

/// Compress `data` into packed code bytes plus the tree needed to decode them.
///
/// The output holds no code table and no symbol count.
pub fn compress(data: &[u8]) -> Result<(Vec<u8>, HuffmanTree)> {
    let freqs = histogram(data);
    let tree = HuffmanTree::from_frequencies(&freqs);
    let table = tree.code_table();

    let bit_len = table.encoded_bit_len(&freqs) as usize;
    let mut writer = BitWriter::with_capacity(bit_len.div_ceil(8));
    table.write_codes(data, &mut writer)?;
    let packed = writer.finish();
    debug!(
        "encoded {} symbols into {} bits (+{} padding)",
        data.len(),
        bit_len,
        packed.len() * 8 - bit_len
    );

    Ok((packed, tree))
}

/// Decode packed code bytes with the tree returned by [`compress`].
///
/// Padding bits are decoded too, so the result may be longer than the
/// original buffer; only its first `original_len` bytes are meaningful.
/// A tree that does not belong to `packed` produces wrong bytes, not an
/// error.
pub fn decompress(packed: &[u8], tree: &HuffmanTree) -> Result<Vec<u8>> {
    tree.decode(packed)
}
