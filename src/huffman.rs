use std::{collections::HashMap, fmt};

use bitvec::prelude::*;
use itertools::Itertools;

use crate::{
    error::{HuffmanError, Result},
    tree::{HuffmanNode, HuffmanTree},
};

/// A single codeword, most significant bit first.
pub type Code = BitVec<u8, Msb0>;

/// Prefix code over the symbols of one text, kept in both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: HashMap<char, Code>,
    symbols: HashMap<Code, char>,
    max_code_len: usize,
}

impl CodeTable {
    fn empty() -> Self {
        Self {
            codes: HashMap::new(),
            symbols: HashMap::new(),
            max_code_len: 0,
        }
    }

    /// Walks the tree assigning `1` to right edges and `0` to left edges.
    ///
    /// A tree made of a single leaf has no edges, so its symbol is given the
    /// one-bit code `0`.
    pub fn generate(tree: &HuffmanTree) -> Self {
        let mut table = Self::empty();

        match &tree.root {
            HuffmanNode::Leaf { symbol, .. } => table.insert(*symbol, bitvec![u8, Msb0; 0]),
            root => table.assign_codes(root, &mut Code::new()),
        }

        for (symbol, code) in table.iter() {
            log::debug!("{:?} | {}", symbol, code_to_string(code));
        }

        table
    }

    fn assign_codes(&mut self, node: &HuffmanNode, prefix: &mut Code) {
        match node {
            HuffmanNode::Leaf { symbol, .. } => self.insert(*symbol, prefix.clone()),
            HuffmanNode::Internal { left, right, .. } => {
                prefix.push(true);
                self.assign_codes(right, prefix);
                prefix.pop();

                prefix.push(false);
                self.assign_codes(left, prefix);
                prefix.pop();
            }
        }
    }

    fn insert(&mut self, symbol: char, mut code: Code) {
        code.set_uninitialized(false);
        self.max_code_len = self.max_code_len.max(code.len());
        self.symbols.insert(code.clone(), symbol);
        self.codes.insert(symbol, code);
    }

    /// Rebuilds a table from stored `(symbol, code)` pairs, rejecting any set
    /// of pairs that is not a prefix code.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (char, Code)>,
    {
        let mut table = Self::empty();

        for (symbol, code) in pairs {
            if code.is_empty() {
                return Err(HuffmanError::CorruptData(format!(
                    "symbol {:?} has an empty code",
                    symbol
                )));
            }
            if table.codes.contains_key(&symbol) {
                return Err(HuffmanError::CorruptData(format!(
                    "symbol {:?} appears twice",
                    symbol
                )));
            }
            table.insert(symbol, code);
        }

        if table.codes.is_empty() {
            return Err(HuffmanError::CorruptData("code table has no symbols".into()));
        }

        // In sorted order a code that prefixes any other also prefixes its
        // direct successor. Equal codes are caught the same way.
        let collision = table
            .codes
            .values()
            .sorted()
            .tuple_windows()
            .find(|(a, b)| b.starts_with(a.as_bitslice()));
        if let Some((a, b)) = collision {
            return Err(HuffmanError::CorruptData(format!(
                "code {} is a prefix of {}",
                code_to_string(a),
                code_to_string(b)
            )));
        }

        Ok(table)
    }

    pub fn code(&self, symbol: char) -> Option<&BitSlice<u8, Msb0>> {
        self.codes.get(&symbol).map(|code| code.as_bitslice())
    }

    /// The code of `symbol` spelled out as `'0'`/`'1'` characters.
    pub fn code_string(&self, symbol: char) -> Option<String> {
        self.code(symbol).map(code_to_string)
    }

    pub fn symbol(&self, code: &BitSlice<u8, Msb0>) -> Option<char> {
        self.symbols.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn max_code_len(&self) -> usize {
        self.max_code_len
    }

    /// Iterates `(symbol, code)` ordered by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (char, &BitSlice<u8, Msb0>)> + '_ {
        self.codes
            .iter()
            .sorted_by_key(|(symbol, _)| **symbol)
            .map(|(symbol, code)| (*symbol, code.as_bitslice()))
    }

    /// Number of bits `text` encodes to, or `None` if it uses an unknown symbol.
    pub fn encoded_len(&self, text: &str) -> Option<u64> {
        text.chars()
            .map(|symbol| self.codes.get(&symbol).map(|code| code.len() as u64))
            .sum()
    }
}

impl fmt::Display for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, code) in self.iter() {
            writeln!(f, "{:?} | {}", symbol, code_to_string(code))?;
        }
        Ok(())
    }
}

pub fn code_to_string(code: &BitSlice<u8, Msb0>) -> String {
    code.iter().map(|bit| if *bit { '1' } else { '0' }).collect()
}

/// Parses a `'0'`/`'1'` string into a code. Any other character yields `None`.
pub fn parse_code(bits: &str) -> Option<Code> {
    bits.chars()
        .map(|c| match c {
            '0' => Some(false),
            '1' => Some(true),
            _ => None,
        })
        .collect()
}
