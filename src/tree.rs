use std::{cmp::Reverse, collections::BinaryHeap};

use crate::{
    error::{HuffmanError, Result},
    frequency::FrequencyTable,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        symbol: char,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { weight, .. } => *weight,
            HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    /// `first` is the lighter of the two and goes to the right.
    fn merge(first: Self, second: Self) -> Self {
        HuffmanNode::Internal {
            weight: first.weight() + second.weight(),
            left: Box::new(second),
            right: Box::new(first),
        }
    }
}

/// Queue entry ordered by `(weight, sequence)`, lightest first.
///
/// Leaves take the first-occurrence index of their symbol as sequence and
/// merged nodes are numbered after all leaves, so no two keys are equal.
struct QueuedNode {
    key: Reverse<(u64, usize)>,
    node: HuffmanNode,
}

impl QueuedNode {
    fn new(sequence: usize, node: HuffmanNode) -> Self {
        Self {
            key: Reverse((node.weight(), sequence)),
            node,
        }
    }
}

impl PartialEq for QueuedNode {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for QueuedNode {}

impl PartialOrd for QueuedNode {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedNode {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: HuffmanNode,
}

impl HuffmanTree {
    pub fn build(frequencies: &FrequencyTable) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(HuffmanError::InvalidInput("cannot build a tree without symbols"));
        }

        let mut heap = frequencies
            .iter()
            .enumerate()
            .map(|(sequence, (symbol, weight))| {
                QueuedNode::new(sequence, HuffmanNode::Leaf { symbol, weight })
            })
            .collect::<BinaryHeap<_>>();
        let mut next_sequence = heap.len();

        let root = loop {
            let first = heap
                .pop()
                .ok_or_else(|| HuffmanError::Internal("tree builder ran out of nodes".into()))?;
            let Some(second) = heap.pop() else {
                break first.node;
            };

            heap.push(QueuedNode::new(
                next_sequence,
                HuffmanNode::merge(first.node, second.node),
            ));
            next_sequence += 1;
        };

        log::trace!("huffman tree: {:?}", root);

        Ok(HuffmanTree { root })
    }

    pub fn weight(&self) -> u64 {
        self.root.weight()
    }
}
