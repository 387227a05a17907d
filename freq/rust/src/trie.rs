use thiserror::Error;

/// Number of symbols a token may be built from: `a`-`z` followed by `0`-`9`.
pub const ALPHABET_SIZE: usize = 36;

const LETTER_COUNT: usize = 26;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TrieError {
    #[error("symbol {symbol:?} at position {position} is outside the token alphabet")]
    InvalidSymbol { symbol: char, position: usize },
}

type Error = TrieError;
type Result<T> = std::result::Result<T, Error>;

/// Handle to a node in a [`TokenTrie`]. Handles stay valid for the lifetime of the trie,
/// nodes are never removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    const ROOT: NodeId = NodeId(0);

    #[inline(always)]
    fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct TrieNode {
    children: [Option<NodeId>; ALPHABET_SIZE],
    leaf: bool,
    frequency: u64,
    heap_slot: Option<usize>,
}

impl TrieNode {
    fn new() -> Self {
        Self {
            children: [None; ALPHABET_SIZE],
            leaf: false,
            frequency: 0,
            heap_slot: None,
        }
    }
}

/// Maps every distinct token to a stable [`NodeId`].
///
/// Nodes live in a single arena and refer to their children by index, so the
/// tree never needs per-node allocations or parent pointers.
/// Lookups and inserts are O(token length).
#[derive(Debug)]
pub struct TokenTrie {
    nodes: Vec<TrieNode>,
}

impl TokenTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::new()],
        }
    }

    /// Maps an alphabet symbol to its child slot, letters first and digits after them.
    ///
    /// ```
    /// use freq::trie::TokenTrie;
    ///
    /// assert_eq!(Some(0), TokenTrie::symbol_slot('a'));
    /// assert_eq!(Some(26), TokenTrie::symbol_slot('0'));
    /// assert_eq!(None, TokenTrie::symbol_slot('A'));
    /// ```
    #[inline(always)]
    pub fn symbol_slot(symbol: char) -> Option<usize> {
        match symbol {
            'a'..='z' => Some(symbol as usize - 'a' as usize),
            '0'..='9' => Some(LETTER_COUNT + (symbol as usize - '0' as usize)),
            _ => None,
        }
    }

    /// Returns the node for `token`, creating every missing node along its path.
    ///
    /// The whole token is checked against the alphabet before anything is created,
    /// so a rejected token leaves the trie untouched.
    pub fn lookup_or_create(&mut self, token: &str) -> Result<NodeId> {
        let path = Self::symbol_path(token)?;

        let mut current = NodeId::ROOT;
        for slot in path {
            current = match self.nodes[current.index()].children[slot] {
                Some(child) => child,
                None => {
                    let child = NodeId(self.nodes.len());
                    self.nodes.push(TrieNode::new());
                    self.nodes[current.index()].children[slot] = Some(child);
                    child
                }
            };
        }

        Ok(current)
    }

    /// Returns the node for `token` if it has been seen as a whole token.
    pub fn get(&self, token: &str) -> Option<NodeId> {
        let mut current = NodeId::ROOT;
        for symbol in token.chars() {
            let slot = Self::symbol_slot(symbol)?;
            current = self.nodes[current.index()].children[slot]?;
        }

        self.nodes[current.index()].leaf.then_some(current)
    }

    /// Turns `node` into a leaf with a frequency of one.
    pub fn mark_leaf(&mut self, node: NodeId) {
        let node = &mut self.nodes[node.index()];
        node.leaf = true;
        node.frequency = 1;
    }

    /// Bumps the frequency of a leaf, returning the new value.
    pub fn increment(&mut self, node: NodeId) -> u64 {
        let node = &mut self.nodes[node.index()];
        debug_assert!(node.leaf, "only leaves carry a frequency");
        node.frequency += 1;
        node.frequency
    }

    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.nodes[node.index()].leaf
    }

    /// Frequency of a leaf, zero for interior nodes.
    pub fn frequency(&self, node: NodeId) -> u64 {
        self.nodes[node.index()].frequency
    }

    /// Current position of this token's entry in the frequency heap.
    pub fn heap_slot(&self, node: NodeId) -> Option<usize> {
        self.nodes[node.index()].heap_slot
    }

    pub fn set_heap_slot(&mut self, node: NodeId, slot: Option<usize>) {
        self.nodes[node.index()].heap_slot = slot;
    }

    /// Number of nodes including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn symbol_path(token: &str) -> Result<Vec<usize>> {
        token
            .chars()
            .enumerate()
            .map(|(position, symbol)| {
                Self::symbol_slot(symbol).ok_or(Error::InvalidSymbol { symbol, position })
            })
            .collect()
    }
}

impl Default for TokenTrie {
    fn default() -> Self {
        Self::new()
    }
}
