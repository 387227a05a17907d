use thiserror::Error;
use tracing::{debug, trace};

use crate::heap::{FrequencyHeap, HeapError};
use crate::tokenize::{self, Mode};
use crate::trie::{TokenTrie, TrieError};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IndexError {
    #[error("rejected token: {0}")]
    Trie(#[from] TrieError),
    #[error("heap operation failed: {0}")]
    Heap(#[from] HeapError),
    #[error("requested the top {requested} tokens but only {available} distinct tokens were ingested")]
    InsufficientDistinctTokens { requested: usize, available: usize },
    #[error("tokens cannot be ingested once extraction has begun")]
    Drained,
}

type Error = IndexError;
type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedToken {
    pub token: String,
    pub frequency: u64,
}

/// Counts tokens and ranks them by frequency, ties going to the token seen first.
///
/// ```
/// use freq::index::FrequencyIndex;
/// use std::error::Error;
///
/// fn main() -> Result<(), Box<dyn Error>> {
///     let mut index = FrequencyIndex::new();
///     for token in ["the", "quick", "the", "fox", "the"] {
///         index.ingest(token)?;
///     }
///
///     let top = index.extract_top(1)?;
///     assert_eq!("the", top[0].token);
///     assert_eq!(3, top[0].frequency);
///     Ok(())
/// }
/// ```
#[derive(Debug, Default)]
pub struct FrequencyIndex {
    trie: TokenTrie,
    heap: FrequencyHeap,
    total: u64,
    drained: bool,
}

impl FrequencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one normalized token. Empty tokens are ignored.
    ///
    /// A token with a symbol outside `[a-z0-9]` is rejected and no counts change.
    pub fn ingest(&mut self, token: &str) -> Result<()> {
        if token.is_empty() {
            return Ok(());
        }
        if self.drained {
            return Err(Error::Drained);
        }

        let node = self.trie.lookup_or_create(token)?;
        match self.trie.heap_slot(node) {
            Some(slot) => {
                let slot = self.heap.increment_and_resift(slot, &mut self.trie)?;
                let frequency = self.trie.increment(node);
                debug_assert_eq!(Some(frequency), self.heap.get(slot).map(|e| e.frequency));
                trace!(token, frequency, slot, "counted token");
            }
            None => {
                self.trie.mark_leaf(node);
                let slot = self.heap.register_new(token.to_owned(), node, &mut self.trie);
                debug!(token, slot, distinct = self.heap.len(), "new distinct token");
            }
        }

        self.total += 1;
        Ok(())
    }

    /// Splits `text` per `mode` and ingests every token, returning how many were counted.
    pub fn ingest_text(&mut self, text: &str, mode: Mode) -> Result<u64> {
        let before = self.total;
        for token in tokenize::tokens(text, mode) {
            self.ingest(&token)?;
        }

        Ok(self.total - before)
    }

    /// Every token ingested so far, duplicates included.
    pub fn total_token_count(&self) -> u64 {
        self.total
    }

    /// Distinct tokens still held by the index.
    pub fn distinct_token_count(&self) -> usize {
        self.heap.len()
    }

    /// How often `token` has been ingested.
    pub fn frequency_of(&self, token: &str) -> Option<u64> {
        self.trie.get(token).map(|node| self.trie.frequency(node))
    }

    /// Removes the `k` highest ranked tokens, most frequent first.
    ///
    /// Fails without removing anything if fewer than `k` distinct tokens are held.
    /// Once anything has been extracted the index no longer accepts tokens.
    pub fn extract_top(&mut self, k: usize) -> Result<Vec<RankedToken>> {
        let available = self.distinct_token_count();
        if k > available {
            return Err(Error::InsufficientDistinctTokens { requested: k, available });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        self.drained = true;
        let mut ranked = Vec::with_capacity(k);
        for _ in 0..k {
            let entry = self.heap.extract_max(&mut self.trie)?;
            ranked.push(RankedToken {
                token: entry.token,
                frequency: entry.frequency,
            });
        }

        debug!(k, remaining = self.heap.len(), "extracted top tokens");
        Ok(ranked)
    }

    pub fn heap(&self) -> &FrequencyHeap {
        &self.heap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingest_all(tokens: &[&str]) -> FrequencyIndex {
        let mut index = FrequencyIndex::new();
        for token in tokens {
            index.ingest(token).unwrap();
        }
        index
    }

    fn ranked(pairs: &[(&str, u64)]) -> Vec<RankedToken> {
        pairs
            .iter()
            .map(|&(token, frequency)| RankedToken {
                token: token.to_owned(),
                frequency,
            })
            .collect()
    }

    #[test]
    fn basic_frequency() {
        let mut index = ingest_all(&["the", "quick", "the", "fox", "the"]);

        assert_eq!(5, index.total_token_count());
        assert_eq!(3, index.distinct_token_count());
        assert_eq!(ranked(&[("the", 3)]), index.extract_top(1).unwrap());
    }

    #[test]
    fn tie_goes_to_first_seen() {
        let mut index = ingest_all(&["b", "a", "b", "a"]);

        assert_eq!(ranked(&[("b", 2), ("a", 2)]), index.extract_top(2).unwrap());
    }

    #[test]
    fn full_extraction_order() {
        let mut index = ingest_all(&["c", "b", "a", "a", "d", "b", "d", "e", "d"]);

        let expected = ranked(&[("d", 3), ("b", 2), ("a", 2), ("c", 1), ("e", 1)]);
        assert_eq!(expected, index.extract_top(5).unwrap());
        assert_eq!(0, index.distinct_token_count());
    }

    #[test]
    fn extract_zero() {
        let mut index = ingest_all(&["a"]);
        assert!(index.extract_top(0).unwrap().is_empty());

        let mut empty = FrequencyIndex::new();
        assert!(empty.extract_top(0).unwrap().is_empty());

        // Nothing was extracted, so ingestion continues.
        index.ingest("a").unwrap();
        assert_eq!(Some(2), index.frequency_of("a"));
    }

    #[test]
    fn too_few_distinct_tokens() {
        let mut index = ingest_all(&["a", "b", "a"]);

        assert_eq!(
            Err(IndexError::InsufficientDistinctTokens {
                requested: 3,
                available: 2
            }),
            index.extract_top(3)
        );
        assert_eq!(2, index.distinct_token_count());
        assert_eq!(ranked(&[("a", 2), ("b", 1)]), index.extract_top(2).unwrap());
    }

    #[test]
    fn invalid_symbol_leaves_counts() {
        let mut index = ingest_all(&["ok", "ok"]);

        let err = index.ingest("Not-ok").unwrap_err();
        assert_eq!(
            IndexError::Trie(TrieError::InvalidSymbol {
                symbol: 'N',
                position: 0
            }),
            err
        );
        assert!(index.ingest("ok!").is_err());

        assert_eq!(2, index.total_token_count());
        assert_eq!(1, index.distinct_token_count());
        assert_eq!(Some(2), index.frequency_of("ok"));
    }

    #[test]
    fn stale_slot_leaves_counts() {
        let mut index = ingest_all(&["a", "a"]);
        let node = index.trie.get("a").unwrap();
        index.trie.set_heap_slot(node, Some(5));

        assert_eq!(
            Err(IndexError::Heap(HeapError::SlotOutOfBounds { slot: 5, len: 1 })),
            index.ingest("a")
        );
        assert_eq!(2, index.total_token_count());
        assert_eq!(Some(2), index.frequency_of("a"));
        assert_eq!(Some(2), index.heap().peek().map(|e| e.frequency));
    }

    #[test]
    fn empty_token_is_ignored() {
        let mut index = ingest_all(&["", "a", ""]);

        assert_eq!(1, index.total_token_count());
        assert_eq!(1, index.distinct_token_count());
    }

    #[test]
    fn prefixes_are_distinct_tokens() {
        let mut index = ingest_all(&["then", "the", "th", "the"]);

        assert_eq!(Some(2), index.frequency_of("the"));
        assert_eq!(Some(1), index.frequency_of("then"));
        assert_eq!(None, index.frequency_of("t"));
        assert_eq!(
            ranked(&[("the", 2), ("then", 1), ("th", 1)]),
            index.extract_top(3).unwrap()
        );
    }

    #[test]
    fn ingest_after_extract() {
        let mut index = ingest_all(&["a", "b"]);
        index.extract_top(1).unwrap();

        assert_eq!(Err(IndexError::Drained), index.ingest("b"));
        assert_eq!(2, index.total_token_count());
        assert_eq!(ranked(&[("b", 1)]), index.extract_top(1).unwrap());
    }

    #[test]
    fn extract_from_exhausted() {
        let mut index = ingest_all(&["a"]);
        index.extract_top(1).unwrap();

        assert_eq!(
            Err(IndexError::InsufficientDistinctTokens {
                requested: 1,
                available: 0
            }),
            index.extract_top(1)
        );
    }

    #[test]
    fn ingest_text_by_mode() {
        let mut words = FrequencyIndex::new();
        assert_eq!(6, words.ingest_text("To be, or NOT to be?", Mode::Word).unwrap());
        assert_eq!(Some(2), words.frequency_of("to"));
        assert_eq!(Some(1), words.frequency_of("not"));

        let mut chars = FrequencyIndex::new();
        assert_eq!(6, chars.ingest_text("Abba a1", Mode::Character).unwrap());
        assert_eq!(
            ranked(&[("a", 3), ("b", 2), ("1", 1)]),
            chars.extract_top(3).unwrap()
        );
    }

    #[test]
    fn heap_stays_ordered() {
        let mut index = FrequencyIndex::new();
        for token in "a b c d e f g h g f e d c b a h h h a 1 2 3 2".split(' ') {
            index.ingest(token).unwrap();
            assert!(index.heap().is_heap());
        }

        assert_eq!(Some("h"), index.heap().peek().map(|e| e.token.as_str()));
    }
}
