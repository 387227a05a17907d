pub mod chart;
pub mod heap;
pub mod index;
pub mod tokenize;
pub mod trie;

pub use index::{FrequencyIndex, IndexError, RankedToken};
