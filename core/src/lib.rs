//! Keyword search over a fixed movie corpus.
//!
//! The build phase tokenizes every document into an [`InvertedIndex`] and
//! persists it under a cache directory; the query phase reloads that snapshot
//! and answers keyword, term-frequency and IDF queries against it.

pub mod config;
pub mod corpus;
pub mod error;
pub mod index;
pub mod persist;
pub mod scorer;
pub mod search;
pub mod snapshot;
pub mod tokenizer;

pub use config::Settings;
pub use error::{Result, SearchError};
pub use index::{DocId, Document, IndexState, InvertedIndex};
pub use scorer::Scorer;
pub use search::{QueryEngine, ScoredDocument, DEFAULT_MAX_RESULTS};
pub use snapshot::IndexHandle;
pub use tokenizer::{Tokenizer, TokenizerConfig};
