use crate::error::Result;
use crate::scorer::Scorer;
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

pub type DocId = u32;

/// A movie record as supplied by the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub description: String,
}

impl Document {
    /// Text that gets indexed: title and description joined by a space.
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// The three mappings that make up an index. Built or loaded together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexState {
    /// term -> ids of documents containing it
    pub postings: HashMap<String, BTreeSet<DocId>>,
    /// id -> document
    pub docmap: HashMap<DocId, Document>,
    /// id -> (term -> occurrences in that document)
    pub term_frequencies: HashMap<DocId, HashMap<String, u32>>,
}

impl IndexState {
    /// Check that the mappings agree with each other.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let posted: HashSet<DocId> = self.postings.values().flatten().copied().collect();
        for id in self.docmap.keys().filter(|id| !posted.contains(id)) {
            // A document that tokenizes to nothing has no postings at all.
            if self.term_frequencies.get(id).is_some_and(|tf| !tf.is_empty()) {
                return Err(format!("document {id} has term counts but no postings"));
            }
        }
        if let Some(id) = posted.iter().find(|id| !self.docmap.contains_key(id)) {
            return Err(format!("posting references unknown document {id}"));
        }
        for (id, counts) in &self.term_frequencies {
            for (term, &count) in counts {
                let posted = self.postings.get(term).is_some_and(|docs| docs.contains(id));
                if count == 0 || !posted {
                    return Err(format!("term {term:?} counted in document {id} but not posted"));
                }
            }
        }
        Ok(())
    }
}

/// Immutable inverted index over a document set.
///
/// A rebuild produces a new value; nothing mutates an index once built or
/// loaded, so it can be shared across threads behind an `Arc`.
#[derive(Debug)]
pub struct InvertedIndex {
    state: IndexState,
    tokenizer: Arc<Tokenizer>,
}

impl InvertedIndex {
    pub fn build<I>(tokenizer: Arc<Tokenizer>, documents: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        let mut state = IndexState::default();
        for doc in documents {
            if state.docmap.contains_key(&doc.id) {
                tracing::warn!(doc_id = doc.id, title = %doc.title, "skipping duplicate document id");
                continue;
            }
            let tokens = tokenizer.tokenize(&doc.combined_text());
            let counts = state.term_frequencies.entry(doc.id).or_default();
            for token in tokens {
                *counts.entry(token).or_insert(0) += 1;
            }
            for token in counts.keys() {
                state.postings.entry(token.clone()).or_default().insert(doc.id);
            }
            state.docmap.insert(doc.id, doc);
        }
        tracing::info!(
            num_docs = state.docmap.len(),
            num_terms = state.postings.len(),
            "built inverted index"
        );
        Self { state, tokenizer }
    }

    /// Wrap previously persisted state. The tokenizer must match the one the
    /// state was built with for lookups to find anything.
    pub fn from_state(tokenizer: Arc<Tokenizer>, state: IndexState) -> Self {
        Self { state, tokenizer }
    }

    pub fn state(&self) -> &IndexState {
        &self.state
    }

    pub fn into_state(self) -> IndexState {
        self.state
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn num_docs(&self) -> usize {
        self.state.docmap.len()
    }

    pub fn num_terms(&self) -> usize {
        self.state.postings.len()
    }

    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        self.state.docmap.get(&doc_id)
    }

    /// Ascending ids of documents containing an already-normalized term.
    pub fn postings(&self, term: &str) -> impl Iterator<Item = DocId> + '_ {
        self.state.postings.get(term).into_iter().flatten().copied()
    }

    /// Number of documents containing an already-normalized term.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.state.postings.get(term).map_or(0, BTreeSet::len)
    }

    /// Occurrences of an already-normalized term in a document.
    pub fn raw_term_frequency(&self, doc_id: DocId, term: &str) -> u32 {
        self.state
            .term_frequencies
            .get(&doc_id)
            .and_then(|counts| counts.get(term))
            .copied()
            .unwrap_or(0)
    }

    /// Sorted ids of documents containing `term`, which must normalize to a
    /// single term.
    pub fn get_documents(&self, term: &str) -> Result<Vec<DocId>> {
        let term = self.tokenizer.single_term(term)?;
        Ok(self.postings(&term).collect())
    }

    pub fn get_term_frequency(&self, doc_id: DocId, term: &str) -> Result<u32> {
        Scorer::new(self).term_frequency(doc_id, term)
    }

    pub fn get_inverse_document_frequency(&self, term: &str) -> Result<f64> {
        Scorer::new(self).inverse_document_frequency(term)
    }
}
