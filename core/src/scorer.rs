//! Term frequency and inverse document frequency over a built index.
//!
//! These are the primitives a ranking function is layered on. Keyword
//! [`search`](crate::search::QueryEngine::search) does not use them; the
//! ranked variant combines them as plain TF x IDF.

use crate::error::Result;
use crate::index::{DocId, InvertedIndex};

/// Smoothed IDF: `ln((n + 1) / (df + 1))`.
///
/// Finite for every `df`, zero when the term is in every document.
pub fn smoothed_idf(num_docs: usize, doc_freq: usize) -> f64 {
    ((num_docs as f64 + 1.0) / (doc_freq as f64 + 1.0)).ln()
}

#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    index: &'a InvertedIndex,
}

impl<'a> Scorer<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self {
        Self { index }
    }

    pub fn term_frequency(&self, doc_id: DocId, term: &str) -> Result<u32> {
        let term = self.index.tokenizer().single_term(term)?;
        Ok(self.index.raw_term_frequency(doc_id, &term))
    }

    pub fn inverse_document_frequency(&self, term: &str) -> Result<f64> {
        let term = self.index.tokenizer().single_term(term)?;
        Ok(self.idf_of(&term))
    }

    pub fn tf_idf(&self, doc_id: DocId, term: &str) -> Result<f64> {
        let term = self.index.tokenizer().single_term(term)?;
        Ok(self.tf_idf_of(doc_id, &term))
    }

    /// IDF of an already-normalized term.
    pub(crate) fn idf_of(&self, term: &str) -> f64 {
        smoothed_idf(self.index.num_docs(), self.index.document_frequency(term))
    }

    /// TF x IDF of an already-normalized term.
    pub(crate) fn tf_idf_of(&self, doc_id: DocId, term: &str) -> f64 {
        self.index.raw_term_frequency(doc_id, term) as f64 * self.idf_of(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Document;
    use crate::tokenizer::{Tokenizer, TokenizerConfig};
    use std::sync::Arc;

    fn index() -> InvertedIndex {
        let docs = vec![
            Document { id: 1, title: "Jaws".into(), description: "shark shark beach".into() },
            Document { id: 2, title: "Deep Blue Sea".into(), description: "shark lab".into() },
            Document { id: 3, title: "Heat".into(), description: "bank robbery".into() },
        ];
        InvertedIndex::build(Arc::new(Tokenizer::new(TokenizerConfig::default())), docs)
    }

    #[test]
    fn idf_is_zero_when_every_document_has_the_term() {
        assert_eq!(smoothed_idf(2, 2), 0.0);
        assert_eq!(smoothed_idf(0, 0), 0.0);
    }

    #[test]
    fn idf_never_increases_with_document_frequency() {
        let values: Vec<f64> = (0..=10).map(|df| smoothed_idf(10, df)).collect();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
        assert!(values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn unseen_term_gets_the_largest_idf() {
        let idx = index();
        let scorer = Scorer::new(&idx);
        let unseen = scorer.inverse_document_frequency("zebra").unwrap();
        assert!((unseen - 4f64.ln()).abs() < 1e-12);
        assert!(unseen > scorer.inverse_document_frequency("shark").unwrap());
    }

    #[test]
    fn tf_idf_multiplies_the_primitives() {
        let idx = index();
        let scorer = Scorer::new(&idx);
        let expected = 2.0 * (4.0f64 / 3.0).ln();
        assert!((scorer.tf_idf(1, "sharks").unwrap() - expected).abs() < 1e-12);
        assert_eq!(scorer.tf_idf(3, "shark").unwrap(), 0.0);
    }
}
