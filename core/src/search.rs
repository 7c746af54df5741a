use crate::error::{Result, SearchError};
use crate::index::{DocId, Document, InvertedIndex};
use crate::scorer::Scorer;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};

pub const DEFAULT_MAX_RESULTS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument<'a> {
    pub document: &'a Document,
    pub score: f64,
}

/// Answers free-text queries against a built index.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    index: &'a InvertedIndex,
}

impl<'a> QueryEngine<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self {
        Self { index }
    }

    /// Keyword search in query-term order.
    ///
    /// Walks each query term's posting list in ascending id order and keeps
    /// every document not already taken, stopping as soon as `max_results`
    /// documents are collected. Documents matching earlier query terms come
    /// first; no scores are computed.
    pub fn search(&self, query: &str, max_results: usize) -> Result<Vec<&'a Document>> {
        check_limit(query, max_results)?;
        let terms = self.index.tokenizer().tokenize(query);
        let mut seen: HashSet<DocId> = HashSet::new();
        let mut results = Vec::new();

        'terms: for term in &terms {
            for doc_id in self.index.postings(term) {
                if !seen.insert(doc_id) {
                    continue;
                }
                if let Some(doc) = self.index.document(doc_id) {
                    results.push(doc);
                }
                if results.len() >= max_results {
                    break 'terms;
                }
            }
        }
        tracing::debug!(query, terms = terms.len(), hits = results.len(), "keyword search");
        Ok(results)
    }

    /// Search ranked by the summed TF x IDF of the distinct query terms.
    ///
    /// Ties are broken by ascending document id.
    pub fn search_ranked(&self, query: &str, max_results: usize) -> Result<Vec<ScoredDocument<'a>>> {
        check_limit(query, max_results)?;
        let terms: BTreeSet<String> = self.index.tokenizer().tokenize(query).into_iter().collect();
        let scorer = Scorer::new(self.index);

        let mut scores: HashMap<DocId, f64> = HashMap::new();
        for term in &terms {
            for doc_id in self.index.postings(term) {
                *scores.entry(doc_id).or_insert(0.0) += scorer.tf_idf_of(doc_id, term);
            }
        }

        let mut ranked: Vec<(DocId, f64)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
        let total_hits = ranked.len();
        let results: Vec<ScoredDocument<'a>> = ranked
            .into_iter()
            .filter_map(|(doc_id, score)| {
                self.index.document(doc_id).map(|document| ScoredDocument { document, score })
            })
            .take(max_results)
            .collect();
        tracing::debug!(query, terms = terms.len(), total_hits, "ranked search");
        Ok(results)
    }
}

fn check_limit(query: &str, max_results: usize) -> Result<()> {
    if max_results == 0 {
        return Err(SearchError::invalid_query(query, "result limit must be at least 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{Tokenizer, TokenizerConfig};
    use std::sync::Arc;

    fn doc(id: DocId, title: &str, description: &str) -> Document {
        Document { id, title: title.into(), description: description.into() }
    }

    fn index() -> InvertedIndex {
        let docs = vec![
            doc(1, "Jaws", "a shark terrorizes a beach town"),
            doc(2, "Deep Blue Sea", "scientists breed smarter sharks, shark chaos"),
            doc(3, "Heat", "a bank robbery crew"),
            doc(4, "Point Break", "surfers rob a bank on the beach"),
        ];
        let tokenizer = Tokenizer::new(TokenizerConfig::with_stop_words(["a", "the", "on"]));
        InvertedIndex::build(Arc::new(tokenizer), docs)
    }

    fn ids(docs: &[&Document]) -> Vec<DocId> {
        docs.iter().map(|d| d.id).collect()
    }

    #[test]
    fn earlier_query_terms_take_precedence() {
        let idx = index();
        let engine = QueryEngine::new(&idx);
        assert_eq!(ids(&engine.search("bank shark", 5).unwrap()), vec![3, 4, 1, 2]);
        assert_eq!(ids(&engine.search("shark bank", 5).unwrap()), vec![1, 2, 3, 4]);
    }

    #[test]
    fn stops_at_the_limit() {
        let idx = index();
        let engine = QueryEngine::new(&idx);
        assert_eq!(ids(&engine.search("beach bank", 2).unwrap()), vec![1, 4]);
        assert_eq!(ids(&engine.search("beach bank", 1).unwrap()), vec![1]);
    }

    #[test]
    fn documents_are_never_repeated() {
        let idx = index();
        let engine = QueryEngine::new(&idx);
        assert_eq!(ids(&engine.search("beach beach beach", 5).unwrap()), vec![1, 4]);
    }

    #[test]
    fn empty_or_unknown_queries_return_nothing() {
        let idx = index();
        let engine = QueryEngine::new(&idx);
        assert!(engine.search("", 5).unwrap().is_empty());
        assert!(engine.search("the a on", 5).unwrap().is_empty());
        assert!(engine.search("zebra", 5).unwrap().is_empty());
    }

    #[test]
    fn zero_limit_is_rejected() {
        let idx = index();
        let engine = QueryEngine::new(&idx);
        assert!(matches!(engine.search("shark", 0), Err(SearchError::InvalidQuery { .. })));
        assert!(matches!(engine.search_ranked("shark", 0), Err(SearchError::InvalidQuery { .. })));
    }

    #[test]
    fn ranked_search_orders_by_tf_idf() {
        let idx = index();
        let engine = QueryEngine::new(&idx);
        let hits = engine.search_ranked("shark", 5).unwrap();
        let ranked: Vec<DocId> = hits.iter().map(|h| h.document.id).collect();
        // doc 2 mentions sharks twice
        assert_eq!(ranked, vec![2, 1]);
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn ranked_search_breaks_ties_by_id() {
        let idx = index();
        let engine = QueryEngine::new(&idx);
        let hits = engine.search_ranked("bank", 5).unwrap();
        assert_eq!(hits.iter().map(|h| h.document.id).collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(hits[0].score, hits[1].score);
    }
}
