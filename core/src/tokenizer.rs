use crate::error::{Result, SearchError};
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::fmt;

lazy_static! {
    // ASCII punctuation only: !"#$%&'()*+,-./:;<=>?@[\]^_`{|}~
    static ref PUNCT: Regex = Regex::new(r"[[:punct:]]").expect("valid regex");
}

/// Settings a [`Tokenizer`] is constructed from.
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    /// Words dropped before stemming. Compared against the lowercased,
    /// punctuation-stripped word.
    pub stop_words: HashSet<String>,
    /// Apply English Snowball stemming to surviving words.
    pub stemming: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self { stop_words: HashSet::new(), stemming: true }
    }
}

impl TokenizerConfig {
    pub fn with_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { stop_words: words.into_iter().map(Into::into).collect(), ..Self::default() }
    }
}

/// Turns raw text into index terms: lowercase, delete punctuation, split on
/// whitespace, drop stop words, stem.
pub struct Tokenizer {
    stop_words: HashSet<String>,
    stemmer: Option<Stemmer>,
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("stop_words", &self.stop_words.len())
            .field("stemming", &self.stemmer.is_some())
            .finish()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(TokenizerConfig::default())
    }
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        let stemmer = config.stemming.then(|| Stemmer::create(Algorithm::English));
        Self { stop_words: config.stop_words, stemmer }
    }

    pub fn stop_words(&self) -> &HashSet<String> {
        &self.stop_words
    }

    /// Lowercase and delete punctuation. Deleted characters leave no gap, so
    /// "it's" becomes "its".
    fn sanitize(text: &str) -> String {
        PUNCT.replace_all(&text.to_lowercase(), "").into_owned()
    }

    fn keep(&self, word: &str) -> bool {
        !word.is_empty() && !self.stop_words.contains(word)
    }

    fn stem(&self, word: &str) -> String {
        match &self.stemmer {
            Some(stemmer) => stemmer.stem(word).into_owned(),
            None => word.to_string(),
        }
    }

    /// Tokenize text into an ordered sequence of terms. Duplicates are kept.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        Self::sanitize(text)
            .split_whitespace()
            .filter(|word| self.keep(word))
            .map(|word| self.stem(word))
            .collect()
    }

    /// Normalize input that must name exactly one term.
    ///
    /// Fails unless the input is a single word after punctuation removal and
    /// that word is not a stop word.
    pub fn single_term(&self, text: &str) -> Result<String> {
        let sanitized = Self::sanitize(text);
        let words: Vec<&str> = sanitized.split_whitespace().collect();
        match words.as_slice() {
            [word] if self.keep(word) => Ok(self.stem(word)),
            [_] => Err(SearchError::invalid_query(text, "the only word is a stop word")),
            [] => Err(SearchError::invalid_query(text, "no words to look up")),
            many => Err(SearchError::invalid_query(
                text,
                format!("expected a single word, got {}", many.len()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> Tokenizer {
        Tokenizer::new(TokenizerConfig::with_stop_words(["a", "the", "is"]))
    }

    #[test]
    fn basic_tokenize() {
        let t = tokenizer().tokenize("Running, runner's run!");
        assert!(t.iter().any(|w| w == "run"));
    }

    #[test]
    fn punctuation_is_deleted_not_replaced() {
        let plain = Tokenizer::new(TokenizerConfig { stemming: false, ..tokenizer_config() });
        assert_eq!(plain.tokenize("it's well-known"), vec!["its", "wellknown"]);
    }

    #[test]
    fn stop_words_are_checked_before_stemming() {
        let t = Tokenizer::new(TokenizerConfig::with_stop_words(["running"]));
        assert!(t.tokenize("running").is_empty());
        assert_eq!(t.tokenize("runs"), vec!["run"]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(tokenizer().tokenize("").is_empty());
        assert!(tokenizer().tokenize("  \t\n ").is_empty());
        assert!(tokenizer().tokenize("... !!").is_empty());
    }

    #[test]
    fn single_term_rejects_everything_but_one_word() {
        let t = tokenizer();
        assert_eq!(t.single_term("Simulations").unwrap(), "simul");
        assert!(matches!(t.single_term("the matrix"), Err(SearchError::InvalidQuery { .. })));
        assert!(matches!(t.single_term("the"), Err(SearchError::InvalidQuery { .. })));
        assert!(matches!(t.single_term("   "), Err(SearchError::InvalidQuery { .. })));
    }

    fn tokenizer_config() -> TokenizerConfig {
        TokenizerConfig::with_stop_words(["a", "the", "is"])
    }
}
