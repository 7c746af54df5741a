use std::path::PathBuf;

/// Errors surfaced by the build and query phases.
///
/// Absence of a term or document is never an error: lookups return empty
/// results or zero counts instead.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid query {input:?}: {reason}")]
    InvalidQuery { input: String, reason: String },

    #[error("corpus unavailable at {}: {reason}", path.display())]
    CorpusUnavailable { path: PathBuf, reason: String },

    #[error("index not built: {} is missing, run `build` first", path.display())]
    IndexNotBuilt { path: PathBuf },

    #[error("cannot write index cache at {}: {source}", path.display())]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("incompatible index cache at {}: {reason}", path.display())]
    IncompatibleCache { path: PathBuf, reason: String },
}

impl SearchError {
    pub(crate) fn invalid_query(input: &str, reason: impl Into<String>) -> Self {
        SearchError::InvalidQuery { input: input.to_string(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
