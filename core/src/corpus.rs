use crate::error::{Result, SearchError};
use crate::index::Document;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct MovieFile {
    movies: Vec<Document>,
}

/// Read `{"movies": [{"id", "title", "description"}, ...]}`. Extra fields on
/// each movie are ignored; ids must be unique.
pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    let text = fs::read_to_string(path).map_err(|e| unavailable(path, e.to_string()))?;
    let file: MovieFile = serde_json::from_str(&text).map_err(|e| unavailable(path, e.to_string()))?;

    let mut ids = HashSet::with_capacity(file.movies.len());
    if let Some(dup) = file.movies.iter().find(|m| !ids.insert(m.id)) {
        return Err(unavailable(path, format!("duplicate document id {}", dup.id)));
    }
    tracing::info!(path = %path.display(), documents = file.movies.len(), "loaded corpus");
    Ok(file.movies)
}

/// Read a newline-delimited stop-word list.
pub fn load_stop_words(path: &Path) -> Result<HashSet<String>> {
    let text = fs::read_to_string(path).map_err(|e| unavailable(path, e.to_string()))?;
    let words: HashSet<String> = text
        .lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    tracing::debug!(path = %path.display(), words = words.len(), "loaded stop words");
    Ok(words)
}

fn unavailable(path: &Path, reason: String) -> SearchError {
    SearchError::CorpusUnavailable { path: path.to_path_buf(), reason }
}
