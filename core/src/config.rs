use crate::persist::IndexPaths;
use std::path::{Path, PathBuf};

/// Where the corpus lives and where the index snapshot is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self { data_dir: PathBuf::from("data"), cache_dir: PathBuf::from("cache") }
    }
}

impl Settings {
    pub fn new<D: AsRef<Path>, C: AsRef<Path>>(data_dir: D, cache_dir: C) -> Self {
        Self { data_dir: data_dir.as_ref().to_path_buf(), cache_dir: cache_dir.as_ref().to_path_buf() }
    }

    pub fn movies_path(&self) -> PathBuf {
        self.data_dir.join("movies.json")
    }

    pub fn stop_words_path(&self) -> PathBuf {
        self.data_dir.join("stopwords.txt")
    }

    pub fn index_paths(&self) -> IndexPaths {
        IndexPaths::new(&self.cache_dir)
    }
}
