//! On-disk index snapshot.
//!
//! Each mapping is a blob file: `[b"MDX\0"][u32 LE format version][bincode]`.
//! `meta.json` is written last and records the format version plus a CRC32
//! of every blob, so a snapshot left half-written by an interrupted save, or
//! produced by another format version, is refused at load.

use crate::error::{Result, SearchError};
use crate::index::{DocId, Document, IndexState};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs::{self, create_dir_all};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 1;
const MAGIC: &[u8; 4] = b"MDX\0";
const HEADER_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksums {
    pub postings: u32,
    pub docmap: u32,
    pub term_frequencies: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaFile {
    pub version: u32,
    pub created_at: String,
    pub num_docs: u32,
    pub num_terms: u32,
    pub checksums: Checksums,
}

#[derive(Debug, Clone)]
pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn postings(&self) -> PathBuf { self.root.join("postings.bin") }
    pub fn docmap(&self) -> PathBuf { self.root.join("docmap.bin") }
    pub fn term_frequencies(&self) -> PathBuf { self.root.join("term_frequencies.bin") }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

/// Write all three mappings and the manifest, replacing any previous snapshot.
pub fn save_index(paths: &IndexPaths, state: &IndexState) -> Result<MetaFile> {
    create_dir_all(&paths.root).map_err(|source| cache_write(&paths.root, source))?;

    let checksums = Checksums {
        postings: save_blob(&paths.postings(), &state.postings)?,
        docmap: save_blob(&paths.docmap(), &state.docmap)?,
        term_frequencies: save_blob(&paths.term_frequencies(), &state.term_frequencies)?,
    };
    let meta = MetaFile {
        version: FORMAT_VERSION,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
        num_docs: state.docmap.len() as u32,
        num_terms: state.postings.len() as u32,
        checksums,
    };
    save_meta(paths, &meta)?;

    tracing::info!(
        root = %paths.root.display(),
        num_docs = meta.num_docs,
        num_terms = meta.num_terms,
        "saved index snapshot"
    );
    Ok(meta)
}

/// Read a snapshot written by [`save_index`].
pub fn load_index(paths: &IndexPaths) -> Result<IndexState> {
    let meta = load_meta(paths)?;
    if meta.version != FORMAT_VERSION {
        return Err(incompatible(
            &paths.meta(),
            format!("format version {} (expected {FORMAT_VERSION})", meta.version),
        ));
    }

    let postings: HashMap<String, BTreeSet<DocId>> =
        load_blob(&paths.postings(), meta.checksums.postings)?;
    let docmap: HashMap<DocId, Document> = load_blob(&paths.docmap(), meta.checksums.docmap)?;
    let term_frequencies: HashMap<DocId, HashMap<String, u32>> =
        load_blob(&paths.term_frequencies(), meta.checksums.term_frequencies)?;

    let state = IndexState { postings, docmap, term_frequencies };
    if state.docmap.len() != meta.num_docs as usize || state.postings.len() != meta.num_terms as usize {
        return Err(incompatible(&paths.meta(), "manifest counts do not match the snapshot"));
    }
    state.validate().map_err(|reason| incompatible(&paths.root, reason))?;

    tracing::info!(
        root = %paths.root.display(),
        num_docs = meta.num_docs,
        num_terms = meta.num_terms,
        created_at = %meta.created_at,
        "loaded index snapshot"
    );
    Ok(state)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    let path = paths.meta();
    let json = serde_json::to_string_pretty(meta)
        .map_err(|e| cache_write(&path, io::Error::new(ErrorKind::InvalidData, e)))?;
    fs::write(&path, json).map_err(|source| cache_write(&path, source))
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let path = paths.meta();
    let buf = read_file(&path)?;
    serde_json::from_slice(&buf).map_err(|e| incompatible(&path, e.to_string()))
}

fn save_blob<T: Serialize>(path: &Path, value: &T) -> Result<u32> {
    let payload = bincode::serialize(value)
        .map_err(|e| cache_write(path, io::Error::new(ErrorKind::InvalidData, e.to_string())))?;
    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&payload);
    fs::write(path, &bytes).map_err(|source| cache_write(path, source))?;
    Ok(crc32fast::hash(&bytes))
}

fn load_blob<T: DeserializeOwned>(path: &Path, expected_crc: u32) -> Result<T> {
    let bytes = read_file(path)?;
    let actual_crc = crc32fast::hash(&bytes);
    if actual_crc != expected_crc {
        return Err(incompatible(
            path,
            format!("checksum {actual_crc:#010x} does not match manifest {expected_crc:#010x}"),
        ));
    }
    if bytes.len() < HEADER_LEN || &bytes[..4] != MAGIC {
        return Err(incompatible(path, "not an index blob"));
    }
    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version != FORMAT_VERSION {
        return Err(incompatible(path, format!("format version {version} (expected {FORMAT_VERSION})")));
    }
    bincode::deserialize(&bytes[HEADER_LEN..]).map_err(|e| incompatible(path, e.to_string()))
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SearchError::IndexNotBuilt { path: path.to_path_buf() },
        _ => incompatible(path, e.to_string()),
    })
}

fn cache_write(path: &Path, source: io::Error) -> SearchError {
    SearchError::CacheWrite { path: path.to_path_buf(), source }
}

fn incompatible(path: &Path, reason: impl Into<String>) -> SearchError {
    SearchError::IncompatibleCache { path: path.to_path_buf(), reason: reason.into() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_header_is_checked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        let crc = save_blob(&path, &vec![1u32, 2, 3]).unwrap();
        let back: Vec<u32> = load_blob(&path, crc).unwrap();
        assert_eq!(back, vec![1, 2, 3]);

        let mut bytes = fs::read(&path).unwrap();
        bytes[4] = 9;
        fs::write(&path, &bytes).unwrap();
        let crc = crc32fast::hash(&bytes);
        let err = load_blob::<Vec<u32>>(&path, crc).unwrap_err();
        assert!(err.to_string().contains("format version 9"));
    }

    #[test]
    fn missing_blob_means_not_built() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_blob::<Vec<u32>>(&dir.path().join("nope.bin"), 0).unwrap_err();
        assert!(matches!(err, SearchError::IndexNotBuilt { .. }));
    }
}
