use crate::index::InvertedIndex;
use parking_lot::RwLock;
use std::sync::Arc;

/// Shares the current index between query threads.
///
/// Readers take an `Arc` to the snapshot and keep it for as long as they
/// need; a rebuild swaps in a new snapshot without disturbing them.
#[derive(Debug)]
pub struct IndexHandle {
    current: RwLock<Arc<InvertedIndex>>,
}

impl IndexHandle {
    pub fn new(index: InvertedIndex) -> Self {
        Self { current: RwLock::new(Arc::new(index)) }
    }

    pub fn current(&self) -> Arc<InvertedIndex> {
        Arc::clone(&self.current.read())
    }

    /// Install a new snapshot and return the one it replaced.
    pub fn replace(&self, index: InvertedIndex) -> Arc<InvertedIndex> {
        let next = Arc::new(index);
        let previous = std::mem::replace(&mut *self.current.write(), next);
        tracing::info!(
            num_docs = previous.num_docs(),
            "replaced index snapshot"
        );
        previous
    }
}
