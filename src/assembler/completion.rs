use std::collections::HashMap;
use std::path::PathBuf;

use derive_more::Display;
use tracing::debug;

/// Identifies a record for the lifetime of one assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("#{_0}")]
pub struct RecordId(pub(crate) u64);

/// Bookkeeping of deferred records still waiting for their metadata.
///
/// [`CompletionTracker::try_complete`] is the only place where the tracker
/// becomes complete: it succeeds once input has ended and nothing is pending,
/// and never succeeds again afterwards.
#[derive(Debug, Default)]
pub struct CompletionTracker {
    pending: HashMap<RecordId, PathBuf>,
    input_ended: bool,
    completed: bool,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: RecordId, path: PathBuf) {
        debug!("Record {} ({}) is pending", id, path.display());
        self.pending.insert(id, path);
    }

    /// Marks `id` as inserted. Returns `false` if it was not pending.
    pub fn resolve(&mut self, id: RecordId) -> bool {
        match self.pending.remove(&id) {
            Some(path) => {
                debug!(
                    "Record {} ({}) settled, {} still pending",
                    id,
                    path.display(),
                    self.pending.len()
                );
                true
            }
            None => false,
        }
    }

    pub fn end_input(&mut self) {
        self.input_ended = true;
    }

    pub fn try_complete(&mut self) -> bool {
        if self.completed || !self.input_ended || !self.pending.is_empty() {
            return false;
        }
        self.completed = true;
        true
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Paths of the records still pending, in arrival order.
    pub fn pending_paths(&self) -> Vec<PathBuf> {
        let mut pending: Vec<_> = self.pending.iter().collect();
        pending.sort_by_key(|(id, _)| **id);
        pending.into_iter().map(|(_, path)| path.clone()).collect()
    }
}
