use crate::working_set::{EntryStatus, WorkingSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditPattern,
    AddPath,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub total: usize,
    pub pending: usize,
    pub named: usize,
    pub renamed: usize,
    pub failed: usize,
}

impl ProcessingStats {
    pub fn from_working_set(working_set: &WorkingSet) -> Self {
        Self {
            total: working_set.len(),
            pending: working_set.count(EntryStatus::Idle) + working_set.count(EntryStatus::Processing),
            named: working_set.count(EntryStatus::Done),
            renamed: working_set.count(EntryStatus::Success),
            failed: working_set.count(EntryStatus::Error),
        }
    }

    /// Entries the next apply would touch.
    pub fn renameable(&self) -> usize {
        self.total - self.renamed
    }
}
