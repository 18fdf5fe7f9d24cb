use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Idle,
    Processing,
    Done,
    Error,
    Success,
}

impl EntryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EntryStatus::Idle => "IDLE",
            EntryStatus::Processing => "PROCESSING",
            EntryStatus::Done => "DONE",
            EntryStatus::Error => "ERROR",
            EntryStatus::Success => "RENAMED",
        }
    }
}

/// One file the user picked. The original path doubles as the entry id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    original_path: PathBuf,
    proposed_name: String,
    status: EntryStatus,
    error_message: Option<String>,
}

impl FileEntry {
    pub fn new(original_path: PathBuf) -> Self {
        let proposed_name = original_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            original_path,
            proposed_name,
            status: EntryStatus::Idle,
            error_message: None,
        }
    }

    pub fn id(&self) -> &Path {
        &self.original_path
    }

    pub fn original_path(&self) -> &Path {
        &self.original_path
    }

    pub fn original_name(&self) -> String {
        self.original_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn proposed_name(&self) -> &str {
        &self.proposed_name
    }

    pub fn status(&self) -> EntryStatus {
        self.status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Renamed on disk; the entry is a historical record from here on.
    pub fn is_settled(&self) -> bool {
        self.status == EntryStatus::Success
    }

    pub fn needs_rename(&self) -> bool {
        self.proposed_name != self.original_name()
    }

    /// Returns false when the entry is settled or the name would escape the
    /// parent directory.
    pub(crate) fn set_proposed_name(&mut self, name: String) -> bool {
        if self.is_settled() || name.contains(['/', '\\']) {
            return false;
        }
        self.proposed_name = name;
        true
    }

    pub(crate) fn mark(&mut self, status: EntryStatus) {
        if self.is_settled() {
            return;
        }
        self.status = status;
        if status != EntryStatus::Error {
            self.error_message = None;
        }
    }

    pub(crate) fn mark_error(&mut self, message: impl Into<String>) {
        if self.is_settled() {
            return;
        }
        self.status = EntryStatus::Error;
        self.error_message = Some(message.into());
    }
}

/// Ordered collection of entries with no duplicate ids.
#[derive(Debug, Default)]
pub struct WorkingSet {
    entries: Vec<FileEntry>,
    ids: HashSet<PathBuf>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the path unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        if !self.ids.insert(path.clone()) {
            return false;
        }
        self.entries.push(FileEntry::new(path));
        true
    }

    pub fn remove(&mut self, id: &Path) -> bool {
        if !self.ids.remove(id) {
            return false;
        }
        self.entries.retain(|entry| entry.id() != id);
        true
    }

    pub fn contains(&self, id: &Path) -> bool {
        self.ids.contains(id)
    }

    pub fn get(&self, id: &Path) -> Option<&FileEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: &Path) -> Option<&mut FileEntry> {
        self.entries.iter_mut().find(|entry| entry.id() == id)
    }

    pub fn position(&self, id: &Path) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id() == id)
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [FileEntry] {
        &mut self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, status: EntryStatus) -> usize {
        self.entries.iter().filter(|entry| entry.status() == status).count()
    }
}
