use std::fs::Metadata;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::RenameError;

/// One requested rename: the file stays in its directory, only the name changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePair {
    pub original_path: PathBuf,
    pub new_name: String,
}

impl RenamePair {
    pub fn new(original_path: impl Into<PathBuf>, new_name: impl Into<String>) -> Self {
        Self {
            original_path: original_path.into(),
            new_name: new_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    pub original_path: PathBuf,
    pub new_name: String,
    pub result: Result<PathBuf, RenameError>,
}

impl RenameOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error_message(&self) -> Option<String> {
        self.result.as_ref().err().map(|e| e.to_string())
    }
}

/// Applies rename batches. A failed pair never stops the rest of the batch
/// and nothing is rolled back.
#[derive(Debug, Default, Clone, Copy)]
pub struct RenameEngine;

impl RenameEngine {
    pub fn new() -> Self {
        Self
    }

    pub async fn rename_file(&self, pair: &RenamePair) -> RenameOutcome {
        let result = rename_in_place(&pair.original_path, &pair.new_name).await;

        match &result {
            Ok(target) => info!("Renamed {} -> {}", pair.original_path.display(), target.display()),
            Err(e) => warn!("Failed to rename {}: {}", pair.original_path.display(), e),
        }

        RenameOutcome {
            original_path: pair.original_path.clone(),
            new_name: pair.new_name.clone(),
            result,
        }
    }

    /// One outcome per pair, in input order.
    pub async fn rename_files(&self, pairs: &[RenamePair]) -> Vec<RenameOutcome> {
        let mut results = Vec::with_capacity(pairs.len());

        for pair in pairs {
            results.push(self.rename_file(pair).await);
        }

        results
    }
}

/// Target path for `new_name` next to `original`. Rejects names that would
/// leave the directory.
pub fn sibling_path(original: &Path, new_name: &str) -> Result<PathBuf, RenameError> {
    if new_name.is_empty()
        || new_name == "."
        || new_name == ".."
        || new_name.contains(['/', '\\'])
    {
        return Err(RenameError::InvalidName(new_name.to_string()));
    }

    let parent = original.parent().unwrap_or_else(|| Path::new(""));
    Ok(parent.join(new_name))
}

async fn rename_in_place(original: &Path, new_name: &str) -> Result<PathBuf, RenameError> {
    // Unchanged names succeed even when the original itself would not pass
    // `sibling_path`, e.g. a Unix name containing a backslash.
    if original.file_name().is_some_and(|name| name == new_name) {
        return match tokio::fs::symlink_metadata(original).await {
            Ok(_) => Ok(original.to_path_buf()),
            Err(e) => Err(classify(e.kind(), original, original, e.to_string())),
        };
    }

    let target = sibling_path(original, new_name)?;

    // fs::rename silently replaces an existing target on Unix.
    match tokio::fs::symlink_metadata(&target).await {
        Ok(existing) => {
            let source = tokio::fs::symlink_metadata(original)
                .await
                .map_err(|e| classify(e.kind(), original, &target, e.to_string()))?;
            if !is_case_change(original, &target) || !same_file(&source, &existing) {
                return Err(RenameError::AlreadyExists(target));
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(classify(e.kind(), original, &target, e.to_string())),
    }

    tokio::fs::rename(original, &target)
        .await
        .map_err(|e| classify(e.kind(), original, &target, e.to_string()))?;

    Ok(target)
}

/// On a case-insensitive filesystem the target of `Cat.jpg -> cat.jpg` is
/// the source itself.
fn is_case_change(original: &Path, target: &Path) -> bool {
    match (original.file_name(), target.file_name()) {
        (Some(from), Some(to)) => {
            from != to && from.to_string_lossy().to_lowercase() == to.to_string_lossy().to_lowercase()
        }
        _ => false,
    }
}

#[cfg(unix)]
fn same_file(a: &Metadata, b: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_file(a: &Metadata, b: &Metadata) -> bool {
    a.len() == b.len() && a.modified().ok() == b.modified().ok() && a.created().ok() == b.created().ok()
}

fn classify(kind: ErrorKind, original: &Path, target: &Path, message: String) -> RenameError {
    match kind {
        ErrorKind::NotFound => RenameError::SourceNotFound(original.to_path_buf()),
        ErrorKind::PermissionDenied => RenameError::NoPermission(original.to_path_buf()),
        ErrorKind::AlreadyExists => RenameError::AlreadyExists(target.to_path_buf()),
        _ => RenameError::Other(message),
    }
}
