//! Image renaming: pattern-based names or labels from a local vision model,
//! previewed and then applied as in-place renames with per-file results.

pub mod cli;
pub mod config;
pub mod error;
pub mod inference;
pub mod logging;
pub mod naming;
pub mod orchestrator;
pub mod rename_engine;
pub mod sanitizer;
pub mod selection;
pub mod tui;
pub mod working_set;

pub use error::{InferenceError, OrchestratorError, RenameError, SanitizeError, SelectionError};
pub use inference::{Availability, InferenceClient, InferenceConfig, OllamaClient};
pub use naming::{NamingContext, RenameMode, compute_name};
pub use orchestrator::{ApplySummary, GenerateSummary, Orchestrator, Progress, StepOutcome};
pub use rename_engine::{RenameEngine, RenameOutcome, RenamePair};
pub use sanitizer::sanitize;
pub use working_set::{EntryStatus, FileEntry, WorkingSet};
