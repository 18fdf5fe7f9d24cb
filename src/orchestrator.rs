//! Drives the working set through the generate and apply phases.
//!
//! Generate (model mode) walks the entries one at a time so that only one
//! inference request is ever in flight; apply hands every unsettled entry to
//! the [`RenameEngine`] in a single batch. Failures are recorded on the entry
//! they belong to and never stop the phase.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::OrchestratorError;
use crate::inference::{DESCRIBE_PROMPT, InferenceClient};
use crate::naming::{NamingContext, RenameMode, compute_name};
use crate::rename_engine::{RenameEngine, RenamePair};
use crate::sanitizer::sanitize;
use crate::working_set::{EntryStatus, FileEntry, WorkingSet};

const UNUSABLE_NAME: &str = "name contains a path separator";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// `completed / total` rounded to the nearest whole percent. An empty
    /// batch counts as complete.
    pub fn percent(&self) -> u16 {
        if self.total == 0 {
            return 100;
        }
        ((self.completed * 100 + self.total / 2) / self.total) as u16
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// One more entry finished; more remain.
    Progressed(Progress),
    /// The last entry finished.
    Finished(GenerateSummary),
    /// No generate run is active.
    Idle,
}

#[derive(Debug)]
struct GenerateRun {
    queue: VecDeque<PathBuf>,
    total: usize,
    succeeded: usize,
    failed: usize,
}

impl GenerateRun {
    fn progress(&self) -> Progress {
        Progress {
            completed: self.succeeded + self.failed,
            total: self.total,
        }
    }

    fn summary(&self, cancelled: bool) -> GenerateSummary {
        GenerateSummary {
            total: self.total,
            succeeded: self.succeeded,
            failed: self.failed,
            cancelled,
        }
    }
}

#[derive(Debug, Default)]
pub struct Orchestrator {
    working_set: WorkingSet,
    mode: RenameMode,
    pattern: String,
    engine: RenameEngine,
    run: Option<GenerateRun>,
}

impl Orchestrator {
    pub fn new(mode: RenameMode, pattern: impl Into<String>) -> Self {
        Self {
            mode,
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    pub fn working_set(&self) -> &WorkingSet {
        &self.working_set
    }

    pub fn entries(&self) -> &[FileEntry] {
        self.working_set.entries()
    }

    pub fn mode(&self) -> RenameMode {
        self.mode
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_generating(&self) -> bool {
        self.run.is_some()
    }

    pub fn progress(&self) -> Option<Progress> {
        self.run.as_ref().map(GenerateRun::progress)
    }

    /// Adds paths not already present and returns how many were added. In
    /// pattern modes the new entries get their pattern name right away.
    pub fn add_paths<I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut added = 0;
        for path in paths {
            if !self.working_set.insert(path.clone()) {
                debug!("Skipping duplicate {}", path.display());
                continue;
            }
            added += 1;

            if self.mode.is_pattern_based() {
                let index = self.working_set.len() - 1;
                if let Some(entry) = self.working_set.get_mut(&path) {
                    let context = NamingContext {
                        index,
                        user_pattern: &self.pattern,
                        model_output: None,
                    };
                    let name = compute_name(entry, self.mode, context);
                    if !entry.set_proposed_name(name) {
                        entry.mark_error(UNUSABLE_NAME);
                    }
                }
            }
        }

        if added > 0 {
            info!("Added {} file(s), working set now {}", added, self.working_set.len());
        }
        added
    }

    pub fn remove(&mut self, id: &Path) -> Result<(), OrchestratorError> {
        self.ensure_idle()?;
        if !self.working_set.remove(id) {
            return Err(OrchestratorError::UnknownEntry(id.to_path_buf()));
        }
        // Counter names follow positions, which just shifted.
        if self.mode.is_pattern_based() {
            self.refresh_pattern_names();
        }
        Ok(())
    }

    pub fn set_mode(&mut self, mode: RenameMode) -> Result<(), OrchestratorError> {
        self.ensure_idle()?;
        self.mode = mode;
        if mode.is_pattern_based() {
            self.refresh_pattern_names();
        }
        Ok(())
    }

    pub fn set_pattern(&mut self, pattern: impl Into<String>) -> Result<(), OrchestratorError> {
        self.ensure_idle()?;
        self.pattern = pattern.into();
        if self.mode.uses_user_pattern() {
            self.refresh_pattern_names();
        }
        Ok(())
    }

    /// Recomputes names for every unsettled entry from the current mode and
    /// pattern. A fresh proposal clears any earlier error.
    fn refresh_pattern_names(&mut self) {
        let mode = self.mode;
        for (index, entry) in self.working_set.entries_mut().iter_mut().enumerate() {
            if entry.is_settled() {
                continue;
            }
            let context = NamingContext {
                index,
                user_pattern: &self.pattern,
                model_output: None,
            };
            let name = compute_name(entry, mode, context);
            if entry.set_proposed_name(name) {
                entry.mark(EntryStatus::Idle);
            } else {
                entry.mark_error(UNUSABLE_NAME);
            }
        }
    }

    fn ensure_idle(&self) -> Result<(), OrchestratorError> {
        if self.run.is_some() {
            return Err(OrchestratorError::PhaseInProgress);
        }
        Ok(())
    }

    /// Starts the generate phase.
    ///
    /// Pattern modes (and model mode with nothing to do) finish immediately
    /// and return their summary. Otherwise a run is queued and `None` is
    /// returned; drive it with [`Orchestrator::generate_step`].
    pub fn begin_generate(&mut self) -> Result<Option<GenerateSummary>, OrchestratorError> {
        self.ensure_idle()?;

        if self.mode.is_pattern_based() {
            self.refresh_pattern_names();
            let total = self.working_set.iter().filter(|e| !e.is_settled()).count();
            return Ok(Some(GenerateSummary {
                total,
                succeeded: total,
                ..GenerateSummary::default()
            }));
        }

        let queue: VecDeque<PathBuf> = self
            .working_set
            .iter()
            .filter(|entry| !entry.is_settled())
            .map(|entry| entry.id().to_path_buf())
            .collect();

        if queue.is_empty() {
            return Ok(Some(GenerateSummary::default()));
        }

        info!("Generating model names for {} file(s)", queue.len());
        self.run = Some(GenerateRun {
            total: queue.len(),
            queue,
            succeeded: 0,
            failed: 0,
        });
        Ok(None)
    }

    /// Marks the entry the next [`Orchestrator::generate_step`] will describe
    /// as processing, so a front end can show it before the request starts.
    pub fn mark_next_processing(&mut self) -> Option<&FileEntry> {
        let id = self.run.as_ref()?.queue.front()?.clone();
        let entry = self.working_set.get_mut(&id)?;
        if entry.is_settled() {
            return None;
        }
        entry.mark(EntryStatus::Processing);
        self.working_set.get(&id)
    }

    /// Processes the next queued entry: at most one inference call.
    pub async fn generate_step<C: InferenceClient>(&mut self, client: &C) -> StepOutcome {
        let Some(id) = self.run.as_mut().and_then(|run| run.queue.pop_front()) else {
            return match self.run.take() {
                Some(run) => StepOutcome::Finished(run.summary(false)),
                None => StepOutcome::Idle,
            };
        };

        let succeeded = self.describe_entry(&id, client).await;

        let Some(run) = self.run.as_mut() else {
            return StepOutcome::Idle;
        };
        if succeeded {
            run.succeeded += 1;
        } else {
            run.failed += 1;
        }

        if run.queue.is_empty() {
            let summary = run.summary(false);
            self.run = None;
            info!(
                "Generate finished: {} named, {} failed",
                summary.succeeded, summary.failed
            );
            StepOutcome::Finished(summary)
        } else {
            StepOutcome::Progressed(run.progress())
        }
    }

    /// Stops the active run. Entries already processed keep their result,
    /// queued ones are left exactly as they were.
    pub fn cancel_generate(&mut self) -> Option<GenerateSummary> {
        let run = self.run.take()?;
        for id in &run.queue {
            if let Some(entry) = self.working_set.get_mut(id) {
                if entry.status() == EntryStatus::Processing {
                    entry.mark(EntryStatus::Idle);
                }
            }
        }
        info!(
            "Generate cancelled with {} of {} done",
            run.succeeded + run.failed,
            run.total
        );
        Some(run.summary(true))
    }

    /// Runs the whole generate phase, reporting progress after every entry.
    /// The last reported value is always 100%.
    pub async fn generate_names<C, F>(
        &mut self,
        client: &C,
        mut on_progress: F,
    ) -> Result<GenerateSummary, OrchestratorError>
    where
        C: InferenceClient,
        F: FnMut(Progress),
    {
        if let Some(summary) = self.begin_generate()? {
            on_progress(Progress {
                completed: summary.total,
                total: summary.total,
            });
            return Ok(summary);
        }

        loop {
            match self.generate_step(client).await {
                StepOutcome::Progressed(progress) => on_progress(progress),
                StepOutcome::Finished(summary) => {
                    on_progress(Progress {
                        completed: summary.total,
                        total: summary.total,
                    });
                    return Ok(summary);
                }
                StepOutcome::Idle => return Ok(GenerateSummary::default()),
            }
        }
    }

    async fn describe_entry<C: InferenceClient>(&mut self, id: &Path, client: &C) -> bool {
        match self.working_set.get_mut(id) {
            Some(entry) if !entry.is_settled() => entry.mark(EntryStatus::Processing),
            _ => return false,
        }

        let label: Result<String, String> = async {
            let image = tokio::fs::read(id)
                .await
                .map_err(|e| format!("cannot read image: {}", e))?;
            let raw = client
                .request_description(&image, DESCRIBE_PROMPT)
                .await
                .map_err(|e| e.to_string())?;
            debug!("Model output for {}: {:?}", id.display(), raw);
            sanitize(&raw).map_err(|e| e.to_string())
        }
        .await;

        let index = self.working_set.position(id).unwrap_or_default();
        let Some(entry) = self.working_set.get_mut(id) else {
            return false;
        };

        match label {
            Ok(label) => {
                let context = NamingContext {
                    index,
                    user_pattern: &self.pattern,
                    model_output: Some(&label),
                };
                let name = compute_name(entry, RenameMode::ModelSuggested, context);
                if entry.set_proposed_name(name) {
                    entry.mark(EntryStatus::Done);
                    true
                } else {
                    entry.mark_error(UNUSABLE_NAME);
                    false
                }
            }
            Err(message) => {
                warn!("Could not name {}: {}", id.display(), message);
                entry.mark_error(message);
                false
            }
        }
    }

    /// Renames every entry that is not already renamed, including ones that
    /// failed before.
    pub async fn apply_renames(&mut self) -> Result<ApplySummary, OrchestratorError> {
        self.ensure_idle()?;

        let pairs: Vec<RenamePair> = self
            .working_set
            .iter()
            .filter(|entry| !entry.is_settled())
            .map(|entry| RenamePair::new(entry.original_path(), entry.proposed_name()))
            .collect();

        let outcomes = self.engine.rename_files(&pairs).await;

        let mut summary = ApplySummary {
            attempted: pairs.len(),
            ..ApplySummary::default()
        };
        for outcome in outcomes {
            let Some(entry) = self.working_set.get_mut(&outcome.original_path) else {
                continue;
            };
            match outcome.result {
                Ok(_) => {
                    entry.mark(EntryStatus::Success);
                    summary.succeeded += 1;
                }
                Err(e) => {
                    entry.mark_error(e.to_string());
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Apply finished: {} renamed, {} failed",
            summary.succeeded, summary.failed
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounds_to_nearest() {
        let cases = [(0, 3, 0), (1, 3, 33), (2, 3, 67), (3, 3, 100), (1, 8, 13), (0, 0, 100)];
        for (completed, total, expected) in cases {
            assert_eq!(Progress { completed, total }.percent(), expected);
        }
    }

    #[test]
    fn test_pattern_mode_names_new_entries_on_add() {
        let mut orchestrator = Orchestrator::new(RenameMode::PatternRename, "");
        orchestrator.add_paths(vec![
            PathBuf::from("/a/b/IMG001.png"),
            PathBuf::from("/a/b/IMG002.jpg"),
        ]);

        let names: Vec<&str> = orchestrator.entries().iter().map(|e| e.proposed_name()).collect();
        assert_eq!(names, vec!["File_01.png", "File_02.jpg"]);
    }

    #[test]
    fn test_changing_pattern_renames_unsettled_entries() {
        let mut orchestrator = Orchestrator::new(RenameMode::Prefix, "");
        orchestrator.add_paths(vec![PathBuf::from("/a/b/cat.jpg")]);
        assert_eq!(orchestrator.entries()[0].proposed_name(), "cat.jpg");

        orchestrator.set_pattern("vac_").unwrap();
        assert_eq!(orchestrator.entries()[0].proposed_name(), "vac_cat.jpg");

        orchestrator.set_mode(RenameMode::Suffix).unwrap();
        assert_eq!(orchestrator.entries()[0].proposed_name(), "catvac_.jpg");
    }

    #[test]
    fn test_model_mode_keeps_names_on_switch() {
        let mut orchestrator = Orchestrator::new(RenameMode::Prefix, "x_");
        orchestrator.add_paths(vec![PathBuf::from("/a/cat.jpg")]);
        orchestrator.set_mode(RenameMode::ModelSuggested).unwrap();
        assert_eq!(orchestrator.entries()[0].proposed_name(), "x_cat.jpg");
    }
}
