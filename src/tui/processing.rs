use log::{info, warn};

use crate::inference::InferenceClient;
use crate::orchestrator::{GenerateSummary, StepOutcome};
use super::app::App;

impl App {
    pub fn start_generate(&mut self) {
        match self.orchestrator.begin_generate() {
            Ok(Some(summary)) => {
                self.progress_percent = 100;
                self.finish_generate(summary);
            }
            Ok(None) => {
                self.progress_percent = 0;
                let total = self.orchestrator.progress().map(|p| p.total).unwrap_or_default();
                self.set_status_message(format!("Describing {} image(s)...", total));
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    /// Flags the file about to be described; returns whether a step is due.
    pub fn prepare_generate_step(&mut self) -> bool {
        self.orchestrator.mark_next_processing().is_some()
    }

    /// Runs one inference call of the active generate run, if any. Called
    /// once per event-loop tick so the screen redraws between files.
    pub async fn advance_generate(&mut self) {
        if !self.orchestrator.is_generating() {
            return;
        }

        match self.orchestrator.generate_step(&self.client).await {
            StepOutcome::Progressed(progress) => self.progress_percent = progress.percent(),
            StepOutcome::Finished(summary) => {
                self.progress_percent = 100;
                self.finish_generate(summary);
            }
            StepOutcome::Idle => {}
        }
    }

    pub fn cancel_generate(&mut self) {
        if let Some(summary) = self.orchestrator.cancel_generate() {
            self.set_status_message(format!(
                "Cancelled: {} of {} done",
                summary.succeeded + summary.failed,
                summary.total
            ));
        }
    }

    fn finish_generate(&mut self, summary: GenerateSummary) {
        let message = if summary.failed > 0 {
            format!("Named {} file(s), {} failed", summary.succeeded, summary.failed)
        } else {
            format!("Named {} file(s)", summary.succeeded)
        };
        self.set_status_message(message);
    }

    pub async fn apply_renames(&mut self) {
        if self.orchestrator.entries().is_empty() {
            self.set_status_message("No files to rename".to_string());
            return;
        }

        match self.orchestrator.apply_renames().await {
            Ok(summary) => {
                self.last_apply = Some(summary);
                self.set_status_message(format!(
                    "Complete! {} renamed, {} failed",
                    summary.succeeded, summary.failed
                ));
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    pub async fn refresh_ai_status(&mut self) {
        let availability = self.client.check_availability().await;
        if availability.available {
            info!("Model check: {}", availability.detail);
        } else {
            warn!("Model check: {}", availability.detail);
        }
        self.set_status_message(availability.detail.clone());
        self.ai_status = Some(availability);
    }
}
