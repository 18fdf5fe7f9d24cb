use std::time::{Duration, Instant};

use ratatui::widgets::{ListState, ScrollbarState};

use crate::config::AppConfig;
use crate::inference::{Availability, OllamaClient};
use crate::orchestrator::{ApplySummary, Orchestrator};
use crate::working_set::FileEntry;
use super::models::{InputMode, ProcessingStats};

#[derive(Debug)]
pub struct App {
    pub orchestrator: Orchestrator,
    pub client: OllamaClient,
    pub selected_index: usize,
    pub list_state: ListState,
    pub scroll_state: ScrollbarState,
    pub show_help: bool,
    pub show_preview: bool,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,
    pub progress_percent: u16,
    pub last_apply: Option<ApplySummary>,
    pub ai_status: Option<Availability>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &AppConfig, client: OllamaClient) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            orchestrator: Orchestrator::new(config.mode, config.pattern.clone()),
            client,
            selected_index: 0,
            list_state,
            scroll_state: ScrollbarState::default(),
            show_help: false,
            show_preview: true,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            status_message: None,
            status_message_time: None,
            progress_percent: 0,
            last_apply: None,
            ai_status: None,
            should_quit: false,
        }
    }

    pub fn files(&self) -> &[FileEntry] {
        self.orchestrator.entries()
    }

    pub fn selected_entry(&self) -> Option<&FileEntry> {
        self.list_state.selected().and_then(|i| self.files().get(i))
    }

    pub fn stats(&self) -> ProcessingStats {
        ProcessingStats::from_working_set(self.orchestrator.working_set())
    }

    pub fn is_busy(&self) -> bool {
        self.orchestrator.is_generating()
    }

    pub fn next(&mut self) {
        if self.files().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.files().len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.select(i);
    }

    pub fn previous(&mut self) {
        if self.files().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.files().len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.select(i);
    }

    fn select(&mut self, i: usize) {
        self.list_state.select(Some(i));
        self.selected_index = i;
        self.scroll_state = self.scroll_state.position(i);
    }

    /// Keeps the selection and scrollbar inside the list after it changed size.
    pub fn sync_scroll(&mut self) {
        let len = self.files().len();
        self.scroll_state = self.scroll_state.content_length(len);
        if len == 0 {
            self.list_state.select(Some(0));
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.select(len - 1);
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn toggle_preview(&mut self) {
        self.show_preview = !self.show_preview;
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_message_time = Some(Instant::now());
    }

    pub fn clear_status_message_if_expired(&mut self) {
        if let (Some(_), Some(time)) = (&self.status_message, self.status_message_time) {
            if time.elapsed() > Duration::from_secs(3) {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }
}
