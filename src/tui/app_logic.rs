use std::path::PathBuf;

use crate::selection::collect_paths;
use super::app::App;
use super::models::InputMode;

impl App {
    pub fn cycle_mode(&mut self) {
        let next = self.orchestrator.mode().next();
        match self.orchestrator.set_mode(next) {
            Ok(()) => self.set_status_message(format!("Mode: {}", next.label())),
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    pub fn remove_selected(&mut self) {
        let Some(id) = self.selected_entry().map(|entry| entry.id().to_path_buf()) else {
            return;
        };

        match self.orchestrator.remove(&id) {
            Ok(()) => {
                self.sync_scroll();
                self.set_status_message(format!("Removed {}", id.display()));
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    pub fn begin_input(&mut self, mode: InputMode) {
        self.input_buffer = match mode {
            InputMode::EditPattern => self.orchestrator.pattern().to_string(),
            InputMode::AddPath | InputMode::Normal => String::new(),
        };
        self.input_mode = mode;
    }

    pub fn handle_input_char(&mut self, c: char) {
        if self.input_mode != InputMode::Normal {
            self.input_buffer.push(c);
        }
    }

    pub fn handle_input_backspace(&mut self) {
        self.input_buffer.pop();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    pub fn submit_input(&mut self) {
        let input = std::mem::take(&mut self.input_buffer);
        let mode = std::mem::replace(&mut self.input_mode, InputMode::Normal);

        match mode {
            InputMode::EditPattern => match self.orchestrator.set_pattern(input) {
                Ok(()) => self.set_status_message("Pattern updated".to_string()),
                Err(e) => self.set_status_message(e.to_string()),
            },
            InputMode::AddPath => {
                let trimmed = input.trim();
                if !trimmed.is_empty() {
                    self.add_paths(vec![PathBuf::from(trimmed)]);
                }
            }
            InputMode::Normal => {}
        }
    }

    /// Resolves files and directories and adds the images found to the list.
    pub fn add_paths(&mut self, inputs: Vec<PathBuf>) {
        let selection = collect_paths(&inputs);
        let added = self.orchestrator.add_paths(selection.paths);
        self.sync_scroll();

        let message = match selection.skipped.first() {
            Some(first) if added == 0 => first.to_string(),
            Some(_) => format!("Added {} file(s), skipped {}", added, selection.skipped.len()),
            None => format!("Added {} file(s)", added),
        };
        self.set_status_message(message);
    }

    #[cfg(feature = "dialog")]
    pub fn open_dialog(&mut self) {
        let picked = crate::selection::pick_images();
        if picked.is_empty() {
            self.set_status_message("No files selected".to_string());
        } else {
            self.add_paths(picked);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::inference::OllamaClient;
    use crate::naming::RenameMode;
    use crate::working_set::EntryStatus;
    use std::fs;
    use tempfile::TempDir;

    fn app_with_images(mode: RenameMode, names: &[&str]) -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"img").unwrap();
        }
        let config = ConfigBuilder::new().mode(mode).build().unwrap();
        let client = OllamaClient::new(&config.inference).unwrap();
        let mut app = App::new(&config, client);
        app.add_paths(vec![dir.path().to_path_buf()]);
        (dir, app)
    }

    #[test]
    fn test_add_directory_names_entries() {
        let (_dir, app) = app_with_images(RenameMode::PatternRename, &["b.png", "a.jpg", "notes.txt"]);

        let names: Vec<&str> = app.files().iter().map(|e| e.proposed_name()).collect();
        assert_eq!(names, vec!["File_01.jpg", "File_02.png"]);
    }

    #[test]
    fn test_edit_pattern_updates_prefix_names() {
        let (_dir, mut app) = app_with_images(RenameMode::Prefix, &["cat.jpg"]);

        app.begin_input(InputMode::EditPattern);
        for c in "trip_".chars() {
            app.handle_input_char(c);
        }
        app.submit_input();

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.orchestrator.pattern(), "trip_");
        assert_eq!(app.files()[0].proposed_name(), "trip_cat.jpg");
    }

    #[test]
    fn test_cycle_mode_from_suffix_reaches_model() {
        let (_dir, mut app) = app_with_images(RenameMode::Suffix, &["cat.jpg"]);

        app.cycle_mode();

        assert_eq!(app.orchestrator.mode(), RenameMode::ModelSuggested);
        assert_eq!(app.files()[0].status(), EntryStatus::Idle);
    }

    #[test]
    fn test_remove_selected_keeps_selection_in_bounds() {
        let (_dir, mut app) = app_with_images(RenameMode::PatternRename, &["a.jpg", "b.jpg"]);

        app.next();
        app.remove_selected();

        assert_eq!(app.files().len(), 1);
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.files()[0].original_name(), "a.jpg");
    }

    #[test]
    fn test_add_missing_path_reports_error() {
        let (_dir, mut app) = app_with_images(RenameMode::PatternRename, &[]);

        app.begin_input(InputMode::AddPath);
        for c in "/definitely/not/here.jpg".chars() {
            app.handle_input_char(c);
        }
        app.submit_input();

        assert!(app.files().is_empty());
        assert!(app.status_message.is_some());
    }
}
