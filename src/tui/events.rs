use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::config::AppConfig;
use crate::inference::OllamaClient;
use super::app::App;
use super::models::InputMode;
use super::rendering::ui;

pub async fn run_tui(config: &AppConfig, selected_files: Vec<PathBuf>) -> Result<()> {
    let client = OllamaClient::new(&config.inference)?;
    let mut app = App::new(config, client);
    if !selected_files.is_empty() {
        app.add_paths(selected_files);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("Starting interactive session with {} file(s)", app.files().len());
    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!("Interactive session failed: {}", err);
    }
    res.map_err(Into::into)
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    terminal.draw(|f| ui(f, app))?;
    app.refresh_ai_status().await;

    loop {
        app.clear_status_message_if_expired();

        terminal.draw(|f| ui(f, app))?;

        // While generating, only peek for keys so the next file starts right away.
        let timeout = if app.is_busy() {
            Duration::from_millis(10)
        } else {
            Duration::from_millis(100)
        };

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key).await;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        if app.prepare_generate_step() {
            terminal.draw(|f| ui(f, app))?;
        }
        app.advance_generate().await;
    }
}

async fn handle_key(app: &mut App, key: KeyEvent) {
    if app.input_mode != InputMode::Normal {
        match key.code {
            KeyCode::Enter => app.submit_input(),
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Backspace => app.handle_input_backspace(),
            KeyCode::Char(c) => app.handle_input_char(c),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.cancel_generate();
            app.should_quit = true;
        }
        KeyCode::Esc => {
            if app.show_help {
                app.toggle_help();
            } else if app.is_busy() {
                app.cancel_generate();
            }
        }
        KeyCode::Char('h') | KeyCode::F(1) => app.toggle_help(),
        KeyCode::Char('p') => app.toggle_preview(),
        KeyCode::Down | KeyCode::Char('j') => app.next(),
        KeyCode::Up | KeyCode::Char('k') => app.previous(),
        KeyCode::Char('m') => app.cycle_mode(),
        KeyCode::Char('e') => app.begin_input(InputMode::EditPattern),
        KeyCode::Char('a') => app.begin_input(InputMode::AddPath),
        #[cfg(feature = "dialog")]
        KeyCode::Char('o') => app.open_dialog(),
        KeyCode::Char('x') | KeyCode::Delete => app.remove_selected(),
        KeyCode::Char('g') => app.start_generate(),
        KeyCode::Char('c') => app.refresh_ai_status().await,
        KeyCode::Enter | KeyCode::Char('r') => app.apply_renames().await,
        _ => {}
    }
}
