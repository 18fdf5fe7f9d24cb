use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Scrollbar,
        ScrollbarOrientation, Wrap,
    },
};

use crate::naming::RenameMode;
use crate::working_set::EntryStatus;
use super::app::App;
use super::models::InputMode;
use super::utils::{centered_rect, truncate_middle};

pub fn ui(f: &mut Frame, app: &App) {
    let size = f.area();

    render_main_screen(f, size, app);

    if app.input_mode != InputMode::Normal {
        render_input_popup(f, app);
    }

    if app.show_help {
        render_help_popup(f, app);
    }
}

fn status_color(status: EntryStatus) -> Color {
    match status {
        EntryStatus::Idle => Color::Yellow,
        EntryStatus::Processing => Color::Blue,
        EntryStatus::Done => Color::Cyan,
        EntryStatus::Success => Color::Green,
        EntryStatus::Error => Color::Red,
    }
}

pub fn render_main_screen(f: &mut Frame, area: Rect, app: &App) {
    let chunks = if app.show_preview {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(area)
    };

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(chunks[0]);

    render_header(f, left_chunks[0], app);
    render_settings_bar(f, left_chunks[1], app);
    render_file_list(f, left_chunks[2], app);
    render_status_bar(f, left_chunks[3], app);

    if app.show_preview && chunks.len() > 1 {
        render_preview_panel(f, chunks[1], app);
    }
}

pub fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title = if app.is_busy() {
        "Image Rename - Describing..."
    } else if app.last_apply.is_some() && app.stats().renameable() == 0 {
        "Image Rename - Completed!"
    } else {
        "Image Rename"
    };

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::White))
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(header, area);
}

pub fn render_settings_bar(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ])
        .split(area);

    let mode = app.orchestrator.mode();
    let mode_widget = Paragraph::new(mode.label())
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title("Mode (m)"));
    f.render_widget(mode_widget, chunks[0]);

    let (pattern_text, pattern_style) = if mode.uses_user_pattern() {
        let text = if app.orchestrator.pattern().is_empty() {
            "[press e to set]".to_string()
        } else {
            app.orchestrator.pattern().to_string()
        };
        (text, Style::default().fg(Color::White))
    } else {
        ("not used".to_string(), Style::default().fg(Color::DarkGray))
    };
    let pattern_widget = Paragraph::new(pattern_text)
        .style(pattern_style)
        .block(Block::default().borders(Borders::ALL).title("Pattern (e)"));
    f.render_widget(pattern_widget, chunks[1]);

    let (ai_text, ai_color) = match &app.ai_status {
        Some(status) if status.available => (status.detail.clone(), Color::Green),
        Some(status) => (status.detail.clone(), Color::Red),
        None => (format!("{}: press c to check", app.client.model()), Color::Gray),
    };
    let ai_widget = Paragraph::new(ai_text)
        .style(Style::default().fg(ai_color))
        .block(Block::default().borders(Borders::ALL).title("Model"));
    f.render_widget(ai_widget, chunks[2]);
}

pub fn render_file_list(f: &mut Frame, area: Rect, app: &App) {
    let width = area.width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = app
        .files()
        .iter()
        .map(|file| {
            let tag = format!("[{}]", file.status().label());
            let color = status_color(file.status());
            let name_width = width.saturating_sub(tag.len() + 1) / 2;

            let mut spans = vec![
                Span::styled(format!("{} ", tag), Style::default().fg(color)),
                Span::styled(
                    truncate_middle(&file.original_name(), name_width.max(8)),
                    Style::default().fg(Color::White),
                ),
            ];
            if file.needs_rename() && file.status() != EntryStatus::Success {
                spans.push(Span::styled(" -> ", Style::default().fg(Color::DarkGray)));
                spans.push(Span::styled(
                    truncate_middle(file.proposed_name(), name_width.max(8)),
                    Style::default().fg(Color::Gray),
                ));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let stats = app.stats();
    let title = format!(
        "Files ({}) - {} pending, {} named, {} renamed, {} failed",
        stats.total, stats.pending, stats.named, stats.renamed, stats.failed
    );
    let files_list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::White))
                .border_style(Style::default().fg(Color::Blue)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(files_list, area, &mut app.list_state.clone());

    if app.files().len() > (area.height as usize).saturating_sub(2) {
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        f.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut app.scroll_state.clone(),
        );
    }
}

pub fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let stats = app.stats();
    let progress_label = if let Some(status_msg) = &app.status_message {
        status_msg.clone()
    } else if let Some(progress) = app.orchestrator.progress() {
        format!("Describing... {}/{}", progress.completed, progress.total)
    } else if let Some(summary) = app.last_apply {
        format!("Complete! {} renamed, {} failed", summary.succeeded, summary.failed)
    } else if stats.total == 0 {
        "No files. Press a to add a path".to_string()
    } else {
        format!("Ready: {} file(s), {} failed", stats.total, stats.failed)
    };

    let progress_style = if app.status_message.is_some() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Green)
    };

    let progress = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(progress_style)
        .percent(app.progress_percent.min(100))
        .label(progress_label);

    f.render_widget(progress, chunks[0]);

    let controls_text = if app.is_busy() {
        "Esc to cancel"
    } else if app.orchestrator.mode() == RenameMode::ModelSuggested {
        "g generate, Enter apply, h help"
    } else {
        "Enter apply, h help, q quit"
    };

    let controls = Paragraph::new(controls_text)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    f.render_widget(controls, chunks[1]);
}

pub fn render_preview_panel(f: &mut Frame, area: Rect, app: &App) {
    let Some(file) = app.selected_entry() else {
        let empty = Paragraph::new("Nothing selected")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().title("Preview").borders(Borders::ALL));
        f.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let location = file
        .original_path()
        .parent()
        .map(|dir| dir.display().to_string())
        .unwrap_or_default();

    let original = Paragraph::new(Text::from(vec![
        Line::from("Original:"),
        Line::from(Span::styled(file.original_name(), Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format!("In: {}", location)),
    ]))
    .block(
        Block::default()
            .title("Before")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    )
    .wrap(Wrap { trim: true });

    f.render_widget(original, chunks[0]);

    let new_style = match file.status() {
        EntryStatus::Success => Style::default().fg(Color::Green),
        EntryStatus::Error => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::Yellow),
    };

    let mut new_lines = vec![
        Line::from("New:"),
        Line::from(Span::styled(file.proposed_name().to_string(), new_style)),
        Line::from(""),
        Line::from(format!("Status: {}", file.status().label())),
    ];

    if let Some(error) = file.error_message() {
        new_lines.push(Line::from(""));
        new_lines.push(Line::from(Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )));
    }

    let new = Paragraph::new(Text::from(new_lines))
        .block(
            Block::default()
                .title("After")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(new, chunks[1]);
}

pub fn render_input_popup(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(60, 20, f.area());

    let title = match app.input_mode {
        InputMode::EditPattern => "Pattern (Enter to save, Esc to cancel)",
        InputMode::AddPath => "Add file or directory (Enter to add, Esc to cancel)",
        InputMode::Normal => "",
    };

    let input = Paragraph::new(format!("{}_", app.input_buffer))
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(input, popup_area);
}

pub fn render_help_popup(f: &mut Frame, _app: &App) {
    let popup_area = centered_rect(60, 70, f.area());

    let mut help_text = vec![
        Line::from(vec![Span::styled(
            "Image Rename - Help",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  Up/k    - Move up"),
        Line::from("  Down/j  - Move down"),
        Line::from(""),
        Line::from("Files:"),
        Line::from("  a       - Add a file or directory"),
    ];
    if cfg!(feature = "dialog") {
        help_text.push(Line::from("  o       - Open file picker"));
    }
    help_text.extend([
        Line::from("  x       - Remove selected file"),
        Line::from(""),
        Line::from("Naming:"),
        Line::from("  m       - Cycle rename mode"),
        Line::from("  e       - Edit prefix/suffix pattern"),
        Line::from("  g       - Generate names (AI Describe)"),
        Line::from("  c       - Check model availability"),
        Line::from("  Enter/r - Apply renames"),
        Line::from("  Esc     - Cancel generating"),
        Line::from(""),
        Line::from("  p       - Toggle preview panel"),
        Line::from("  h/F1    - Toggle this help"),
        Line::from("  q       - Quit application"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press Esc or h to close",
            Style::default().fg(Color::Gray),
        )]),
    ]);

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, popup_area);
    f.render_widget(paragraph, popup_area);
}
