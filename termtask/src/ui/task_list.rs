//! Task list rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use termtask_proto::document::Timestamp;

use super::theme;
use crate::app::{App, PanelFocus};
use crate::session::EditMode;

/// Render the scrollable task list.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .session
        .tasks()
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let is_selected = app.focus == PanelFocus::List && i == app.selected;
            let under_edit = matches!(app.session.mode(), EditMode::Editing(id) if *id == task.id);

            let name_style = if is_selected {
                theme::selected()
            } else if under_edit {
                theme::editing()
            } else {
                theme::normal()
            };

            let mut spans = vec![
                Span::styled(task.fields.name.clone(), name_style),
                Span::raw("  "),
                Span::styled(
                    format_timestamp(task.fields.time, &app.timestamp_format),
                    theme::timestamp(),
                ),
            ];
            if under_edit {
                spans.push(Span::styled("  (editing)", theme::editing()));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let border_style = if app.focus == PanelFocus::List {
        theme::highlighted()
    } else {
        theme::normal()
    };

    let title = format!("Tasks ({})", app.session.tasks().len());
    let block = Block::default()
        .title(Span::styled(title, theme::panel_title(theme::TASKS_TITLE)))
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(List::new(items).block(block), area);
}

/// Format a task timestamp with the configured chrono format string.
fn format_timestamp(time: Timestamp, format: &str) -> String {
    use chrono::{Local, TimeZone};
    let ms = time.as_millis();
    let secs = (ms / 1000).cast_signed();
    let nsecs = u32::try_from((ms % 1000) * 1_000_000).unwrap_or(0);
    match Local.timestamp_opt(secs, nsecs) {
        chrono::LocalResult::Single(dt) => dt.format(format).to_string(),
        _ => "????-??-??".to_string(),
    }
}
