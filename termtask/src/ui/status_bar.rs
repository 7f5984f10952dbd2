//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, PanelFocus};

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = match app.focus {
        PanelFocus::Input => "Enter: save | Tab: task list | Esc: cancel/quit",
        PanelFocus::List => "e: edit | d: eliminate | r: refresh | ↑↓/jk: navigate | Tab: input",
    };

    let (dot_color, status_text) = if app.is_connected {
        (theme::SUCCESS, format!("Connected ({})", app.backend_info))
    } else if app.backend_info.is_empty() {
        (theme::OFFLINE, "Disconnected".to_string())
    } else {
        (theme::WARNING, format!("{} mode", app.backend_info))
    };

    // A transient status message takes the help text's slot until the next one.
    let trailing = app.status_message.as_deref().unwrap_or(help_text);

    let status_line = Line::from(vec![
        Span::styled("termtask v0.1.0", theme::bold()),
        Span::raw(" | "),
        Span::styled("●", theme::normal().fg(dot_color)),
        Span::raw(format!(" {status_text}")),
        Span::raw(" | "),
        Span::styled(trailing, theme::dimmed()),
    ]);

    frame.render_widget(
        Paragraph::new(status_line).style(theme::status_bar_bg()),
        area,
    );
}
