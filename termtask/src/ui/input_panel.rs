//! Draft input box rendering.
//!
//! The box title and border toggle with the edit mode: "Add task" in idle
//! mode, "Edit task" while a record is being overwritten.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::{App, PanelFocus};

/// Render the input box and place the terminal cursor when focused.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let editing = app.session.is_editing();
    let title = if editing { "Edit task" } else { "Add task" };

    let border_style = if app.focus == PanelFocus::Input {
        theme::highlighted()
    } else {
        theme::normal()
    };
    let title_color = if editing {
        theme::WARNING
    } else {
        theme::INPUT_TITLE
    };

    let block = Block::default()
        .title(ratatui::text::Span::styled(
            title,
            theme::panel_title(title_color),
        ))
        .borders(Borders::ALL)
        .border_style(border_style);

    let input = Paragraph::new(app.session.draft.as_str())
        .style(theme::normal())
        .block(block);
    frame.render_widget(input, area);

    if app.focus == PanelFocus::Input {
        // Cursor sits after the character it follows, inside the border.
        let cursor = u16::try_from(app.cursor_position).unwrap_or(u16::MAX);
        let x = area
            .x
            .saturating_add(1)
            .saturating_add(cursor)
            .min(area.right().saturating_sub(2));
        frame.set_cursor_position(Position::new(x, area.y + 1));
    }
}
