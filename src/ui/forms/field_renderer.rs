//! Field rendering utilities for forms

use crate::state::{option_label, FieldKind, FieldSpec};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows taken by one field
pub const FIELD_HEIGHT: u16 = 3;

/// Text shown inside a field for its stored value
pub fn display_value(field: &FieldSpec, value: &str) -> String {
    match field.kind {
        FieldKind::Checkbox => {
            if value == "true" {
                "[x] Yes".to_string()
            } else {
                "[ ] No".to_string()
            }
        }
        FieldKind::Choice(options) if value.is_empty() => {
            format!("◀ select ({} options) ▶", options.len())
        }
        FieldKind::Choice(options) => format!("◀ {} ▶", option_label(options, value)),
        _ => value.to_string(),
    }
}

/// Draw a bordered field; a failing field gets a red border and its message underneath
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    field: &FieldSpec,
    value: &str,
    is_active: bool,
    error: Option<&str>,
) {
    let accent = match (is_active, error.is_some()) {
        (_, true) => Color::Red,
        (true, false) => Color::Cyan,
        (false, false) => Color::DarkGray,
    };

    let display_str = display_value(field, value);
    let is_typed = !matches!(field.kind, FieldKind::Checkbox | FieldKind::Choice(_));
    let display_str = if display_str.is_empty() && !is_active {
        "(empty)".to_string()
    } else {
        display_str
    };
    let cursor = if is_active && is_typed { "▌" } else { "" };

    let text_style = if is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };

    let content = Paragraph::new(Line::from(vec![
        Span::styled(display_str, text_style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]));

    let mut block = Block::default()
        .title(format!(" {} ", field.label))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));
    if let Some(message) = error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {message} "),
            Style::default().fg(Color::Red).add_modifier(Modifier::ITALIC),
        )));
    }

    frame.render_widget(content.block(block), area);
}

/// Draw key hints below a form
pub fn draw_help_text(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let mut spans = Vec::new();
    for (key, action) in hints {
        spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(
            format!(" {action}  "),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{find_field, keys};

    #[test]
    fn test_checkbox_display() {
        let field = find_field(keys::AGREE_OVD).unwrap();
        assert_eq!(display_value(field, "true"), "[x] Yes");
        assert_eq!(display_value(field, ""), "[ ] No");
    }

    #[test]
    fn test_choice_display() {
        let field = find_field(keys::GENDER).unwrap();
        assert_eq!(display_value(field, "female"), "◀ Female ▶");
        assert_eq!(display_value(field, ""), "◀ select (3 options) ▶");
    }

    #[test]
    fn test_text_passes_through() {
        let field = find_field(keys::FULL_NAME).unwrap();
        assert_eq!(display_value(field, "John"), "John");
    }
}
