//! Confirmation dialog for discarding the application

use super::base::{render_dialog, DialogConfig};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

/// Render a yes/no confirmation overlay
pub fn render_confirm_dialog(frame: &mut Frame, title: &str, message: &str) {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let hint = vec![
        Span::styled("Enter", key_style),
        Span::styled(" confirm  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", key_style),
        Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
    ];

    render_dialog(
        frame,
        DialogConfig {
            title,
            title_color: Color::Red,
            border_color: Color::Red,
            message,
            hint: Some(hint),
            max_width: 56,
        },
    );
}
