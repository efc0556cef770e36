//! Progress overlay for delayed operations

use super::base::{render_dialog, DialogConfig};
use ratatui::{
    style::{Color, Style},
    text::Span,
    Frame,
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner glyph for a millisecond clock reading
pub fn spinner_frame(millis: u32) -> &'static str {
    SPINNER[(millis / 100) as usize % SPINNER.len()]
}

/// Render the busy overlay with the operation's label
pub fn render_loading_dialog(frame: &mut Frame, label: &str, millis: u32) {
    let message = format!("{} {label}", spinner_frame(millis));
    let hint = vec![
        Span::styled("Esc", Style::default().fg(Color::Cyan)),
        Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
    ];

    render_dialog(
        frame,
        DialogConfig {
            title: "Please wait",
            title_color: Color::Yellow,
            border_color: Color::Yellow,
            message: &message,
            hint: Some(hint),
            max_width: 44,
        },
    );
}
