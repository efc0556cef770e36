//! Transient message in the top-right corner

use crate::app::{Toast, ToastKind};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const TOAST_WIDTH: u16 = 44;

pub fn render_toast(frame: &mut Frame, toast: &Toast) {
    let area = frame.area();
    let (title, color) = match toast.kind {
        ToastKind::Success => (" ✓ ", Color::Green),
        ToastKind::Error => (" ✗ ", Color::Red),
    };

    let width = TOAST_WIDTH.min(area.width);
    let inner_width = width.saturating_sub(2).max(1) as usize;
    let lines = toast.message.chars().count().div_ceil(inner_width).max(1) as u16;
    let toast_area = Rect {
        x: area.x + area.width - width,
        y: area.y + 1,
        width,
        height: (lines + 2).min(area.height.saturating_sub(1)),
    };

    frame.render_widget(Clear, toast_area);
    let paragraph = Paragraph::new(toast.message.as_str())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(Color::Black)),
        );
    frame.render_widget(paragraph, toast_area);
}
