//! Loan selection step

use crate::app::App;
use crate::ui::components::{render_button, render_proceed_button, BUTTON_HEIGHT};
use crate::ui::forms::draw_help_text;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw one row of option buttons per visible selection group
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let groups = app.visible_groups();

    let block = Block::default()
        .title(" Choose Your Loan ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = Vec::new();
    for _ in &groups {
        constraints.push(Constraint::Length(1)); // Group label
        constraints.push(Constraint::Length(BUTTON_HEIGHT)); // Options
        constraints.push(Constraint::Length(1)); // Error
    }
    constraints.push(Constraint::Length(BUTTON_HEIGHT)); // Proceed
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1)); // Help
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(inner);

    let validation = app.wizard.last_validation();
    let focus = app.focus_index();
    for (idx, group) in groups.iter().enumerate() {
        let base = idx * 3;
        let is_focused = idx == focus;
        let label_style = if is_focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(group.label, label_style)),
            chunks[base],
        );

        let selected = app.wizard.form().selection(group.key);
        let option_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![
                Constraint::Ratio(1, group.options.len() as u32);
                group.options.len()
            ])
            .split(chunks[base + 1]);
        for (n, (value, label)) in group.options.iter().enumerate() {
            let is_active = selected == Some(*value);
            let content = format!("{} {}", n + 1, label);
            render_button(frame, option_areas[n], &content, is_active, is_focused);
        }

        if let Some(message) = validation.error_for(group.key) {
            frame.render_widget(
                Paragraph::new(Span::styled(message, Style::default().fg(Color::Red))),
                chunks[base + 2],
            );
        }
    }

    let tail = groups.len() * 3;
    render_proceed_button(frame, chunks[tail], "Continue", validation.is_valid());
    draw_help_text(
        frame,
        chunks[tail + 2],
        &[
            ("↑↓", "group"),
            ("←→", "choose"),
            ("1-4", "pick"),
            ("Enter", "continue"),
        ],
    );
}
