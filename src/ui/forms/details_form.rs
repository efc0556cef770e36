//! Basic, personal and income detail steps

use super::field_renderer::{draw_field, draw_help_text, FIELD_HEIGHT};
use crate::app::App;
use crate::state::{keys, WizardStep};
use crate::ui::components::{render_proceed_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw the focused step's fields in two columns
pub fn draw_details_form(frame: &mut Frame, area: Rect, app: &App) {
    let step = app.wizard.current_step();
    let fields = app.visible_fields();
    let rows = fields.len().div_ceil(2) as u16;
    let extra = match step {
        WizardStep::BasicDetails | WizardStep::IncomeDetails => 3,
        _ => 0,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(rows * FIELD_HEIGHT), // Fields
            Constraint::Length(extra),               // Verification or income summary
            Constraint::Length(BUTTON_HEIGHT),       // Proceed
            Constraint::Min(0),
            Constraint::Length(1), // Help
        ])
        .margin(1)
        .split(area);

    let block = Block::default()
        .title(format!(" {} ", step.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(FIELD_HEIGHT); rows as usize])
        .split(chunks[0]);

    let validation = app.wizard.last_validation();
    let focus = app.focus_index();
    for (idx, field) in fields.iter().enumerate() {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(row_areas[idx / 2]);
        let value = app.wizard.field_text(field.key);
        draw_field(
            frame,
            columns[idx % 2],
            field,
            &value,
            idx == focus,
            validation.error_for(field.key),
        );
    }

    match step {
        WizardStep::BasicDetails => draw_verification(frame, chunks[1], app),
        WizardStep::IncomeDetails => draw_income_summary(frame, chunks[1], app),
        _ => {}
    }

    render_proceed_button(frame, chunks[2], "Continue", validation.is_valid());

    let mut hints = vec![
        ("Tab", "next"),
        ("Shift+Tab", "prev"),
        ("Enter", "continue"),
        ("Esc", "back"),
    ];
    if step == WizardStep::BasicDetails {
        hints.push(("^V", "verify mobile"));
        hints.push(("^D", "demo data"));
    }
    draw_help_text(frame, chunks[4], &hints);
}

fn draw_verification(frame: &mut Frame, area: Rect, app: &App) {
    let line = if app.wizard.is_mobile_verified() {
        Line::from(Span::styled(
            format!("✓ Mobile {} verified", app.wizard.form().text(keys::MOBILE)),
            Style::default().fg(Color::Green),
        ))
    } else {
        Line::from(vec![
            Span::styled("Mobile not verified. Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("Ctrl+V", Style::default().fg(Color::Cyan)),
            Span::styled(" to send a code.", Style::default().fg(Color::DarkGray)),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_income_summary(frame: &mut Frame, area: Rect, app: &App) {
    let summary = app.wizard.income_summary();
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let line = Line::from(vec![
        Span::styled("Total Income: ", label),
        Span::styled(format!("Rs. {:.2}", summary.total_income), value),
        Span::raw("    "),
        Span::styled("Net Monthly Salary: ", label),
        Span::styled(format!("Rs. {:.2}", summary.net_monthly_salary), value),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(line).block(block), area);
}
