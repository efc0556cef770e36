//! Final approval and thank-you steps

use crate::app::App;
use crate::state::{keys, option_label, LOAN_SUB_TYPE_OPTIONS, LOAN_TYPE_OPTIONS};
use crate::ui::components::{render_proceed_button, BUTTON_HEIGHT};
use crate::ui::forms::draw_help_text;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn summary_lines(app: &App) -> Vec<Line<'static>> {
    let form = app.wizard.form();
    let offer = app.wizard.offer();
    let label = Style::default().fg(Color::DarkGray);

    let mut product = form
        .selection(keys::LOAN_TYPE_GROUP)
        .map(|v| option_label(LOAN_TYPE_OPTIONS, v))
        .unwrap_or_default();
    if let Some(sub) = form.selection(keys::LOAN_SUB_TYPE_GROUP) {
        product = format!("{product} / {}", option_label(LOAN_SUB_TYPE_OPTIONS, sub));
    }

    let rows = [
        ("Applicant", form.text(keys::FULL_NAME)),
        ("Loan", product),
        ("Amount", offer.loan_amount_display()),
        ("EMI", offer.emi_display()),
        ("Tenure", format!("{} months", offer.tenure_months)),
        (
            "Documents",
            format!("{} uploaded", app.wizard.uploads().uploaded_count()),
        ),
    ];
    rows.into_iter()
        .map(|(name, value)| {
            Line::from(vec![
                Span::styled(format!("{name:<12}"), label),
                Span::raw(value),
            ])
        })
        .collect()
}

pub fn draw_final_approval(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Final Approval ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(BUTTON_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .margin(1)
        .split(inner);

    frame.render_widget(Paragraph::new(summary_lines(app)), chunks[0]);
    render_proceed_button(frame, chunks[1], "Submit Application", true);
    draw_help_text(frame, chunks[3], &[("Enter", "submit"), ("Esc", "back")]);
}

pub fn draw_thank_you(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Thank You ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(8),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .margin(1)
        .split(inner);

    let reference = app
        .wizard
        .application_ref()
        .map(|r| r.to_string())
        .unwrap_or_default();
    let submitted = app
        .wizard
        .submitted_at()
        .map(|at| at.format("%d/%m/%Y %H:%M UTC").to_string())
        .unwrap_or_default();
    let heading = Paragraph::new(vec![
        Line::from(Span::styled(
            "Your application has been submitted!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Reference: ", Style::default().fg(Color::DarkGray)),
            Span::styled(reference, Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("Submitted: ", Style::default().fg(Color::DarkGray)),
            Span::raw(submitted),
        ]),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    frame.render_widget(heading, chunks[0]);

    frame.render_widget(Paragraph::new(summary_lines(app)), chunks[1]);
    draw_help_text(
        frame,
        chunks[3],
        &[
            ("d", "download summary"),
            ("n", "new application"),
            ("q", "quit"),
        ],
    );
}
