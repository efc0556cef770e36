//! Layout components (header, progress indicator, status bar)

use crate::app::App;
use crate::state::WizardStep;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Areas of the main screen
pub struct ScreenLayout {
    pub header: Rect,
    /// Present only on the four core steps
    pub progress: Option<Rect>,
    pub body: Rect,
    pub status: Rect,
}

/// Split the screen into header, optional progress row, body and status bar
pub fn create_layout(area: Rect, show_progress: bool) -> ScreenLayout {
    let progress_height = if show_progress { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),               // Header
            Constraint::Length(progress_height), // Progress
            Constraint::Min(0),                  // Content
            Constraint::Length(1),               // Status bar
        ])
        .split(area);

    ScreenLayout {
        header: chunks[0],
        progress: show_progress.then_some(chunks[1]),
        body: chunks[2],
        status: chunks[3],
    }
}

/// Draw the title line with the application date on the right
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = Span::styled(
        " Loan Application ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(Paragraph::new(Line::from(title)), area);

    let date = format!(" Date: {} ", app.application_date());
    let date_width = date.chars().count() as u16;
    let date_area = Rect {
        x: area.x + area.width.saturating_sub(date_width),
        y: area.y,
        width: date_width.min(area.width),
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(date).style(Style::default().fg(Color::DarkGray)),
        date_area,
    );
}

/// Stepper spans: done steps green, current cyan, upcoming grey
pub fn progress_spans(current: WizardStep) -> Vec<Span<'static>> {
    let position = current.core_index().unwrap_or(0);
    let mut spans = vec![Span::raw(" ")];
    for (idx, step) in WizardStep::CORE.iter().enumerate() {
        let number = idx + 1;
        let (marker, style) = if number < position {
            ("✓", Style::default().fg(Color::Green))
        } else if number == position {
            (
                "●",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("○", Style::default().fg(Color::DarkGray))
        };
        if idx > 0 {
            spans.push(Span::styled(" ── ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            format!("{marker} {number} {}", step.stepper_label()),
            style,
        ));
    }
    spans
}

pub fn draw_progress(frame: &mut Frame, area: Rect, current: WizardStep) {
    frame.render_widget(Paragraph::new(Line::from(progress_spans(current))), area);
}

fn step_hints(step: WizardStep) -> &'static str {
    match step {
        WizardStep::LoanSelection => " ←→:choose Enter:continue",
        WizardStep::BasicDetails | WizardStep::PersonalDetails | WizardStep::IncomeDetails => {
            " Tab:next Enter:continue Esc:back"
        }
        WizardStep::Offer => " ←→:tenure Enter:continue Esc:back",
        WizardStep::DocumentUpload => " ↑↓:document Enter:upload Esc:back",
        WizardStep::FinalApproval => " Enter:submit Esc:back",
        WizardStep::ThankYou => " d:download n:new q:quit",
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let step = app.wizard.current_step();
    let mut spans = vec![Span::styled(
        step_hints(step),
        Style::default().fg(Color::Gray),
    )];

    if let Some(label) = app.busy_label() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(label, Style::default().fg(Color::Yellow)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    let quit_hint = " ^R:restart ^C:quit ";
    let quit_width = quit_hint.len() as u16;
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_width),
        y: area.y,
        width: quit_width.min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}
