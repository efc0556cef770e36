//! EMI offer step with the tenure slider

use crate::app::App;
use crate::ui::components::{render_proceed_button, BUTTON_HEIGHT};
use crate::ui::forms::draw_help_text;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let offer = app.wizard.offer();
    let defaults = app.wizard.defaults();

    let block = Block::default()
        .title(" Your Offer ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // EMI
            Constraint::Length(4),             // Amount and rate
            Constraint::Length(3),             // Tenure slider
            Constraint::Length(BUTTON_HEIGHT), // Proceed
            Constraint::Min(0),
            Constraint::Length(1), // Help
        ])
        .margin(1)
        .split(inner);

    let emi = Paragraph::new(Line::from(vec![
        Span::styled("Monthly EMI  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            offer.emi_display(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(emi, chunks[0]);

    let label = Style::default().fg(Color::DarkGray);
    let details = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Loan Amount    ", label),
            Span::raw(offer.loan_amount_display()),
        ]),
        Line::from(vec![
            Span::styled("Interest Rate  ", label),
            Span::raw(format!("{}% p.a.", offer.interest_rate_display())),
        ]),
        Line::from(vec![
            Span::styled("Total Payable  ", label),
            Span::raw(format!(
                "Rs. {}",
                crate::calculator::format_inr(offer.total_payable().round() as u64)
            )),
        ]),
    ]);
    frame.render_widget(details, chunks[1]);

    let span = defaults.tenure_max.saturating_sub(defaults.tenure_min).max(1);
    let ratio = f64::from(offer.tenure_months.saturating_sub(defaults.tenure_min)) / f64::from(span);
    let slider = Gauge::default()
        .block(
            Block::default()
                .title(format!(
                    " Tenure ({}-{} months) ",
                    defaults.tenure_min, defaults.tenure_max
                ))
                .borders(Borders::ALL),
        )
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{} months", offer.tenure_months));
    frame.render_widget(slider, chunks[2]);

    render_proceed_button(frame, chunks[3], "Proceed to Documents", true);
    draw_help_text(
        frame,
        chunks[5],
        &[("←→", "tenure"), ("Enter", "continue"), ("Esc", "back")],
    );
}
