//! Document upload step

use crate::app::App;
use crate::state::DocumentId;
use crate::ui::components::{render_proceed_button, BUTTON_HEIGHT};
use crate::ui::forms::draw_help_text;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let uploads = app.wizard.uploads();

    let block = Block::default()
        .title(" Upload Documents ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(DocumentId::REQUIRED.len() as u16 + 2), // Checklist
            Constraint::Length(3),                                     // Path input
            Constraint::Length(BUTTON_HEIGHT),                         // Proceed
            Constraint::Min(0),
            Constraint::Length(1), // Help
        ])
        .margin(1)
        .split(inner);

    let items: Vec<ListItem> = DocumentId::REQUIRED
        .iter()
        .map(|id| {
            let line = match uploads.get(*id) {
                Some(meta) => Line::from(vec![
                    Span::styled("✓ ", Style::default().fg(Color::Green)),
                    Span::raw(id.label()),
                    Span::styled(
                        format!("  {} ({} KB)", meta.name, meta.byte_size.div_ceil(1024)),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                None => Line::from(vec![
                    Span::styled("○ ", Style::default().fg(Color::Yellow)),
                    Span::raw(id.label()),
                ]),
            };
            ListItem::new(line)
        })
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(
                    " {} of {} uploaded ",
                    uploads.uploaded_count(),
                    DocumentId::REQUIRED.len()
                ))
                .borders(Borders::ALL),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▸ ");
    let mut state = ListState::default().with_selected(Some(app.focus_index()));
    frame.render_stateful_widget(list, chunks[0], &mut state);

    let path_input = Paragraph::new(Line::from(vec![
        Span::raw(app.upload_path.as_str()),
        Span::styled("▌", Style::default().fg(Color::Cyan)),
    ]))
    .block(
        Block::default()
            .title(format!(
                " File for {} (pdf, jpg, png; max {} MB) ",
                app.focused_document().label(),
                app.config.max_upload_bytes() / (1024 * 1024)
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(path_input, chunks[1]);

    render_proceed_button(frame, chunks[2], &uploads.proceed_label(), uploads.is_complete());
    draw_help_text(
        frame,
        chunks[4],
        &[
            ("↑↓", "document"),
            ("Enter", "upload path / continue"),
            ("Esc", "back"),
        ],
    );
}
