//! Screen shown while the overlay is hidden.

use super::Hints;
use crate::colors;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

pub fn render_hint(f: &mut Frame, hints: &Hints) {
    let bg_block = Block::default().style(Style::default().bg(colors::BG));
    f.render_widget(bg_block, f.area());

    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(f.area());

    let key = Style::default()
        .fg(colors::PRIMARY)
        .add_modifier(Modifier::BOLD);
    let text = Style::default().fg(colors::SUBTEXT);

    let lines = vec![
        Line::from(Span::styled(
            "Speedy",
            Style::default()
                .fg(colors::ON_SURFACE)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(hints.toggle.clone(), key),
            Span::styled(" search   ", text),
            Span::styled(hints.quit.clone(), key),
            Span::styled(" quit", text),
        ]),
    ];

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), middle);
}
