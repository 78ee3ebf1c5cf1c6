//! Result row widget.
//!
//! Each row reads `<glyph> <name>  <path> ... <score>`, with the score
//! right-aligned and omitted for unscored results.

use crate::colors;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use speedy_core::{ResultKind, SearchResult};

/// Display glyph for a result kind.
#[must_use]
pub fn kind_glyph(kind: ResultKind) -> &'static str {
    match kind {
        ResultKind::File => "📄",
        ResultKind::Folder => "📁",
        ResultKind::Application => "🚀",
    }
}

/// `round(score * 100)` followed by `%`, or `None` when unscored.
#[must_use]
// Score is clamped to [0, 1] first, so the product fits a u8
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn score_label(score: Option<f64>) -> Option<String> {
    let score = score.filter(|s| s.is_finite())?.clamp(0.0, 1.0);
    Some(format!("{}%", (score * 100.0).round() as u8))
}

/// Build one list row, padded to `width` columns so the score sits at the
/// right edge.
#[must_use]
pub fn result_line(result: &SearchResult, selected: bool, width: usize) -> Line<'_> {
    let name_style = if selected {
        Style::default()
            .fg(colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors::ON_SURFACE)
    };
    let marker = if selected { "> " } else { "  " };

    let mut left = vec![
        Span::styled(marker, Style::default().fg(colors::PRIMARY)),
        Span::raw(kind_glyph(result.kind)),
        Span::raw(" "),
        Span::styled(result.name.as_str(), name_style),
        Span::raw("  "),
    ];

    let score = score_label(result.clamped_score()).unwrap_or_default();
    let used: usize = left.iter().map(Span::width).sum::<usize>() + score.chars().count();
    let path_room = width.saturating_sub(used + 1);

    left.push(Span::styled(
        truncate_start(&result.path, path_room),
        Style::default().fg(colors::OUTLINE),
    ));

    let used: usize = left.iter().map(Span::width).sum::<usize>() + score.chars().count();
    left.push(Span::raw(" ".repeat(width.saturating_sub(used))));
    left.push(Span::styled(score, Style::default().fg(colors::SUBTEXT)));

    Line::from(left)
}

/// Keep the tail of a path, which is usually the informative part.
fn truncate_start(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max {
        return text.to_string();
    }
    if max <= 3 {
        return String::new();
    }
    let tail: String = text.chars().skip(count - (max - 3)).collect();
    format!("...{tail}")
}
