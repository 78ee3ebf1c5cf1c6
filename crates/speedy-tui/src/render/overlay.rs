//! Search overlay view: query line, results list and status bar.

use crate::colors;
use crate::overlay::{Overlay, Phase};
use crate::widgets;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const PLACEHOLDER: &str = "Search files, folders and applications";

/// Render the overlay and return the inner area of the results list, one
/// result per row.
// Terminal dimensions are u16; widths are bounded by the terminal size
#[allow(clippy::cast_possible_truncation)]
pub fn render_overlay(f: &mut Frame, overlay: &Overlay) -> Rect {
    let bg_block = Block::default().style(Style::default().bg(colors::BG));
    f.render_widget(bg_block, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    let input_block = Block::default()
        .borders(Borders::ALL)
        .title(" Speedy ")
        .style(Style::default().bg(colors::SURFACE))
        .border_style(Style::default().fg(colors::PRIMARY));

    let input_width = chunks[0].width.saturating_sub(2) as usize;
    let (visible, cursor_x) = visible_query(overlay.query(), overlay.cursor(), input_width);
    let input_text = if overlay.query().is_empty() {
        Span::styled(PLACEHOLDER, Style::default().fg(colors::OUTLINE))
    } else {
        Span::styled(visible, Style::default().fg(colors::ON_SURFACE))
    };
    f.render_widget(Paragraph::new(input_text).block(input_block), chunks[0]);
    f.set_cursor_position((chunks[0].x + 1 + cursor_x as u16, chunks[0].y + 1));

    let results_block = Block::default()
        .borders(Borders::ALL)
        .title(results_title(overlay))
        .style(Style::default().bg(colors::SURFACE))
        .border_style(Style::default().fg(colors::OUTLINE));
    let list_area = results_block.inner(chunks[1]);
    f.render_widget(results_block, chunks[1]);

    if overlay.results().is_empty() {
        let message = Paragraph::new(Span::styled(
            empty_message(overlay.phase()),
            Style::default().fg(colors::OUTLINE),
        ));
        f.render_widget(message, list_area);
    } else {
        render_rows(f, overlay, list_area);
    }

    f.render_widget(status_bar(overlay), chunks[2]);

    list_area
}

fn render_rows(f: &mut Frame, overlay: &Overlay, area: Rect) {
    let width = area.width as usize;
    let offset = overlay.scroll_offset();

    let lines: Vec<Line> = overlay
        .results()
        .iter()
        .enumerate()
        .skip(offset)
        .take(area.height as usize)
        .map(|(i, result)| {
            let selected = overlay.selection() == Some(i);
            let line = widgets::result_line(result, selected, width);
            if selected {
                line.style(Style::default().bg(colors::SURFACE_HIGH))
            } else {
                line
            }
        })
        .collect();

    f.render_widget(Paragraph::new(lines), area);
}

/// Slice of `query` that fits in `width` columns with the cursor (a char
/// index) in view, and the cursor's column within that slice.
///
/// The last column is kept free so a cursor at the end stays inside the box.
fn visible_query(query: &str, cursor: usize, width: usize) -> (String, usize) {
    let chars: Vec<char> = query.chars().collect();
    let cursor = cursor.min(chars.len());
    let room = width.saturating_sub(1);

    let mut start = cursor;
    let mut cursor_x = 0;
    while start > 0 {
        let w = char_width(chars[start - 1]);
        if cursor_x + w > room {
            break;
        }
        cursor_x += w;
        start -= 1;
    }

    let mut used = 0;
    let visible = chars[start..]
        .iter()
        .take_while(|&&c| {
            used += char_width(c);
            used <= width
        })
        .collect();

    (visible, cursor_x)
}

fn char_width(c: char) -> usize {
    let mut buf = [0; 4];
    Span::raw(&*c.encode_utf8(&mut buf)).width()
}

fn results_title(overlay: &Overlay) -> String {
    let count = overlay.results().len();
    if overlay.phase() == Phase::OpenPending {
        format!(" Results ({count}) searching... ")
    } else {
        format!(" Results ({count}) ")
    }
}

fn empty_message(phase: Phase) -> &'static str {
    match phase {
        Phase::OpenPending => "Searching...",
        Phase::OpenNoMatch => "No matches",
        Phase::Closed | Phase::OpenEmpty | Phase::OpenResults => "Type to search",
    }
}

fn status_bar(overlay: &Overlay) -> Paragraph<'_> {
    let line = if let Some(status) = overlay.status() {
        Line::from(Span::styled(status, Style::default().fg(colors::ERROR)))
    } else {
        let key = Style::default()
            .fg(colors::PRIMARY)
            .add_modifier(Modifier::BOLD);
        let text = Style::default().fg(colors::SUBTEXT);
        let mut spans = Vec::new();
        for (k, label) in [
            ("Up/Down", " select  "),
            ("Enter", " open  "),
            ("Esc", " close  "),
            ("Ctrl+U", " clear"),
        ] {
            spans.push(Span::styled(k, key));
            spans.push(Span::styled(label, text));
        }
        if overlay.is_searching() {
            spans.push(Span::styled("   searching", Style::default().fg(colors::WARNING)));
        }
        Line::from(spans)
    };

    Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(colors::SURFACE))
            .border_style(Style::default().fg(colors::OUTLINE)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_messages() {
        assert_eq!(empty_message(Phase::OpenNoMatch), "No matches");
        assert_eq!(empty_message(Phase::OpenPending), "Searching...");
        assert_eq!(empty_message(Phase::OpenEmpty), "Type to search");
    }

    #[test]
    fn test_short_query_shown_whole() {
        assert_eq!(visible_query("report", 6, 20), ("report".to_string(), 6));
        assert_eq!(visible_query("report", 2, 20), ("report".to_string(), 2));
    }

    #[test]
    fn test_long_query_scrolls_to_cursor_at_end() {
        let query = "a".repeat(30) + "tail";
        let (visible, cursor_x) = visible_query(&query, 34, 10);

        assert!(visible.ends_with("tail"));
        assert_eq!(visible.chars().count(), 9);
        assert_eq!(cursor_x, 9);
        assert!(cursor_x < 10);
    }

    #[test]
    fn test_long_query_with_cursor_at_start_shows_head() {
        let query = "head".to_string() + &"z".repeat(30);
        let (visible, cursor_x) = visible_query(&query, 0, 10);

        assert_eq!(visible, "headzzzzzz");
        assert_eq!(cursor_x, 0);
    }

    #[test]
    fn test_wide_chars_keep_cursor_inside() {
        let query = "検索".repeat(10);
        let (visible, cursor_x) = visible_query(&query, 20, 9);

        assert!(cursor_x < 9);
        assert!(visible.chars().count() <= 4);
    }

    #[test]
    fn test_zero_width_box() {
        assert_eq!(visible_query("report", 6, 0), (String::new(), 0));
    }
}
