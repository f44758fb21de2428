use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::Hymn;

/// Accent used for hymn numbers, the app title and the active tab.
pub(crate) const ACCENT: Color = Color::Green;
/// Highlight for favorites.
pub(crate) const FAVORITE: Color = Color::LightRed;

/// Title line with the parenthesized sub-title dimmed and italic, the way the
/// cards and the detail header show it.
pub(crate) fn title_spans(hymn: &Hymn, base: Style) -> Vec<Span<'static>> {
    let (main, sub) = hymn.title_parts();
    let mut spans = vec![Span::styled(main.to_string(), base)];
    if let Some(sub) = sub {
        spans.push(Span::styled(
            format!(" ({sub})"),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        ));
    }
    spans
}

/// Lines for one hymn card: number badge and title, then composer and
/// category.
pub(crate) fn hymn_card_lines(hymn: &Hymn, selected: bool, favorite: bool) -> Vec<Line<'static>> {
    let badge_style = Style::default()
        .fg(if favorite { FAVORITE } else { ACCENT })
        .add_modifier(Modifier::BOLD);
    let marker = if selected { "▶ " } else { "  " };
    let heart = if favorite { " ♥" } else { "" };

    let mut first = vec![
        Span::raw(marker),
        Span::styled(format!("{:>4}", hymn.number()), badge_style),
        Span::styled(heart, Style::default().fg(FAVORITE)),
        Span::raw("  "),
    ];
    first.extend(title_spans(hymn, Style::default().add_modifier(Modifier::BOLD)));

    let mut lines = vec![Line::from(first)];
    let meta_style = Style::default().fg(Color::Gray);
    if let Some(composer) = hymn.composer() {
        lines.push(Line::from(vec![
            Span::raw("        "),
            Span::styled(format!("✎ {composer}"), meta_style),
        ]));
    }
    lines.push(Line::from(vec![
        Span::raw("        "),
        Span::styled(format!("# {}", hymn.category), meta_style),
    ]));
    lines
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Horizontal band of `percent_x` of the width, full height.
pub(crate) fn centered_column(percent_x: u16, area: Rect) -> Rect {
    let percent_x = percent_x.min(100);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area)[1]
}

/// Column for the text cursor after `text` in `area`, kept inside the area.
pub(crate) fn cursor_column(area: Rect, text: &str) -> u16 {
    let typed = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    let last = area.right().saturating_sub(1).max(area.x);
    area.x.saturating_add(typed).min(last)
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn cursor_stays_inside_the_search_box() {
        let area = Rect::new(2, 1, 10, 1);
        assert_eq!(cursor_column(area, ""), 2);
        assert_eq!(cursor_column(area, "গান"), 5);
        assert_eq!(cursor_column(area, &"x".repeat(70_000)), 11);

        let edge = Rect::new(u16::MAX - 3, 0, 3, 1);
        assert_eq!(cursor_column(edge, "abcdef"), u16::MAX - 1);
    }

    #[test]
    fn surfaces_innermost_cause() {
        let err = anyhow!("disk full").context("failed to save favorite");
        assert_eq!(surface_error(&err), "disk full");
    }

    #[test]
    fn card_shows_composer_only_when_present() {
        let mut hymn = Hymn {
            id: 3,
            title: "Amazing Grace (Earthly Tune)".into(),
            category: "অনুগ্রহ".into(),
            lyrics: String::new(),
            transliteration: None,
            composer: Some("John Newton".into()),
        };
        assert_eq!(hymn_card_lines(&hymn, false, false).len(), 3);
        hymn.composer = None;
        assert_eq!(hymn_card_lines(&hymn, true, true).len(), 2);
    }

    #[test]
    fn subtitle_gets_its_own_span() {
        let hymn = Hymn {
            id: 3,
            title: "Amazing Grace (Earthly Tune)".into(),
            category: "c".into(),
            lyrics: String::new(),
            transliteration: None,
            composer: None,
        };
        let spans = title_spans(&hymn, Style::default());
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].content, "Amazing Grace");
        assert_eq!(spans[1].content, " (Earthly Tune)");
    }
}
