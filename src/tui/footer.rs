use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::cli::LogMode;

pub fn hints(state: &AppState, narrow: bool) -> Vec<(&'static str, &'static str)> {
    let mut hints = if narrow {
        vec![("s/x", "start/stop"), ("j/k", "scroll"), ("q", "quit")]
    } else {
        vec![
            ("s", "start"),
            ("x", "stop"),
            ("Tab/Enter", "buttons"),
            ("r", "refresh"),
            ("↑↓/jk", "scroll"),
            ("g/G", "top/bottom"),
            ("q", "quit"),
        ]
    };
    if state.config.log_mode == LogMode::Stream {
        hints.insert(hints.len() - 1, ("t", "stick"));
    }
    hints
}

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let narrow = area.width < crate::app::NARROW_WIDTH_THRESHOLD;

    let line = if let Some(notif) = state.notifications.last() {
        Line::from(vec![
            Span::styled("★ ", Style::default().fg(Color::Yellow)),
            Span::styled(&notif.message, Style::default().fg(Color::Yellow)),
        ])
    } else {
        let mut spans: Vec<Span> = Vec::new();
        for (i, (key, desc)) in hints(state, narrow).into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(key, Style::default().fg(Color::Cyan)));
            spans.push(Span::styled(
                format!(" {desc}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    };

    let footer = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stick_hint_only_in_stream_mode() {
        let poll = AppState::new(String::new(), LogMode::Poll);
        assert!(!hints(&poll, false).iter().any(|(k, _)| *k == "t"));
        let stream = AppState::new(String::new(), LogMode::Stream);
        let h = hints(&stream, false);
        assert!(h.iter().any(|(k, _)| *k == "t"));
        assert_eq!(h.last(), Some(&("q", "quit")));
    }
}
