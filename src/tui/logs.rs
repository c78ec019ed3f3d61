use crate::app::AppState;
use crate::cli::LogMode;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn title(state: &AppState, inner_height: usize) -> String {
    let mode = match state.config.log_mode {
        LogMode::Poll => "logs",
        LogMode::Once => "logs (snapshot)",
        LogMode::Stream if state.stream_open => "logs (live)",
        LogMode::Stream => "logs (stream closed)",
    };
    let total = state.logs.line_count();
    if total > inner_height {
        format!(
            " {mode} [{}-{}/{}] ",
            state.logs.visible_scroll() + 1,
            (state.logs.visible_scroll() + inner_height).min(total),
            total
        )
    } else {
        format!(" {mode} ")
    }
}

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let inner_height = area.height.saturating_sub(2) as usize;

    let block = Block::default()
        .title(title(state, inner_height))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    // Only the visible window is handed to ratatui
    let visible_lines: Vec<Line> = state
        .logs
        .text()
        .lines()
        .skip(state.logs.visible_scroll())
        .take(inner_height)
        .map(Line::raw)
        .collect();

    f.render_widget(Paragraph::new(visible_lines).block(block), area);
}
