use crate::app::{AppState, ButtonFocus};
use crate::cli::LogMode;
use crate::events::Control;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

fn button(label: &str, enabled: bool, focused: bool) -> Span<'static> {
    let style = match (enabled, focused) {
        (false, _) => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM),
        (true, true) => Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        (true, false) => Style::default().fg(Color::Cyan),
    };
    Span::styled(format!("[ {label} ]"), style)
}

pub fn checkbox_label(checked: bool) -> String {
    format!("[{}] stick to bottom", if checked { 'x' } else { ' ' })
}

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![
        Span::raw(" "),
        button(
            "Start",
            state.buttons.is_enabled(Control::Start),
            state.focus == ButtonFocus::Start,
        ),
        Span::raw("  "),
        button(
            "Stop",
            state.buttons.is_enabled(Control::Stop),
            state.focus == ButtonFocus::Stop,
        ),
    ];

    if state.config.log_mode == LogMode::Stream {
        spans.push(Span::raw("    "));
        spans.push(Span::styled(
            checkbox_label(state.logs.stick_to_bottom),
            Style::default().fg(Color::White),
        ));
    }

    let controls = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(controls, area);
}
