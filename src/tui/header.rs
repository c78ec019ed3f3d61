use crate::app::{AppState, ERROR_MARKER, STATUS_EXITED, STATUS_RUNNING};
use crate::tui::spinner;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn status_color(label: &str) -> Color {
    match label {
        STATUS_RUNNING => Color::Green,
        STATUS_EXITED => Color::Yellow,
        ERROR_MARKER => Color::Red,
        _ => Color::White,
    }
}

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![
        Span::styled(
            format!(
                " ctw v{}+{} ",
                env!("CARGO_PKG_VERSION"),
                env!("BUILD_NUMBER")
            ),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
    ];

    if let Some(name) = &state.container_name {
        spans.push(Span::styled(
            name.as_str(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }

    // Status label, or a spinner until the first poll answers
    if state.status_received {
        spans.push(Span::styled(
            format!("[{}]", state.status_label),
            Style::default()
                .fg(status_color(&state.status_label))
                .add_modifier(Modifier::BOLD),
        ));
    } else {
        spans.push(Span::styled(
            format!("{}", spinner::frame(state.spinner_frame)),
            Style::default().fg(Color::Yellow),
        ));
    }

    if let Some(control) = state.control_in_flight {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("{} {}…", spinner::frame(state.spinner_frame), control.label()),
            Style::default().fg(Color::Yellow),
        ));
    }

    if let Some(at) = state.last_status_at {
        spans.push(Span::styled(
            format!(" {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if area.width >= crate::app::NARROW_WIDTH_THRESHOLD {
        spans.push(Span::styled(
            format!(" {}", state.config.base_url),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if state.error_message().is_some() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            "!",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    f.render_widget(header, area);
}
