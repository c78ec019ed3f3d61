use crate::app::AppState;
use crate::tui::{controls, footer, header, logs};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

const HEADER_HEIGHT: u16 = 2;
const CONTROLS_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 2;
const LOG_BORDER_HEIGHT: u16 = 2;

/// Rows available for log text in a terminal of `total_height` rows.
pub fn log_viewport_height(total_height: u16) -> usize {
    total_height
        .saturating_sub(HEADER_HEIGHT + CONTROLS_HEIGHT + FOOTER_HEIGHT + LOG_BORDER_HEIGHT)
        as usize
}

pub fn render(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(CONTROLS_HEIGHT),
            Constraint::Min(LOG_BORDER_HEIGHT + 1),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(f.area());

    header::render(f, chunks[0], state);
    controls::render(f, chunks[1], state);
    logs::render(f, chunks[2], state);
    footer::render(f, chunks[3], state);

    if let Some(err) = state.error_message() {
        let area = f.area();
        if area.height > 6 && area.width >= 4 {
            let err_area = Rect {
                x: area.x + 1,
                y: area.y + area.height.saturating_sub(5),
                width: area.width.saturating_sub(2),
                height: 3,
            };
            let err_widget = Paragraph::new(err.to_owned())
                .style(Style::default().fg(Color::Red))
                .block(
                    Block::default()
                        .title(" Error ")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                )
                .wrap(Wrap { trim: true });
            f.render_widget(err_widget, err_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::LogMode;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn viewport_height_subtracts_chrome() {
        assert_eq!(log_viewport_height(30), 21);
        assert_eq!(log_viewport_height(5), 0);
    }

    #[test]
    fn renders_status_buttons_and_logs() {
        let mut state = AppState::new("http://localhost:3000".to_string(), LogMode::Poll);
        let g = state.begin_status_request();
        state.apply_status(
            g,
            Ok(crate::api::parser::ContainerStatus {
                name: Some("web".to_string()),
                status: "running".to_string(),
            }),
        );
        let g = state.begin_log_request();
        state.apply_logs(g, Ok("hello from container\n".to_string()));

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| render(f, &state)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("running"));
        assert!(text.contains("web"));
        assert!(text.contains("Start"));
        assert!(text.contains("Stop"));
        assert!(text.contains("hello from container"));
        assert!(!text.contains("stick to bottom"));
    }

    #[test]
    fn stream_mode_shows_checkbox() {
        let state = AppState::new("http://localhost:3000".to_string(), LogMode::Stream);
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| render(f, &state)).unwrap();
        assert!(screen_text(&terminal).contains("[x] stick to bottom"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let state = AppState::new("http://localhost:3000".to_string(), LogMode::Poll);
        let mut terminal = Terminal::new(TestBackend::new(10, 4)).unwrap();
        terminal.draw(|f| render(f, &state)).unwrap();
    }
}
