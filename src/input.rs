use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    DismissError,
    Start,
    Stop,
    FocusNext,
    Activate,
    ToggleStick,
    RefreshStatus,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    ScrollToTop,
    ScrollToBottom,
    None,
}

/// Captures the UI state needed to interpret a key press.
#[derive(Debug, Clone, Default)]
pub struct InputContext {
    pub has_error: bool,
    pub start_enabled: bool,
    pub stop_enabled: bool,
    pub streaming: bool,
}

pub fn map_key(key: KeyEvent, ctx: &InputContext) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc => {
            if ctx.has_error {
                Action::DismissError
            } else {
                Action::Quit
            }
        }
        // Disabled buttons swallow the key
        KeyCode::Char('s') if ctx.start_enabled => Action::Start,
        KeyCode::Char('x') if ctx.stop_enabled => Action::Stop,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => Action::FocusNext,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Activate,
        KeyCode::Char('t') if ctx.streaming => Action::ToggleStick,
        KeyCode::Char('r') => Action::RefreshStatus,
        KeyCode::Up | KeyCode::Char('k') => Action::ScrollUp,
        KeyCode::Down | KeyCode::Char('j') => Action::ScrollDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Char('g') | KeyCode::Home => Action::ScrollToTop,
        KeyCode::Char('G') | KeyCode::End => Action::ScrollToBottom,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        }
    }

    fn ctx() -> InputContext {
        InputContext {
            has_error: false,
            start_enabled: true,
            stop_enabled: true,
            streaming: false,
        }
    }

    fn ctx_running() -> InputContext {
        InputContext {
            start_enabled: false,
            ..ctx()
        }
    }

    fn ctx_exited() -> InputContext {
        InputContext {
            stop_enabled: false,
            ..ctx()
        }
    }

    #[test]
    fn quit_q() {
        assert_eq!(map_key(press(KeyCode::Char('q')), &ctx()), Action::Quit);
    }

    #[test]
    fn ctrl_c_quits() {
        let key = KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..press(KeyCode::Char('c'))
        };
        assert_eq!(map_key(key, &ctx()), Action::Quit);
    }

    #[test]
    fn esc_quits_without_error() {
        assert_eq!(map_key(press(KeyCode::Esc), &ctx()), Action::Quit);
    }

    #[test]
    fn esc_dismisses_error() {
        let c = InputContext {
            has_error: true,
            ..ctx()
        };
        assert_eq!(map_key(press(KeyCode::Esc), &c), Action::DismissError);
    }

    #[test]
    fn release_ignored() {
        assert_eq!(map_key(release(KeyCode::Char('q')), &ctx()), Action::None);
    }

    #[test]
    fn start_key_when_enabled() {
        assert_eq!(map_key(press(KeyCode::Char('s')), &ctx_exited()), Action::Start);
    }

    #[test]
    fn start_key_ignored_while_running() {
        assert_eq!(map_key(press(KeyCode::Char('s')), &ctx_running()), Action::None);
    }

    #[test]
    fn stop_key_when_enabled() {
        assert_eq!(map_key(press(KeyCode::Char('x')), &ctx_running()), Action::Stop);
    }

    #[test]
    fn stop_key_ignored_while_exited() {
        assert_eq!(map_key(press(KeyCode::Char('x')), &ctx_exited()), Action::None);
    }

    #[test]
    fn tab_and_arrows_move_focus() {
        assert_eq!(map_key(press(KeyCode::Tab), &ctx()), Action::FocusNext);
        assert_eq!(map_key(press(KeyCode::Left), &ctx()), Action::FocusNext);
        assert_eq!(map_key(press(KeyCode::Right), &ctx()), Action::FocusNext);
    }

    #[test]
    fn enter_activates() {
        assert_eq!(map_key(press(KeyCode::Enter), &ctx()), Action::Activate);
    }

    #[test]
    fn toggle_stick_only_when_streaming() {
        assert_eq!(map_key(press(KeyCode::Char('t')), &ctx()), Action::None);
        let c = InputContext {
            streaming: true,
            ..ctx()
        };
        assert_eq!(map_key(press(KeyCode::Char('t')), &c), Action::ToggleStick);
    }

    #[test]
    fn refresh_r() {
        assert_eq!(map_key(press(KeyCode::Char('r')), &ctx()), Action::RefreshStatus);
    }

    #[test]
    fn scroll_keys() {
        assert_eq!(map_key(press(KeyCode::Char('j')), &ctx()), Action::ScrollDown);
        assert_eq!(map_key(press(KeyCode::Down), &ctx()), Action::ScrollDown);
        assert_eq!(map_key(press(KeyCode::Char('k')), &ctx()), Action::ScrollUp);
        assert_eq!(map_key(press(KeyCode::PageDown), &ctx()), Action::PageDown);
        assert_eq!(map_key(press(KeyCode::PageUp), &ctx()), Action::PageUp);
        assert_eq!(map_key(press(KeyCode::Char('g')), &ctx()), Action::ScrollToTop);
    }

    #[test]
    #[allow(non_snake_case)]
    fn scroll_to_bottom_G() {
        assert_eq!(map_key(press(KeyCode::Char('G')), &ctx()), Action::ScrollToBottom);
    }

    #[test]
    fn unknown_key_none() {
        assert_eq!(map_key(press(KeyCode::Char('z')), &ctx()), Action::None);
    }
}
