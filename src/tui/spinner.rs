use crate::app::SPINNER_FRAME_COUNT;

const FRAMES: [char; SPINNER_FRAME_COUNT] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn frame(idx: usize) -> char {
    FRAMES[idx % FRAMES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_braille() {
        assert!(FRAMES.iter().all(|ch| ('\u{2800}'..='\u{28FF}').contains(ch)));
    }

    #[test]
    fn wraps_with_app_frame_counter() {
        assert_eq!(frame(0), frame(SPINNER_FRAME_COUNT));
        let _ = frame(usize::MAX);
    }
}
