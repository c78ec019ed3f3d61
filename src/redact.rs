use regex::Regex;
use std::borrow::Cow;
use std::sync::Arc;

/// Masks `a.b.c.d:port` socket addresses in log text.
pub struct Redactor {
    pattern: Regex,
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new()
    }
}

impl Redactor {
    pub fn new() -> Self {
        Self {
            // Literal pattern, known to compile
            pattern: Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}:\d{1,5}\b")
                .expect("static redaction pattern"),
        }
    }

    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(text, "[REDACTED]")
    }
}

/// Redacts a chunked stream one complete line at a time.
///
/// The unterminated tail of each chunk is held back until its newline arrives,
/// so an address split across chunks is still matched.
pub struct LineRedactor {
    redactor: Arc<Redactor>,
    pending: String,
}

impl LineRedactor {
    pub fn new(redactor: Arc<Redactor>) -> Self {
        Self {
            redactor,
            pending: String::new(),
        }
    }

    /// Returns the redacted complete lines buffered so far, if any.
    pub fn push(&mut self, chunk: &str) -> Option<String> {
        self.pending.push_str(chunk);
        let end = self.pending.rfind('\n')? + 1;
        let tail = self.pending.split_off(end);
        let lines = std::mem::replace(&mut self.pending, tail);
        Some(self.redactor.apply(&lines).into_owned())
    }

    /// Flushes the held-back tail at end of stream.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let tail = std::mem::take(&mut self.pending);
        Some(self.redactor.apply(&tail).into_owned())
    }
}
