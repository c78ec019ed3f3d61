use crate::api::parser::ContainerStatus;
use crate::cli::LogMode;
use crate::events::Control;
use chrono::{DateTime, Local};
use std::time::Instant;

// Polling intervals (seconds)
pub const STATUS_INTERVAL_SECS: u64 = 6;
pub const LOG_INTERVAL_SECS: u64 = 10;

/// Shown in the status label or the log pane when a request fails.
pub const ERROR_MARKER: &str = "error";

pub const STATUS_RUNNING: &str = "running";
pub const STATUS_EXITED: &str = "exited";

// UI constants
pub const NOTIFICATION_TTL_SECS: u64 = 5;
pub const ERROR_TTL_SECS: u64 = 10;
pub const SPINNER_FRAME_COUNT: usize = 10;
pub const NARROW_WIDTH_THRESHOLD: u16 = 60;
pub const PAGE_SCROLL_LINES: usize = 20;

/// Enabled flags of the two control buttons.
///
/// Both start enabled, like a freshly rendered HTML button, until a known
/// status is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Buttons {
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

impl Default for Buttons {
    fn default() -> Self {
        Self {
            start_enabled: true,
            stop_enabled: true,
        }
    }
}

impl Buttons {
    /// Applies the status -> buttons mapping. Unrecognized statuses leave the
    /// buttons as they were and return `false`.
    pub fn apply_status(&mut self, status: &str) -> bool {
        match status {
            STATUS_RUNNING => {
                self.start_enabled = false;
                self.stop_enabled = true;
                true
            }
            STATUS_EXITED => {
                self.start_enabled = true;
                self.stop_enabled = false;
                true
            }
            _ => false,
        }
    }

    pub fn is_enabled(&self, control: Control) -> bool {
        match control {
            Control::Start => self.start_enabled,
            Control::Stop => self.stop_enabled,
        }
    }
}

/// Text shown in the log pane plus its viewport.
///
/// The line count is maintained incrementally so appending stream chunks does
/// not rescan the whole buffer.
#[derive(Debug, Default)]
pub struct LogView {
    text: String,
    newlines: usize,
    pub scroll: usize,
    pub viewport_height: usize,
    pub stick_to_bottom: bool,
}

impl LogView {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.newlines + usize::from(!self.text.is_empty() && !self.text.ends_with('\n'))
    }

    pub fn max_scroll(&self) -> usize {
        self.line_count().saturating_sub(self.viewport_height)
    }

    /// Replaces the whole buffer. The scroll position is kept, clamped to the
    /// new content.
    pub fn replace(&mut self, text: String) {
        self.newlines = text.matches('\n').count();
        self.text = text;
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Empties the buffer for a reconnect. `scroll` is left alone so a replay
    /// of the same history lands the reader where they were.
    pub fn clear(&mut self) {
        self.text.clear();
        self.newlines = 0;
    }

    /// `scroll` clamped to the current content.
    pub fn visible_scroll(&self) -> usize {
        self.scroll.min(self.max_scroll())
    }

    pub fn clamp_scroll(&mut self) {
        self.scroll = self.visible_scroll();
    }

    pub fn append(&mut self, chunk: &str) {
        self.newlines += chunk.matches('\n').count();
        self.text.push_str(chunk);
        if self.stick_to_bottom {
            self.scroll_to_bottom();
        }
    }

    pub fn fail(&mut self) {
        self.replace(ERROR_MARKER.to_string());
    }

    /// Called on every loop turn. Does not clamp: mid-reconnect the buffer is
    /// briefly empty and the reader's position must survive it.
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll = self.visible_scroll().saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll = (self.scroll + amount).min(self.max_scroll());
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonFocus {
    #[default]
    Start,
    Stop,
}

impl ButtonFocus {
    pub fn control(self) -> Control {
        match self {
            ButtonFocus::Start => Control::Start,
            ButtonFocus::Stop => Control::Stop,
        }
    }
}

/// What `apply_status` did with a status result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOutcome {
    /// A newer request was issued after this one; nothing changed.
    Stale,
    /// The label now shows the error marker.
    Failed,
    Applied {
        /// `(old, new)` when the label moved between two reported statuses.
        transition: Option<(String, String)>,
    },
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub timestamp: Instant,
}

/// Immutable configuration set at startup.
pub struct AppConfig {
    pub base_url: String,
    pub log_mode: LogMode,
}

pub struct AppState {
    pub config: AppConfig,

    // Status
    pub status_label: String,
    pub container_name: Option<String>,
    pub status_received: bool,
    pub last_status_at: Option<DateTime<Local>>,
    pub buttons: Buttons,
    pub focus: ButtonFocus,
    pub control_in_flight: Option<Control>,

    // Logs
    pub logs: LogView,
    pub initial_scroll_pending: bool,
    pub stream_open: bool,

    // Request generations
    status_generation: u64,
    log_generation: u64,

    // Transient UI
    pub notifications: Vec<Notification>,
    pub error: Option<(String, Instant)>,
    pub spinner_frame: usize,
    pub should_quit: bool,

    pub desktop_notify: bool,
}

impl AppState {
    pub fn new(base_url: String, log_mode: LogMode) -> Self {
        Self {
            config: AppConfig { base_url, log_mode },
            status_label: String::new(),
            container_name: None,
            status_received: false,
            last_status_at: None,
            buttons: Buttons::default(),
            focus: ButtonFocus::default(),
            control_in_flight: None,
            logs: LogView {
                stick_to_bottom: log_mode == LogMode::Stream,
                ..LogView::default()
            },
            initial_scroll_pending: log_mode != LogMode::Stream,
            stream_open: false,
            status_generation: 0,
            log_generation: 0,
            notifications: Vec::new(),
            error: None,
            spinner_frame: 0,
            should_quit: false,
            desktop_notify: true,
        }
    }

    // --- Status ---

    /// Reserves the generation for a new status request.
    pub fn begin_status_request(&mut self) -> u64 {
        self.status_generation += 1;
        self.status_generation
    }

    pub fn apply_status(
        &mut self,
        generation: u64,
        result: Result<ContainerStatus, String>,
    ) -> StatusOutcome {
        if generation != self.status_generation {
            return StatusOutcome::Stale;
        }
        match result {
            Ok(status) => {
                let previous = std::mem::replace(&mut self.status_label, status.status.clone());
                let had_status = self.status_received && previous != ERROR_MARKER;
                self.status_received = true;
                self.last_status_at = Some(Local::now());
                if status.name.is_some() {
                    self.container_name = status.name;
                }
                self.buttons.apply_status(&status.status);
                let transition = (had_status && previous != status.status)
                    .then(|| (previous, status.status));
                StatusOutcome::Applied { transition }
            }
            Err(_) => {
                self.status_label = ERROR_MARKER.to_string();
                self.status_received = true;
                StatusOutcome::Failed
            }
        }
    }

    // --- Controls ---

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            ButtonFocus::Start => ButtonFocus::Stop,
            ButtonFocus::Stop => ButtonFocus::Start,
        };
    }

    /// The focused control, if its button is enabled.
    pub fn focused_control(&self) -> Option<Control> {
        let control = self.focus.control();
        self.buttons.is_enabled(control).then_some(control)
    }

    // --- Logs ---

    /// Reserves the generation for a new log fetch or stream connection.
    pub fn begin_log_request(&mut self) -> u64 {
        self.log_generation += 1;
        self.log_generation
    }

    pub fn is_current_log(&self, generation: u64) -> bool {
        generation == self.log_generation
    }

    /// Full-fetch result: the buffer is replaced, never concatenated.
    pub fn apply_logs(&mut self, generation: u64, result: Result<String, String>) -> bool {
        if !self.is_current_log(generation) {
            return false;
        }
        match result {
            Ok(text) => self.logs.replace(text),
            Err(_) => self.logs.fail(),
        }
        if self.initial_scroll_pending {
            self.initial_scroll_pending = false;
            self.logs.scroll_to_bottom();
        }
        true
    }

    /// A new streaming connection starts from an empty buffer.
    pub fn stream_opened(&mut self, generation: u64) -> bool {
        if !self.is_current_log(generation) {
            return false;
        }
        self.stream_open = true;
        self.logs.clear();
        true
    }

    pub fn append_stream(&mut self, generation: u64, text: &str) -> bool {
        if !self.is_current_log(generation) {
            return false;
        }
        self.logs.append(text);
        true
    }

    /// Streamed content so far is discarded in favour of the error marker.
    pub fn stream_failed(&mut self, generation: u64) -> bool {
        if !self.is_current_log(generation) {
            return false;
        }
        self.stream_open = false;
        self.logs.fail();
        true
    }

    pub fn stream_ended(&mut self, generation: u64) -> bool {
        if !self.is_current_log(generation) {
            return false;
        }
        self.stream_open = false;
        self.logs.clamp_scroll();
        true
    }

    pub fn toggle_stick_to_bottom(&mut self) {
        if self.config.log_mode == LogMode::Stream {
            self.logs.stick_to_bottom = !self.logs.stick_to_bottom;
        }
    }

    // --- Transient UI ---

    pub fn push_notification(&mut self, message: String) {
        self.notifications.push(Notification {
            message,
            timestamp: Instant::now(),
        });
    }

    pub fn prune_notifications(&mut self) {
        let now = Instant::now();
        self.notifications
            .retain(|n| now.duration_since(n.timestamp).as_secs() < NOTIFICATION_TTL_SECS);
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAME_COUNT;
    }

    pub fn set_error(&mut self, msg: String) {
        self.error = Some((msg, Instant::now()));
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn prune_error(&mut self) {
        if let Some((_, ts)) = &self.error {
            if ts.elapsed().as_secs() >= ERROR_TTL_SECS {
                self.error = None;
            }
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|(msg, _)| msg.as_str())
    }
}
