//! The dashboard controller.
//!
//! [`Dashboard`] owns the backend handle, the two repeating timers and the
//! open log stream. Its operations are called from the event loop with the
//! [`AppState`] they mutate; anything that touches the network is spawned and
//! reports back as an [`AppEvent`], which the loop hands to
//! [`Dashboard::handle_event`]. Each request carries a generation number so
//! only the newest result of each kind reaches the UI.

use crate::api::parser;
use crate::app::{AppState, StatusOutcome, LOG_INTERVAL_SECS, STATUS_INTERVAL_SECS};
use crate::cli::LogMode;
use crate::events::{AppEvent, Control};
use crate::redact::{LineRedactor, Redactor};
use crate::timer::RepeatingTimer;
use crate::traits::ContainerApi;
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy)]
pub struct DashboardConfig {
    pub status_interval: Duration,
    pub log_interval: Duration,
    pub log_mode: LogMode,
    pub redact: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            status_interval: Duration::from_secs(STATUS_INTERVAL_SECS),
            log_interval: Duration::from_secs(LOG_INTERVAL_SECS),
            log_mode: LogMode::Poll,
            redact: false,
        }
    }
}

pub struct Dashboard {
    api: Arc<dyn ContainerApi>,
    tx: mpsc::UnboundedSender<AppEvent>,
    config: DashboardConfig,
    redactor: Option<Arc<Redactor>>,
    status_timer: RepeatingTimer,
    log_timer: RepeatingTimer,
    stream_task: Option<JoinHandle<()>>,
    /// Set by `start`; the log timer is armed once the first acquisition completes.
    log_timer_pending: bool,
}

impl Dashboard {
    pub fn new(
        api: Arc<dyn ContainerApi>,
        tx: mpsc::UnboundedSender<AppEvent>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            api,
            tx,
            config,
            redactor: config.redact.then(|| Arc::new(Redactor::new())),
            status_timer: RepeatingTimer::new("status"),
            log_timer: RepeatingTimer::new("logs"),
            stream_task: None,
            log_timer_pending: false,
        }
    }

    /// Initial status refresh, status timer, initial log acquisition.
    pub fn start(&mut self, state: &mut AppState) {
        tracing::info!("dashboard starting ({:?} logs)", self.config.log_mode);
        self.refresh_status(state);
        self.restart_status_timer();
        self.log_timer_pending = self.config.log_mode != LogMode::Once;
        self.acquire_logs(state);
    }

    /// Clears both timers and closes the log stream. In-flight fetches still
    /// complete, but their results no longer reach a listening loop.
    pub fn dispose(&mut self) {
        tracing::info!("dashboard disposed");
        self.status_timer.clear();
        self.log_timer.clear();
        self.log_timer_pending = false;
        self.close_stream();
    }

    pub fn status_timer(&self) -> &RepeatingTimer {
        &self.status_timer
    }

    pub fn log_timer(&self) -> &RepeatingTimer {
        &self.log_timer
    }

    pub fn has_open_stream(&self) -> bool {
        self.stream_task.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn restart_status_timer(&mut self) {
        self.status_timer
            .restart(self.config.status_interval, self.tx.clone(), || AppEvent::StatusTick);
    }

    fn arm_log_timer_if_pending(&mut self) {
        if self.log_timer_pending {
            self.log_timer_pending = false;
            self.log_timer
                .restart(self.config.log_interval, self.tx.clone(), || AppEvent::LogTick);
        }
    }

    // --- Status ---

    pub fn refresh_status(&self, state: &mut AppState) {
        let generation = state.begin_status_request();
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = match api.fetch_status().await {
                Ok(body) => parser::parse_status(&body).map_err(|e| format!("Parse error: {e}")),
                Err(e) => Err(format!("{e}")),
            };
            let _ = tx.send(AppEvent::StatusFetched { generation, result });
        });
    }

    // --- Controls ---

    pub fn start_container(&self, state: &mut AppState) {
        self.send_control(state, Control::Start);
    }

    pub fn stop_container(&self, state: &mut AppState) {
        self.send_control(state, Control::Stop);
    }

    fn send_control(&self, state: &mut AppState, control: Control) {
        state.control_in_flight = Some(control);
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = match control {
                Control::Start => api.start().await,
                Control::Stop => api.stop().await,
            };
            let error = result.err().map(|e| format!("{e}"));
            let _ = tx.send(AppEvent::ControlSettled { control, error });
        });
    }

    // --- Logs ---

    pub fn acquire_logs(&mut self, state: &mut AppState) {
        match self.config.log_mode {
            LogMode::Poll | LogMode::Once => self.fetch_logs(state),
            LogMode::Stream => self.open_stream(state),
        }
    }

    fn fetch_logs(&self, state: &mut AppState) {
        let generation = state.begin_log_request();
        let api = self.api.clone();
        let tx = self.tx.clone();
        let redactor = self.redactor.clone();
        tokio::spawn(async move {
            let result = api
                .fetch_logs()
                .await
                .map(|text| match &redactor {
                    Some(r) => r.apply(&text).into_owned(),
                    None => text,
                })
                .map_err(|e| format!("{e}"));
            let _ = tx.send(AppEvent::LogsFetched { generation, result });
        });
    }

    fn close_stream(&mut self) {
        if let Some(handle) = self.stream_task.take() {
            if !handle.is_finished() {
                tracing::debug!("aborting live log stream");
            }
            handle.abort();
        }
    }

    /// Opens a new streaming connection, closing the previous one first.
    fn open_stream(&mut self, state: &mut AppState) {
        self.close_stream();
        let generation = state.begin_log_request();
        let api = self.api.clone();
        let tx = self.tx.clone();
        let mut redactor = self.redactor.clone().map(LineRedactor::new);
        self.stream_task = Some(tokio::spawn(async move {
            let mut chunks = match api.open_stream().await {
                Ok(chunks) => chunks,
                Err(e) => {
                    let _ = tx.send(AppEvent::StreamFailed {
                        generation,
                        error: format!("{e}"),
                    });
                    return;
                }
            };
            if tx.send(AppEvent::StreamOpened { generation }).is_err() {
                return;
            }
            while let Some(chunk) = chunks.next().await {
                let event = match chunk {
                    Ok(text) => {
                        let text = match redactor.as_mut() {
                            Some(r) => match r.push(&text) {
                                Some(lines) => lines,
                                // No complete line yet
                                None => continue,
                            },
                            None => text,
                        };
                        AppEvent::StreamChunk { generation, text }
                    }
                    Err(e) => {
                        let _ = tx.send(AppEvent::StreamFailed {
                            generation,
                            error: format!("{e}"),
                        });
                        return;
                    }
                };
                if tx.send(event).is_err() {
                    return;
                }
            }
            if let Some(text) = redactor.as_mut().and_then(LineRedactor::finish) {
                if tx.send(AppEvent::StreamChunk { generation, text }).is_err() {
                    return;
                }
            }
            let _ = tx.send(AppEvent::StreamEnded { generation });
        }));
    }

    // --- Event reducer ---

    /// Applies a background event to `state`, issuing follow-up requests where
    /// the event calls for them. Key events are not handled here.
    pub fn handle_event(&mut self, state: &mut AppState, event: AppEvent) {
        match event {
            AppEvent::StatusTick => self.refresh_status(state),
            AppEvent::LogTick => self.acquire_logs(state),
            AppEvent::StatusFetched { generation, result } => {
                if let Err(e) = &result {
                    tracing::warn!("status poll failed: {e}");
                }
                match state.apply_status(generation, result) {
                    StatusOutcome::Stale => {
                        tracing::debug!("dropped stale status result (generation {generation})");
                    }
                    StatusOutcome::Failed => {}
                    StatusOutcome::Applied { transition } => {
                        if let Some((old, new)) = transition {
                            tracing::info!("status changed: {old} -> {new}");
                            state.push_notification(format!("Status changed: {old} → {new}"));
                            #[cfg(feature = "desktop-notify")]
                            if state.desktop_notify {
                                crate::notify::send_desktop(
                                    state.container_name.as_deref(),
                                    &old,
                                    &new,
                                );
                            }
                        }
                    }
                }
            }
            AppEvent::ControlSettled { control, error } => {
                if state.control_in_flight == Some(control) {
                    state.control_in_flight = None;
                }
                match error {
                    Some(e) => {
                        tracing::warn!("{} request failed: {e}", control.label());
                        state.set_error(format!("{} failed: {e}", control.label()));
                    }
                    None => tracing::info!("{} request settled", control.label()),
                }
                // Realign polling to the action, whatever its outcome
                self.refresh_status(state);
                self.restart_status_timer();
            }
            AppEvent::LogsFetched { generation, result } => {
                if let Err(e) = &result {
                    tracing::warn!("log fetch failed: {e}");
                }
                if state.apply_logs(generation, result) {
                    self.arm_log_timer_if_pending();
                }
            }
            AppEvent::StreamOpened { generation } => {
                if state.stream_opened(generation) {
                    tracing::info!("log stream opened (generation {generation})");
                    self.arm_log_timer_if_pending();
                }
            }
            AppEvent::StreamChunk { generation, text } => {
                state.append_stream(generation, &text);
            }
            AppEvent::StreamEnded { generation } => {
                if state.stream_ended(generation) {
                    tracing::info!("log stream ended (generation {generation})");
                }
            }
            AppEvent::StreamFailed { generation, error } => {
                if state.stream_failed(generation) {
                    tracing::warn!("log stream failed: {error}");
                    self.arm_log_timer_if_pending();
                }
            }
            AppEvent::Error(e) => state.set_error(e),
            AppEvent::Key(_) | AppEvent::Tick => {}
        }
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.close_stream();
    }
}
