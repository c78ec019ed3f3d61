#![allow(dead_code)]

use async_trait::async_trait;
use color_eyre::eyre::{eyre, Result};
use ctw::api::stream::{self, LogStream};
use ctw::app::AppState;
use ctw::cli::LogMode;
use ctw::dashboard::{Dashboard, DashboardConfig};
use ctw::events::AppEvent;
use ctw::traits::ContainerApi;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

pub fn status_body(status: &str) -> String {
    format!(r#"{{"Name": "/web", "State": {{"Status": "{status}"}}}}"#)
}

/// Scripted backend. Each queue hands out its front entry; the last entry is
/// repeated once the queue is down to one.
#[derive(Default)]
pub struct MockApi {
    pub statuses: Mutex<VecDeque<Result<String, String>>>,
    pub logs: Mutex<VecDeque<Result<String, String>>>,
    pub stream_chunks: Mutex<Vec<Result<String, String>>>,
    pub stream_open_error: Mutex<Option<String>>,
    pub control_error: Mutex<Option<String>>,
    pub calls: Mutex<Vec<&'static str>>,
}

fn next_scripted(queue: &Mutex<VecDeque<Result<String, String>>>) -> Result<String> {
    let mut q = queue.lock().unwrap();
    let item = if q.len() > 1 {
        q.pop_front()
    } else {
        q.front().cloned()
    };
    match item {
        Some(Ok(body)) => Ok(body),
        Some(Err(e)) => Err(eyre!(e)),
        None => Err(eyre!("no scripted response")),
    }
}

impl MockApi {
    pub fn with_status(status: &str) -> Self {
        let api = Self::default();
        api.push_status(Ok(status_body(status)));
        api.push_logs(Ok(String::new()));
        api
    }

    pub fn push_status(&self, item: Result<String, String>) {
        self.statuses.lock().unwrap().push_back(item);
    }

    pub fn push_logs(&self, item: Result<String, String>) {
        self.logs.lock().unwrap().push_back(item);
    }

    pub fn set_logs(&self, items: Vec<Result<String, String>>) {
        *self.logs.lock().unwrap() = items.into();
    }

    pub fn set_stream(&self, chunks: Vec<Result<&str, &str>>) {
        *self.stream_chunks.lock().unwrap() = chunks
            .into_iter()
            .map(|c| c.map(str::to_string).map_err(str::to_string))
            .collect();
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == name).count()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }

    fn control_result(&self) -> Result<()> {
        match self.control_error.lock().unwrap().clone() {
            Some(e) => Err(eyre!(e)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContainerApi for MockApi {
    async fn fetch_status(&self) -> Result<String> {
        self.record("status");
        next_scripted(&self.statuses)
    }

    async fn start(&self) -> Result<()> {
        self.record("start");
        self.control_result()
    }

    async fn stop(&self) -> Result<()> {
        self.record("stop");
        self.control_result()
    }

    async fn fetch_logs(&self) -> Result<String> {
        self.record("logs");
        next_scripted(&self.logs)
    }

    async fn open_stream(&self) -> Result<LogStream> {
        self.record("stream");
        if let Some(e) = self.stream_open_error.lock().unwrap().clone() {
            return Err(eyre!(e));
        }
        let chunks = self.stream_chunks.lock().unwrap().clone();
        Ok(stream::decode_chunks(futures_util::stream::iter(chunks)))
    }
}

pub struct Harness {
    pub api: Arc<MockApi>,
    pub state: AppState,
    pub dashboard: Dashboard,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

/// Intervals long enough that no timer fires during a test unless asked to.
pub fn quiet_config(log_mode: LogMode) -> DashboardConfig {
    DashboardConfig {
        status_interval: Duration::from_secs(60),
        log_interval: Duration::from_secs(60),
        log_mode,
        ..DashboardConfig::default()
    }
}

impl Harness {
    pub fn new(api: MockApi, config: DashboardConfig) -> Self {
        let api = Arc::new(api);
        let (tx, rx) = mpsc::unbounded_channel();
        let dashboard = Dashboard::new(api.clone(), tx, config);
        let state = AppState::new("http://mock".to_string(), config.log_mode);
        Self {
            api,
            state,
            dashboard,
            rx,
        }
    }

    /// Receives the next background event and feeds it to the dashboard.
    pub async fn step(&mut self) -> &'static str {
        let event = tokio::time::timeout(Duration::from_secs(5), self.rx.recv())
            .await
            .expect("timed out waiting for an event")
            .expect("event channel closed");
        let kind = event_kind(&event);
        self.dashboard.handle_event(&mut self.state, event);
        kind
    }

    /// Steps until `done` holds for the state.
    pub async fn pump_until(&mut self, done: impl Fn(&AppState) -> bool) {
        while !done(&self.state) {
            self.step().await;
        }
    }

    /// Steps until `n` events of kind `kind` were handled.
    pub async fn pump_events(&mut self, kind: &str, n: usize) {
        let mut seen = 0;
        while seen < n {
            if self.step().await == kind {
                seen += 1;
            }
        }
    }
}

pub fn event_kind(event: &AppEvent) -> &'static str {
    match event {
        AppEvent::Key(_) => "key",
        AppEvent::Tick => "tick",
        AppEvent::StatusTick => "status_tick",
        AppEvent::LogTick => "log_tick",
        AppEvent::StatusFetched { .. } => "status",
        AppEvent::ControlSettled { .. } => "control",
        AppEvent::LogsFetched { .. } => "logs",
        AppEvent::StreamOpened { .. } => "stream_opened",
        AppEvent::StreamChunk { .. } => "stream_chunk",
        AppEvent::StreamEnded { .. } => "stream_ended",
        AppEvent::StreamFailed { .. } => "stream_failed",
        AppEvent::Error(_) => "error",
    }
}
