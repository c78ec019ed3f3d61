use crate::api::stream::LogStream;
use async_trait::async_trait;
use color_eyre::eyre::Result;

/// The dashboard backend's `/api/*` surface.
///
/// Implementations return raw bodies; parsing and decoding stay on the
/// dashboard side so a mock only has to produce strings.
#[async_trait]
pub trait ContainerApi: Send + Sync {
    /// `GET /api/json`. Errors on transport failure or any non-200 status.
    async fn fetch_status(&self) -> Result<String>;
    /// `POST /api/start`. Any response counts as settled.
    async fn start(&self) -> Result<()>;
    /// `POST /api/stop`. Any response counts as settled.
    async fn stop(&self) -> Result<()>;
    /// `GET /api/logs`. Errors on transport failure or any non-200 status.
    async fn fetch_logs(&self) -> Result<String>;
    /// `POST /api/stream`. Resolves once the response head arrives.
    async fn open_stream(&self) -> Result<LogStream>;
}
