use crate::api::stream::{self, LogStream};
use crate::traits::ContainerApi;
use async_trait::async_trait;
use color_eyre::eyre::{eyre, Result};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

/// `ContainerApi` over HTTP against the dashboard backend.
pub struct HttpApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        // No client-wide timeout: it would also cut the streaming body.
        let client = Client::builder()
            .build()
            .map_err(|e| eyre!("Failed to create HTTP client: {e}"))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_get(&self, path: &str) -> Result<Response> {
        let url = self.url(path);
        tracing::debug!("GET {url}");
        self.client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| eyre!("GET {path} failed: {e}"))
    }

    async fn send_post(&self, path: &str) -> Result<Response> {
        let url = self.url(path);
        tracing::debug!("POST {url}");
        self.client
            .post(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| eyre!("POST {path} failed: {e}"))
    }
}

fn require_ok(path: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status != StatusCode::OK {
        return Err(eyre!("{path} returned HTTP {}", status.as_u16()));
    }
    Ok(response)
}

async fn read_text(path: &str, response: Response) -> Result<String> {
    let response = require_ok(path, response)?;
    response
        .text()
        .await
        .map_err(|e| eyre!("Failed to read {path} body: {e}"))
}

#[async_trait]
impl ContainerApi for HttpApi {
    async fn fetch_status(&self) -> Result<String> {
        let response = self.send_get("/api/json").await?;
        read_text("/api/json", response).await
    }

    async fn start(&self) -> Result<()> {
        let response = self.send_post("/api/start").await?;
        tracing::info!("/api/start answered HTTP {}", response.status().as_u16());
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        let response = self.send_post("/api/stop").await?;
        tracing::info!("/api/stop answered HTTP {}", response.status().as_u16());
        Ok(())
    }

    async fn fetch_logs(&self) -> Result<String> {
        let response = self.send_get("/api/logs").await?;
        read_text("/api/logs", response).await
    }

    async fn open_stream(&self) -> Result<LogStream> {
        let url = self.url("/api/stream");
        tracing::debug!("POST {url} (streaming)");
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| eyre!("POST /api/stream failed: {e}"))?;
        let response = require_ok("/api/stream", response)?;
        Ok(stream::decode_chunks(response.bytes_stream()))
    }
}
