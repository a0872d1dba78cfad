//! HTTP client helpers for tests.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

/// Encodes a small gradient as PNG.
pub fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, 128])
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .expect("Failed to encode PNG fixture");
    buf.into_inner()
}

/// Outcome of one `/analyze` call.
#[derive(Debug)]
pub struct AnalyzeOutcome {
    pub status: u16,
    pub prism_status: String,
    pub body: serde_json::Value,
}

impl AnalyzeOutcome {
    pub fn confidence(&self) -> Option<f64> {
        self.body.get("confidence").and_then(|v| v.as_f64())
    }

    pub fn error(&self) -> Option<&str> {
        self.body.get("error").and_then(|v| v.as_str())
    }
}

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    /// Sends a complete form with `image` as a file part.
    pub async fn analyze(
        &self,
        image: Vec<u8>,
        specific: &str,
        general: &str,
    ) -> Result<AnalyzeOutcome, TestClientError> {
        let form = reqwest::multipart::Form::new()
            .part(
                "image",
                reqwest::multipart::Part::bytes(image).file_name("upload.png"),
            )
            .text("specific_description", specific.to_string())
            .text("general_description", general.to_string());

        self.analyze_form(form).await
    }

    pub async fn analyze_form(
        &self,
        form: reqwest::multipart::Form,
    ) -> Result<AnalyzeOutcome, TestClientError> {
        let resp = self
            .client
            .post(self.url("/analyze"))
            .multipart(form)
            .send()
            .await?;

        Self::outcome(resp).await
    }

    async fn outcome(resp: reqwest::Response) -> Result<AnalyzeOutcome, TestClientError> {
        let status = resp.status().as_u16();
        let prism_status = resp
            .headers()
            .get("x-prism-status")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        let body = resp.json().await?;

        Ok(AnalyzeOutcome {
            status,
            prism_status,
            body,
        })
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/healthz")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }

    pub async fn ready(&self) -> Result<ReadyResponse, TestClientError> {
        let resp = self.client.get(self.url("/ready")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ComponentStatus {
    pub http: String,
    pub engine: String,
    pub engine_mode: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub components: ComponentStatus,
}

impl ReadyResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0} - Body: {1}")]
    UnexpectedStatus(u16, String),
}
