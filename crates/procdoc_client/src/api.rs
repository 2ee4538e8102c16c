use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::{
    ApiError, ExportedMarkdown, HealthReport, HistoryPage, ProcessAck, SessionDetails,
    SessionResult, StatusReport, UploadReceipt, UploadRequest,
};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Upper bound for streamed attachment downloads (docx, screenshots).
    pub max_attachment_bytes: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_attachment_bytes: 20 * 1024 * 1024,
        }
    }
}

/// The slice of the API the polling monitor depends on, behind a trait so
/// the monitor can be driven by a scripted fake in tests.
#[async_trait::async_trait]
pub trait StatusApi: Send + Sync {
    /// One status probe. Idempotent on the server; safe to call repeatedly.
    async fn fetch_status(&self, session_id: &str) -> Result<StatusReport, ApiError>;

    /// Ask the server to start processing an uploaded session.
    async fn start_processing(&self, session_id: &str) -> Result<ProcessAck, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    client: reqwest::Client,
    settings: ApiSettings,
}

impl ApiClient {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::InvalidBaseUrl(err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self {
            base,
            client,
            settings,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidBaseUrl("base url cannot have paths".to_string()))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        decode_json(response).await
    }

    pub async fn health(&self) -> Result<HealthReport, ApiError> {
        self.get_json(self.endpoint(&["health"])?).await
    }

    pub async fn fetch_history(&self, page: u32, per_page: u32) -> Result<HistoryPage, ApiError> {
        let mut url = self.endpoint(&["history"])?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        self.get_json(url).await
    }

    pub async fn fetch_session_details(
        &self,
        session_id: &str,
    ) -> Result<SessionDetails, ApiError> {
        self.get_json(self.endpoint(&["history", session_id])?).await
    }

    pub async fn fetch_result(&self, session_id: &str) -> Result<SessionResult, ApiError> {
        self.get_json(self.endpoint(&["result", session_id])?).await
    }

    /// Markdown exports come back as JSON with the content inline.
    pub async fn export_markdown(&self, session_id: &str) -> Result<ExportedMarkdown, ApiError> {
        self.get_json(self.endpoint(&["export", session_id, "markdown"])?)
            .await
    }

    /// Docx exports come back as an attachment; streamed and size-capped.
    pub async fn download_docx(&self, session_id: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(&["export", session_id, "docx"])?;
        self.fetch_attachment(url).await
    }

    /// Session artifacts: `transcription`, `documentation`, `screenshot_{i}`.
    pub async fn download_file(
        &self,
        session_id: &str,
        file_type: &str,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(&["download", session_id, file_type])?;
        self.fetch_attachment(url).await
    }

    pub async fn upload(&self, request: &UploadRequest) -> Result<UploadReceipt, ApiError> {
        let mut form = reqwest::multipart::Form::new()
            .text(
                "transcription_only_mode",
                if request.transcription_only { "true" } else { "false" },
            )
            .text("aiProvider", request.ai.provider.clone())
            .text("aiModel", request.ai.model.clone())
            .text("agentType", request.ai.agent_type.clone());
        if let Some(token) = &request.ai.api_key {
            form = form.text("aiToken", token.clone());
        }
        if let Some(path) = &request.transcription {
            form = form.part("transcription", file_part(path).await?);
        }
        for path in &request.screenshots {
            form = form.part("screenshots", file_part(path).await?);
        }

        let url = self.endpoint(&["upload"])?;
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_json(response).await
    }

    async fn fetch_attachment(&self, url: Url) -> Result<Vec<u8>, ApiError> {
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(http_error(status.as_u16(), &body));
        }

        let max = self.settings.max_attachment_bytes;
        if let Some(len) = response.content_length() {
            if len > max {
                return Err(ApiError::TooLarge {
                    max_bytes: max,
                    actual: Some(len),
                });
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max {
                return Err(ApiError::TooLarge {
                    max_bytes: max,
                    actual: Some(next_len),
                });
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl StatusApi for ApiClient {
    async fn fetch_status(&self, session_id: &str) -> Result<StatusReport, ApiError> {
        self.get_json(self.endpoint(&["status", session_id])?).await
    }

    async fn start_processing(&self, session_id: &str) -> Result<ProcessAck, ApiError> {
        let url = self.endpoint(&["process", session_id])?;
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_json(response).await
    }
}

async fn file_part(path: &Path) -> Result<reqwest::multipart::Part, ApiError> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();
    Ok(reqwest::multipart::Part::bytes(bytes).file_name(name))
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(map_reqwest_error)?;
    if !status.is_success() {
        return Err(http_error(status.as_u16(), &body));
    }
    serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// The server wraps failures as `{"error": "..."}`; fall back to the raw
/// body when the envelope is missing.
fn http_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error)
        .unwrap_or_else(|_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "no response body".to_string()
            } else {
                trimmed.chars().take(200).collect()
            }
        });
    ApiError::Http { status, message }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout(err.to_string());
    }
    if err.is_decode() {
        return ApiError::Decode(err.to_string());
    }
    ApiError::Network(err.to_string())
}
