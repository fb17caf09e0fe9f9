use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use roster_logging::roster_debug;
use serde::Serialize;
use url::Url;

use crate::types::{ErrorBody, ExportRequest, ScrapeRequest, ScrapeResponse};
use crate::{RemoteError, RemoteErrorKind, RemoteFormat, RemoteRecord, ScrapeOutput};

const SCRAPE_PATH: &str = "api/scrape";
const EXPORT_PATH: &str = "api/export";

#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub base_url: Url,
    /// Unset means wait indefinitely.
    pub connect_timeout: Option<Duration>,
    /// Unset means wait indefinitely.
    pub request_timeout: Option<Duration>,
    pub max_response_bytes: u64,
}

impl RemoteSettings {
    pub fn new(mut base_url: Url) -> Self {
        // Endpoints are joined relative to the base, so it must end in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            connect_timeout: None,
            request_timeout: None,
            max_response_bytes: 50 * 1024 * 1024,
        }
    }
}

/// The scraping backend, treated as a black box with two operations.
#[async_trait::async_trait]
pub trait RemoteService: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ScrapeOutput, RemoteError>;

    async fn export(
        &self,
        records: &[RemoteRecord],
        format: RemoteFormat,
    ) -> Result<Vec<u8>, RemoteError>;
}

/// HTTP+JSON implementation of [`RemoteService`].
#[derive(Debug, Clone)]
pub struct HttpRemoteService {
    settings: RemoteSettings,
    client: reqwest::Client,
}

impl HttpRemoteService {
    pub fn new(settings: RemoteSettings) -> Result<Self, RemoteError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| RemoteError::new(RemoteErrorKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        self.settings
            .base_url
            .join(path)
            .map_err(|err| RemoteError::new(RemoteErrorKind::InvalidEndpoint, err.to_string()))
    }

    async fn post_json<T>(&self, path: &str, body: &T) -> Result<(StatusCode, Vec<u8>), RemoteError>
    where
        T: Serialize + ?Sized + Sync,
    {
        let endpoint = self.endpoint(path)?;
        let body = serde_json::to_vec(body)
            .map_err(|err| RemoteError::new(RemoteErrorKind::Decode, err.to_string()))?;

        roster_debug!("POST {} body_len={}", endpoint, body.len());
        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let bytes = self.read_body(response).await?;
        roster_debug!("{} replied {} ({} bytes)", path, status, bytes.len());
        Ok((status, bytes))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, RemoteError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(RemoteError::new(
                    RemoteErrorKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(RemoteError::new(
                    RemoteErrorKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl RemoteService for HttpRemoteService {
    async fn scrape(&self, url: &str) -> Result<ScrapeOutput, RemoteError> {
        let (status, body) = self.post_json(SCRAPE_PATH, &ScrapeRequest { url }).await?;
        if !status.is_success() {
            return Err(reply_error(status, &body));
        }

        let reply: ScrapeResponse = serde_json::from_slice(&body)
            .map_err(|err| RemoteError::new(RemoteErrorKind::Decode, err.to_string()))?;
        let count = reply.count.unwrap_or(reply.data.len());
        Ok(ScrapeOutput {
            records: reply.data,
            count,
        })
    }

    async fn export(
        &self,
        records: &[RemoteRecord],
        format: RemoteFormat,
    ) -> Result<Vec<u8>, RemoteError> {
        let request = ExportRequest {
            data: records,
            format,
        };
        let (status, body) = self.post_json(EXPORT_PATH, &request).await?;
        if !status.is_success() {
            return Err(reply_error(status, &body));
        }
        Ok(body)
    }
}

/// Classifies a non-2xx reply by what its body carries.
fn reply_error(status: StatusCode, body: &[u8]) -> RemoteError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: Some(message),
        }) if !message.is_empty() => RemoteError::new(RemoteErrorKind::Service, message),
        Ok(_) => RemoteError::new(
            RemoteErrorKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ),
        Err(err) => RemoteError::new(RemoteErrorKind::Decode, format!("{status}: {err}")),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        return RemoteError::new(RemoteErrorKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return RemoteError::new(RemoteErrorKind::Decode, err.to_string());
    }
    RemoteError::new(RemoteErrorKind::Network, err.to_string())
}
