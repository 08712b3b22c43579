use std::time::Duration;

use futures_util::StreamExt;
use infoflow_core::{SearchError, SearchQuery, SearchResponse};
use infoflow_logging::{flow_debug, flow_warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use thiserror::Error;
use url::Url;

use crate::wire::{decode_health_response, decode_search_response, SearchRequestBody};
use crate::HealthStatus;

pub const SEARCH_PATH: &str = "api/news/search";
pub const HEALTH_PATH: &str = "api/news/health";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url {url:?}: {message}")]
    InvalidBaseUrl { url: String, message: String },
    #[error("failed to build http client: {0}")]
    Build(String),
}

/// Performs the network exchange with the news backend.
#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError>;

    async fn health(&self) -> Result<HealthStatus, SearchError> {
        Err(SearchError::backend(
            None,
            Some("health check not supported".to_string()),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestSearchClient {
    http: reqwest::Client,
    search_url: Url,
    health_url: Url,
    max_bytes: u64,
}

impl ReqwestSearchClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let base = parse_base_url(&settings.base_url)?;
        let join = |path: &str| {
            base.join(path).map_err(|err| ClientError::InvalidBaseUrl {
                url: settings.base_url.clone(),
                message: err.to_string(),
            })
        };
        let search_url = join(SEARCH_PATH)?;
        let health_url = join(HEALTH_PATH)?;

        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::Build(err.to_string()))?;

        Ok(Self {
            http,
            search_url,
            health_url,
            max_bytes: settings.max_bytes,
        })
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, SearchError> {
        if let Some(content_len) = response.content_length() {
            if content_len > self.max_bytes {
                return Err(too_large(self.max_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(too_large(self.max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl SearchClient for ReqwestSearchClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError> {
        let body = serde_json::to_vec(&SearchRequestBody::from(query))
            .map_err(|err| SearchError::Protocol(err.to_string()))?;

        flow_debug!("POST {} ({} bytes)", self.search_url, body.len());
        let response = self
            .http
            .post(self.search_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        flow_debug!("search reply status {}", status);
        let bytes = self.read_body(response).await?;
        decode_search_response(status.as_u16(), &bytes, query)
    }

    async fn health(&self) -> Result<HealthStatus, SearchError> {
        let response = self
            .http
            .get(self.health_url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let bytes = self.read_body(response).await?;
        decode_health_response(status.as_u16(), &bytes)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let trimmed = raw.trim();
    // Without a trailing slash `join` would replace the last path segment.
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).map_err(|err| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        message: err.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidBaseUrl {
            url: raw.to_string(),
            message: "expected an http(s) url".to_string(),
        });
    }
    Ok(url)
}

fn too_large(max_bytes: u64, actual: u64) -> SearchError {
    SearchError::Protocol(format!(
        "response too large (max {max_bytes}, actual {actual})"
    ))
}

fn map_reqwest_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        flow_warn!("request timed out: {}", err);
    } else {
        flow_warn!("request failed: {}", err);
    }
    SearchError::Connection(err.to_string())
}
