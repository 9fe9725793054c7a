use crate::dispatch::{DispatchError, ProxyDownloader};
use crate::link::{classify, LinkField};
use crate::media::manifest::{aggregate, QualityManifest};
use crate::media::{DownloadRequest, ResolvedMedia};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug, Serialize)]
struct SingleRequest<'a> {
    url: &'a str,
    download: bool,
}

#[derive(Debug, Serialize)]
struct LiveRequest<'a> {
    url: &'a str,
}

/// Raw `/single/` response. Link fields arrive as strings, delimited strings,
/// arrays, or `false`/`null`, so they stay untyped until classification.
#[derive(Debug, Deserialize)]
struct SingleResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    download: Value,
    #[serde(default)]
    music: Value,
    #[serde(default)]
    origin: Value,
    #[serde(default)]
    dynamic: Value,
    #[serde(default)]
    preview: Value,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    describe: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LiveResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    flv: Value,
    #[serde(default)]
    m3u8: Value,
    #[serde(default)]
    best: Value,
    #[serde(default)]
    preview: Value,
}

#[derive(Debug, Deserialize)]
struct ProxyDownloadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    file_path: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// Result of a live resolution query.
#[derive(Debug, Clone)]
pub struct LiveResolution {
    pub status_text: String,
    pub manifest: QualityManifest,
    pub preview: LinkField,
}

/// HTTP client for the media-resolution backend. The backend is a black box;
/// this client only implements the documented request/response contracts.
///
/// No client-side timeout is imposed; the transport default applies.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base: Url,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .with_context(|| format!("Invalid backend URL: {}", base_url))?;
        let http = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("Invalid endpoint path: {}", path))
    }

    /// Resolves a single work (video or gallery) via `POST /single/`.
    ///
    /// With `download = true` the backend downloads the work server-side in
    /// the background and only reports status text.
    pub async fn resolve_single(&self, url: &str, download: bool) -> Result<ResolvedMedia> {
        info!("Resolving single work: {}", url);
        let response = self
            .http
            .post(self.endpoint("single/")?)
            .json(&SingleRequest { url, download })
            .send()
            .await
            .context("Failed to reach the resolution backend")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Resolution request failed: HTTP {}",
                response.status()
            ));
        }

        let body: SingleResponse = response
            .json()
            .await
            .context("Failed to parse resolution response")?;
        debug!("Resolution status: {}", body.text);

        Ok(ResolvedMedia {
            primary: classify(&body.download),
            cover: classify(&body.origin),
            dynamic_cover: classify(&body.dynamic),
            audio: classify(&body.music),
            preview: classify(&body.preview),
            status_text: body.text,
            author_hint: body.author,
            description_hint: body.describe,
        })
    }

    /// Resolves a live stream via `POST /live/`.
    pub async fn resolve_live(&self, url: &str) -> Result<LiveResolution> {
        info!("Resolving live stream: {}", url);
        let response = self
            .http
            .post(self.endpoint("live/")?)
            .json(&LiveRequest { url })
            .send()
            .await
            .context("Failed to reach the resolution backend")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Live resolution request failed: HTTP {}",
                response.status()
            ));
        }

        let body: LiveResponse = response
            .json()
            .await
            .context("Failed to parse live resolution response")?;
        debug!("Live resolution status: {}", body.text);

        Ok(LiveResolution {
            status_text: body.text,
            manifest: aggregate(&body.flv, &body.m3u8, &body.best),
            preview: classify(&body.preview),
        })
    }
}

#[async_trait]
impl ProxyDownloader for BackendClient {
    /// `POST /proxy_download`: the server fetches and persists the media,
    /// reporting the saved path. Exactly one request per call, no retries.
    async fn proxy_download(&self, request: &DownloadRequest) -> Result<String, DispatchError> {
        let endpoint = self
            .endpoint("proxy_download")
            .map_err(|e| DispatchError::Network(e.to_string()))?;

        let response = self
            .http
            .post(endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))?;

        // Failure bodies may ride on error statuses; prefer their structured
        // message over the bare status line.
        let status = response.status();
        let body: ProxyDownloadResponse = match response.json().await {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                return Err(DispatchError::Backend(e.to_string()));
            }
            Err(_) => {
                return Err(DispatchError::Network(format!("HTTP {}", status)));
            }
        };

        if body.success {
            body.file_path
                .ok_or_else(|| DispatchError::Backend("missing file_path".to_string()))
        } else {
            let message = match (body.error, body.details) {
                (Some(error), Some(details)) => format!("{} ({})", error, details),
                (Some(error), None) => error,
                (None, _) => "unknown error".to_string(),
            };
            warn!("Proxy download failed: {}", message);
            Err(DispatchError::Backend(message))
        }
    }
}
