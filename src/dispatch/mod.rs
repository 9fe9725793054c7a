use crate::link::LinkField;
use crate::media::{derive_filename, DeriveContext, DownloadRequest};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

/// Requested action for a classified link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Open,
    Download,
}

/// Terminal result of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Fire-and-forget navigation was handed off; there is no callback.
    Opened,
    /// The backend saved the media server-side at the reported path.
    Saved { file_path: String },
}

/// Everything that can stop a dispatch. None of these are fatal: the caller
/// surfaces the message and the dispatcher stays usable for the next attempt.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("cannot dispatch: link is empty")]
    EmptyLink,
    #[error("this is a gallery link; use the per-item listing to download individual entries")]
    UnsupportedActionForShape,
    #[error("download request failed: {0}")]
    Network(String),
    #[error("download failed: {0}")]
    Backend(String),
}

/// Server-side proxied download. The backend fetches and persists the media
/// and reports the saved path.
#[async_trait]
pub trait ProxyDownloader: Send + Sync {
    async fn proxy_download(&self, request: &DownloadRequest) -> Result<String, DispatchError>;
}

/// Hands a URL to a new browsing context. Fire-and-forget: no success or
/// failure ever comes back to the dispatch core.
pub trait Navigate: Send + Sync {
    fn open_in_new_context(&self, url: &str);
}

/// Default navigator backed by the system opener.
pub struct SystemNavigator;

impl Navigate for SystemNavigator {
    fn open_in_new_context(&self, url: &str) {
        info!("Opening in new context: {}", url);
        if let Err(e) = open::that_detached(url) {
            // Fire-and-forget contract: log, never surface.
            warn!("System opener failed for {}: {}", url, e);
        }
    }
}

/// Routes a classified link and a requested action to the correct network
/// operation. One-shot per call; no retries, no deduplication of overlapping
/// calls.
pub struct Dispatcher {
    proxy: Box<dyn ProxyDownloader>,
    navigator: Box<dyn Navigate>,
}

impl Dispatcher {
    pub fn new(proxy: Box<dyn ProxyDownloader>, navigator: Box<dyn Navigate>) -> Self {
        Self { proxy, navigator }
    }

    /// Validates the link shape against the action, then invokes exactly one
    /// network action. Rejections happen before any network call.
    pub async fn dispatch(
        &self,
        link: &LinkField,
        action: Action,
        filename_hint: Option<&str>,
    ) -> Result<Outcome, DispatchError> {
        let url = match link {
            LinkField::Absent => {
                warn!("Dispatch rejected: link is empty");
                return Err(DispatchError::EmptyLink);
            }
            LinkField::Collection(_) => {
                // Galleries have no single URL to hand over; the caller must
                // go through the per-item listing instead.
                warn!("Dispatch rejected: gallery link with {:?} action", action);
                return Err(DispatchError::UnsupportedActionForShape);
            }
            LinkField::Single(url) => url,
        };

        match action {
            Action::Open => {
                self.navigator.open_in_new_context(url);
                Ok(Outcome::Opened)
            }
            Action::Download => {
                let suggested_filename = match filename_hint {
                    Some(hint) => hint.to_string(),
                    None => derive_filename(&DeriveContext::default(), "mp4"),
                };
                let request = DownloadRequest {
                    source_url: url.clone(),
                    suggested_filename,
                };
                info!(
                    "Dispatching proxy download of {} as {}",
                    request.source_url, request.suggested_filename
                );
                let file_path = self.proxy.proxy_download(&request).await?;
                info!("Proxy download saved to {}", file_path);
                Ok(Outcome::Saved { file_path })
            }
        }
    }
}
