use crate::link::LinkField;
use serde::Serialize;

/// Normalized result of one resolution query. Created fresh per response,
/// never mutated; the next query supersedes it.
#[derive(Debug, Clone)]
pub struct ResolvedMedia {
    pub primary: LinkField,
    pub cover: LinkField,
    pub dynamic_cover: LinkField,
    pub audio: LinkField,
    pub preview: LinkField,
    pub status_text: String,
    pub author_hint: Option<String>,
    pub description_hint: Option<String>,
}

/// Read-only input to the filename deriver.
#[derive(Debug, Clone, Default)]
pub struct DeriveContext {
    pub status_text: String,
    pub author_hint: Option<String>,
    pub description_hint: Option<String>,
}

impl From<&ResolvedMedia> for DeriveContext {
    fn from(media: &ResolvedMedia) -> Self {
        Self {
            status_text: media.status_text.clone(),
            author_hint: media.author_hint.clone(),
            description_hint: media.description_hint.clone(),
        }
    }
}

/// Wire payload for the proxy-download action. Constructed transiently per
/// dispatch, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadRequest {
    #[serde(rename = "url")]
    pub source_url: String,
    #[serde(rename = "filename")]
    pub suggested_filename: String,
}
