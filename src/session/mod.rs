use crate::backend::LiveResolution;
use crate::media::manifest::QualityManifest;
use crate::media::ResolvedMedia;
use tracing::debug;

/// Last-known-result holder guarded by a monotonic request sequence.
///
/// Requests are not cancellable, so two in-flight resolutions can race; a
/// response is accepted only if it carries the latest issued ticket, which
/// keeps an older, slower response from overwriting a newer result.
#[derive(Debug)]
pub struct ResultSlot<T> {
    issued: u64,
    value: Option<T>,
}

impl<T> Default for ResultSlot<T> {
    fn default() -> Self {
        Self {
            issued: 0,
            value: None,
        }
    }
}

impl<T> ResultSlot<T> {
    /// Issues a ticket for a request about to be sent.
    pub fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Installs a response if its ticket is still the latest issued. Returns
    /// whether the value was accepted.
    pub fn accept(&mut self, ticket: u64, value: T) -> bool {
        if ticket == self.issued {
            self.value = Some(value);
            true
        } else {
            debug!("Dropping stale response (ticket {} < {})", ticket, self.issued);
            false
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

/// Per-query result slots shared between response handlers and the rendering
/// sink. Each slot has one logical writer: the latest accepted response.
#[derive(Debug, Default)]
pub struct Session {
    pub media: ResultSlot<ResolvedMedia>,
    pub live: ResultSlot<LiveResolution>,
}

impl Session {
    /// A failed live query clears the manifest rather than keeping a stale
    /// one around.
    pub fn clear_live(&mut self, ticket: u64) -> bool {
        self.live.accept(
            ticket,
            LiveResolution {
                status_text: String::new(),
                manifest: QualityManifest::default(),
                preview: crate::link::LinkField::Absent,
            },
        )
    }
}
