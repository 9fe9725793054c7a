use crate::link::LinkField;
use crate::media::manifest::{render, QualityManifest};
use crate::media::ResolvedMedia;

const UNAVAILABLE: &str = "link unavailable";

/// Computes the detail listing for a resolved work: one line per gallery
/// image, or one line per resource link for a single video. Pure; the caller
/// decides whether and where to show it.
pub fn media_listing(media: &ResolvedMedia) -> Vec<String> {
    match &media.primary {
        LinkField::Collection(urls) => {
            let mut lines = vec!["Gallery links:".to_string()];
            for (index, url) in urls.iter().enumerate() {
                lines.push(format!("  Image {}: {}", index + 1, url));
            }
            lines
        }
        primary => {
            vec![
                "Media resource links:".to_string(),
                resource_line("Video", primary),
                resource_line("Cover", &media.cover),
                resource_line("Dynamic cover", &media.dynamic_cover),
                resource_line("Audio", &media.audio),
            ]
        }
    }
}

fn resource_line(label: &str, link: &LinkField) -> String {
    match link {
        LinkField::Single(url) => format!("  {}: {}", label, url),
        LinkField::Collection(urls) => format!("  {}: {}", label, urls.join(", ")),
        LinkField::Absent => format!("  {}: {}", label, UNAVAILABLE),
    }
}

/// Computes the quality listing for a live manifest, FLV variants first.
pub fn manifest_listing(manifest: &QualityManifest) -> Vec<String> {
    render(manifest)
        .into_iter()
        .map(|variant| format!("{} {}: {}", variant.transport, variant.label, variant.url))
        .collect()
}

/// Show/hide state for a detail listing, owned by the presentation layer.
///
/// A repeated request while a non-empty listing is visible collapses the
/// panel instead of recomputing it; the data itself is untouched.
#[derive(Debug, Default)]
pub struct DetailPanel {
    visible: bool,
    lines: Vec<String>,
}

impl DetailPanel {
    /// Toggle entry point: hides a visible non-empty panel, otherwise
    /// recomputes the listing and shows it.
    pub fn toggle_with<F>(&mut self, compute: F)
    where
        F: FnOnce() -> Vec<String>,
    {
        if self.visible && !self.lines.is_empty() {
            self.visible = false;
            return;
        }
        self.lines = compute();
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery_media() -> ResolvedMedia {
        ResolvedMedia {
            primary: LinkField::Collection(vec![
                "http://a.com/1.jpg".to_string(),
                "http://a.com/2.jpg".to_string(),
            ]),
            cover: LinkField::Absent,
            dynamic_cover: LinkField::Absent,
            audio: LinkField::Absent,
            preview: LinkField::Absent,
            status_text: "resolution success".to_string(),
            author_hint: None,
            description_hint: None,
        }
    }

    fn video_media() -> ResolvedMedia {
        ResolvedMedia {
            primary: LinkField::Single("http://a.com/v.mp4".to_string()),
            cover: LinkField::Single("http://a.com/c.jpg".to_string()),
            dynamic_cover: LinkField::Absent,
            audio: LinkField::Single("http://a.com/m.mp3".to_string()),
            preview: LinkField::Absent,
            status_text: "resolution success".to_string(),
            author_hint: Some("Alice".to_string()),
            description_hint: None,
        }
    }

    #[test]
    fn test_gallery_listing_is_per_image() {
        let lines = media_listing(&gallery_media());
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Image 1: http://a.com/1.jpg"));
        assert!(lines[2].contains("Image 2: http://a.com/2.jpg"));
    }

    #[test]
    fn test_video_listing_marks_missing_links() {
        let lines = media_listing(&video_media());
        assert!(lines.iter().any(|l| l.contains("Video: http://a.com/v.mp4")));
        assert!(lines
            .iter()
            .any(|l| l.contains("Dynamic cover") && l.contains(UNAVAILABLE)));
    }

    #[test]
    fn test_manifest_listing_format() {
        let manifest = QualityManifest {
            flv: vec![("HD1".to_string(), "http://s/f".to_string())],
            m3u8: vec![("HD1".to_string(), "http://s/m".to_string())],
            best: None,
        };
        let lines = manifest_listing(&manifest);
        assert_eq!(lines, vec!["FLV HD1: http://s/f", "M3U8 HD1: http://s/m"]);
    }

    #[test]
    fn test_toggle_collapses_visible_panel_without_recompute() {
        let mut panel = DetailPanel::default();
        panel.toggle_with(|| vec!["line".to_string()]);
        assert!(panel.is_visible());

        // Second toggle must hide, not recompute.
        panel.toggle_with(|| panic!("listing recomputed on collapse"));
        assert!(!panel.is_visible());

        // Third toggle recomputes and shows again.
        panel.toggle_with(|| vec!["fresh".to_string()]);
        assert!(panel.is_visible());
        assert_eq!(panel.lines(), ["fresh"]);
    }

    #[test]
    fn test_toggle_on_empty_panel_always_recomputes() {
        let mut panel = DetailPanel::default();
        panel.toggle_with(Vec::new);
        assert!(panel.is_visible());
        // Visible but empty: toggling recomputes instead of collapsing.
        panel.toggle_with(|| vec!["now populated".to_string()]);
        assert!(panel.is_visible());
        assert_eq!(panel.lines(), ["now populated"]);
    }
}
