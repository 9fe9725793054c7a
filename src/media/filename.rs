use super::types::DeriveContext;
use tracing::debug;

/// Status text marker indicating a successful resolution; enrichment from
/// author/description hints only happens when the marker is present.
pub const SUCCESS_MARKER: &str = "success";

const DEFAULT_BASE: &str = "media";
const MAX_DESCRIPTION_CHARS: usize = 20;
const ILLEGAL_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Derives a deterministic, filesystem-safe filename from partial metadata.
///
/// When the status text carries the success marker and hints are available,
/// the name is `<author>-<description>` (description truncated to 20 chars
/// before sanitization) or `<author>-<YYYY-MM-DD>` without a description.
/// Otherwise it falls back to a fixed placeholder. The extension is appended
/// with exactly one dot, whether or not the caller included one.
pub fn derive_filename(ctx: &DeriveContext, extension: &str) -> String {
    let mut base = String::new();

    if ctx.status_text.contains(SUCCESS_MARKER) {
        if let Some(author) = ctx.author_hint.as_deref().filter(|a| !a.is_empty()) {
            base.push_str(&sanitize(author));
            base.push('-');
        }
        match ctx.description_hint.as_deref().filter(|d| !d.is_empty()) {
            Some(desc) => {
                let short: String = desc.chars().take(MAX_DESCRIPTION_CHARS).collect();
                base.push_str(&sanitize(&short));
            }
            None if !base.is_empty() => {
                base.push_str(&chrono::Local::now().format("%Y-%m-%d").to_string());
            }
            None => {}
        }
    }

    // Sanitization can eat the whole base; never emit an empty name.
    if base.is_empty() || base == "-" {
        base = DEFAULT_BASE.to_string();
    }

    let extension = extension.trim_start_matches('.');
    let filename = format!("{}.{}", base, extension);
    debug!("Derived filename: {}", filename);
    filename
}

/// Maps illegal filesystem characters and whitespace to `_`; other ASCII
/// punctuation outside `-`, `_`, `.` is dropped outright.
fn sanitize(input: &str) -> String {
    input
        .chars()
        .filter_map(|c| {
            if ILLEGAL_CHARS.contains(&c) || c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_punctuation() && !matches!(c, '-' | '_' | '.') {
                None
            } else {
                Some(c)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success_ctx(author: Option<&str>, desc: Option<&str>) -> DeriveContext {
        DeriveContext {
            status_text: "resolution success".to_string(),
            author_hint: author.map(|s| s.to_string()),
            description_hint: desc.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_default_when_status_not_successful() {
        let ctx = DeriveContext {
            status_text: "resolution failed".to_string(),
            author_hint: Some("Alice".to_string()),
            description_hint: Some("clip".to_string()),
        };
        assert_eq!(derive_filename(&ctx, "mp4"), "media.mp4");
    }

    #[test]
    fn test_default_when_no_hints() {
        assert_eq!(
            derive_filename(&success_ctx(None, None), ".mp4"),
            "media.mp4"
        );
    }

    #[test]
    fn test_author_and_description_enrichment() {
        assert_eq!(
            derive_filename(&success_ctx(Some("Alice"), Some("Cool clip!!")), ".mp4"),
            "Alice-Cool_clip.mp4"
        );
    }

    #[test]
    fn test_description_truncated_to_twenty_chars() {
        let ctx = success_ctx(Some("Bob"), Some("abcdefghijklmnopqrstuvwxyz"));
        assert_eq!(derive_filename(&ctx, "mp4"), "Bob-abcdefghijklmnopqrst.mp4");
    }

    #[test]
    fn test_date_fallback_without_description() {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        assert_eq!(
            derive_filename(&success_ctx(Some("Alice"), None), "mp4"),
            format!("Alice-{}.mp4", today)
        );
    }

    #[test]
    fn test_no_illegal_characters_survive() {
        let ctx = success_ctx(Some("a/b"), Some(r#"x\y:z*w?v"u<t>s|r"#));
        let name = derive_filename(&ctx, "mp4");
        for c in ['\\', '/', ':', '*', '?', '"', '<', '>', '|'] {
            assert!(!name.contains(c), "illegal char {:?} in {}", c, name);
        }
        assert!(name.ends_with(".mp4"));
    }

    #[test]
    fn test_extension_dot_never_duplicated() {
        let name = derive_filename(&DeriveContext::default(), ".mp4");
        assert_eq!(name, "media.mp4");
        assert!(!name.contains(".."));
    }

    #[test]
    fn test_never_empty_even_when_sanitization_eats_everything() {
        let ctx = success_ctx(None, Some("!!!"));
        assert_eq!(derive_filename(&ctx, "mp4"), "media.mp4");
    }
}
