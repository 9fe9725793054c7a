use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Transport format of a live-stream variant. FLV entries always list before
/// M3U8 entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Flv,
    M3u8,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Flv => write!(f, "FLV"),
            Transport::M3u8 => write!(f, "M3U8"),
        }
    }
}

/// Quality-labeled stream URLs for one live resolution. Replaced wholesale on
/// each new live query; a failed query installs the empty manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualityManifest {
    pub flv: Vec<(String, String)>,
    pub m3u8: Vec<(String, String)>,
    pub best: Option<String>,
}

impl QualityManifest {
    pub fn is_empty(&self) -> bool {
        self.flv.is_empty() && self.m3u8.is_empty()
    }
}

/// One row of the renderable manifest listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamVariant {
    pub transport: Transport,
    pub label: String,
    pub url: String,
}

/// Merges the two quality-keyed transport maps into one manifest.
///
/// Key order is preserved as supplied by the backend (typically highest to
/// lowest quality); no local sorting is imposed. `best` is taken verbatim
/// from the backend hint, never computed here.
pub fn aggregate(flv: &Value, m3u8: &Value, best: &Value) -> QualityManifest {
    let manifest = QualityManifest {
        flv: collect_transport(flv),
        m3u8: collect_transport(m3u8),
        best: best
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string()),
    };
    debug!(
        "Aggregated manifest: {} FLV, {} M3U8 variants",
        manifest.flv.len(),
        manifest.m3u8.len()
    );
    manifest
}

fn collect_transport(raw: &Value) -> Vec<(String, String)> {
    match raw.as_object() {
        Some(map) => map
            .iter()
            .filter_map(|(label, url)| {
                url.as_str().map(|u| (label.clone(), u.to_string()))
            })
            .collect(),
        None => Vec::new(),
    }
}

/// Computes the ordered display listing for a manifest. Pure; visibility is
/// the presentation layer's concern.
pub fn render(manifest: &QualityManifest) -> Vec<StreamVariant> {
    let mut variants = Vec::with_capacity(manifest.flv.len() + manifest.m3u8.len());
    for (label, url) in &manifest.flv {
        variants.push(StreamVariant {
            transport: Transport::Flv,
            label: label.clone(),
            url: url.clone(),
        });
    }
    for (label, url) in &manifest.m3u8 {
        variants.push(StreamVariant {
            transport: Transport::M3u8,
            label: label.clone(),
            url: url.clone(),
        });
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_aggregate_empty_inputs() {
        let manifest = aggregate(&json!({}), &json!({}), &json!(""));
        assert!(manifest.is_empty());
        assert_eq!(manifest.best, None);
        assert!(render(&manifest).is_empty());
    }

    #[test]
    fn test_aggregate_null_transports() {
        let manifest = aggregate(&Value::Null, &Value::Null, &Value::Null);
        assert!(manifest.is_empty());
        assert_eq!(manifest.best, None);
    }

    #[test]
    fn test_aggregate_preserves_backend_order() {
        let flv = json!({"FULL_HD1": "http://s/flv/fhd", "HD1": "http://s/flv/hd", "SD1": "http://s/flv/sd"});
        let manifest = aggregate(&flv, &json!({}), &json!("http://s/flv/fhd"));
        let labels: Vec<&str> = manifest.flv.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["FULL_HD1", "HD1", "SD1"]);
        assert_eq!(manifest.best.as_deref(), Some("http://s/flv/fhd"));
    }

    #[test]
    fn test_render_lists_flv_before_m3u8() {
        let flv = json!({"HD1": "http://s/flv/hd"});
        let m3u8 = json!({"HD1": "http://s/m3u8/hd", "SD1": "http://s/m3u8/sd"});
        let variants = render(&aggregate(&flv, &m3u8, &Value::Null));
        assert_eq!(variants.len(), 3);
        assert_eq!(variants[0].transport, Transport::Flv);
        assert_eq!(variants[0].url, "http://s/flv/hd");
        assert_eq!(variants[1].transport, Transport::M3u8);
        assert_eq!(variants[1].label, "HD1");
        assert_eq!(variants[2].label, "SD1");
    }

    #[test]
    fn test_transports_may_share_label_sets() {
        let flv = json!({"HD1": "http://s/flv/hd"});
        let m3u8 = json!({"HD1": "http://s/m3u8/hd"});
        let manifest = aggregate(&flv, &m3u8, &Value::Null);
        assert_eq!(manifest.flv.len(), 1);
        assert_eq!(manifest.m3u8.len(), 1);
    }
}
