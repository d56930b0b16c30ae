//! Style and viewport payloads reported by the page extractor.
//!
//! Both carry a small set of recognized keys as typed fields; anything else the
//! extractor sends is kept verbatim in `extra` so it survives a round trip but
//! is never interpreted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Computed CSS properties captured for one element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleMap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(
        rename = "backgroundColor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub background_color: Option<String>,
    #[serde(rename = "fontSize", default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(rename = "fontWeight", default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    /// Unrecognized properties, preserved as sent
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Viewport and document geometry at extraction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportInfo {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(rename = "deviceScaleFactor", default = "default_scale_factor")]
    pub device_scale_factor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_height: Option<u32>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_scale_factor() -> f64 {
    1.0
}

impl Default for ViewportInfo {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            device_scale_factor: default_scale_factor(),
            document_width: None,
            document_height: None,
            extra: BTreeMap::new(),
        }
    }
}

impl ViewportInfo {
    /// Full scrollable document size, when the extractor reported both axes.
    pub fn document_dimensions(&self) -> Option<(u32, u32)> {
        Some((self.document_width?, self.document_height?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn style_keeps_unknown_properties() {
        let style: StyleMap = serde_json::from_value(json!({
            "color": "rgb(0, 0, 0)",
            "fontSize": "16px",
            "lineHeight": "24px"
        }))
        .unwrap();
        assert_eq!(style.color.as_deref(), Some("rgb(0, 0, 0)"));
        assert_eq!(style.font_size.as_deref(), Some("16px"));
        assert!(style.background_color.is_none());
        assert_eq!(style.extra["lineHeight"], json!("24px"));

        let back = serde_json::to_value(&style).unwrap();
        assert_eq!(back["lineHeight"], json!("24px"));
        assert!(back.get("backgroundColor").is_none());
    }

    #[test]
    fn viewport_document_dimensions() {
        let viewport: ViewportInfo = serde_json::from_value(json!({
            "width": 1280,
            "height": 720,
            "deviceScaleFactor": 2,
            "document_width": 1280,
            "document_height": 5400,
            "orientation": "landscape"
        }))
        .unwrap();
        assert_eq!(viewport.document_dimensions(), Some((1280, 5400)));
        assert_eq!(viewport.device_scale_factor, 2.0);
        assert!(viewport.extra.contains_key("orientation"));

        let partial: ViewportInfo =
            serde_json::from_value(json!({"width": 800, "height": 600})).unwrap();
        assert_eq!(partial.document_dimensions(), None);
        assert_eq!(partial.device_scale_factor, 1.0);
    }
}
