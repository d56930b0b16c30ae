//! # Page Element Records
//!
//! One record per DOM element the extractor reported: tag, text, visibility
//! and rectangle, plus the identification and style fields it captures
//! alongside. Records are normalized once, at construction (tag names are
//! lowercased and trimmed), so every consumer can compare tags directly.
//!
//! ## Wire Shape
//!
//! ```json
//! {
//!   "selector": "#main > p:nth-of-type(2)",
//!   "xpath": "/html/body/main/p[2]",
//!   "tag_name": "P",
//!   "text": "Hello",
//!   "rect": {"x": 10, "y": 20, "width": 300, "height": 18},
//!   "computed_style": {"color": "rgb(0, 0, 0)", "fontSize": "16px"},
//!   "is_visible": true,
//!   "z_index": 0,
//!   "is_fixed": false
//! }
//! ```
//!
//! Only `tag_name`, `text`, `rect` and `is_visible` are required.

use serde::{Deserialize, Serialize};
use tile_grid::coords::{to_absolute, BoundingRect};
use tile_grid::TileBounds;

use crate::extraction::style::{StyleMap, ViewportInfo};

/// Heading tags, already lowercase.
pub const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Record exactly as the extractor sends it, before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawElementRecord {
    pub tag_name: String,
    pub text: String,
    pub rect: BoundingRect,
    pub is_visible: bool,
    #[serde(default)]
    pub selector: String,
    #[serde(default)]
    pub xpath: String,
    #[serde(default)]
    pub computed_style: StyleMap,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub is_fixed: bool,
    #[serde(default)]
    pub tile_index: Option<u32>,
    #[serde(default)]
    pub tile_relative_rect: Option<BoundingRect>,
}

/// A normalized page element.
///
/// After [`PageElementRecord::rebase_onto_tile`], `rect` is in page space,
/// `tile_relative_rect` holds the rectangle as captured and `tile_index`
/// names the tile it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawElementRecord")]
pub struct PageElementRecord {
    pub selector: String,
    pub xpath: String,
    pub tag_name: String,
    pub text: String,
    pub rect: BoundingRect,
    pub computed_style: StyleMap,
    pub is_visible: bool,
    pub z_index: i32,
    /// `position: fixed` or `sticky`; such elements repeat in every tile
    pub is_fixed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile_relative_rect: Option<BoundingRect>,
}

impl From<RawElementRecord> for PageElementRecord {
    fn from(raw: RawElementRecord) -> Self {
        Self {
            selector: raw.selector,
            xpath: raw.xpath,
            tag_name: normalize_tag(&raw.tag_name),
            text: raw.text,
            rect: raw.rect,
            computed_style: raw.computed_style,
            is_visible: raw.is_visible,
            z_index: raw.z_index,
            is_fixed: raw.is_fixed,
            tile_index: raw.tile_index,
            tile_relative_rect: raw.tile_relative_rect,
        }
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().to_ascii_lowercase()
}

impl PageElementRecord {
    /// Minimal record; identification and style fields are left empty.
    pub fn new(
        tag_name: impl AsRef<str>,
        text: impl Into<String>,
        is_visible: bool,
        rect: BoundingRect,
    ) -> Self {
        Self {
            selector: String::new(),
            xpath: String::new(),
            tag_name: normalize_tag(tag_name.as_ref()),
            text: text.into(),
            rect,
            computed_style: StyleMap::default(),
            is_visible,
            z_index: 0,
            is_fixed: false,
            tile_index: None,
            tile_relative_rect: None,
        }
    }

    pub fn with_selector(mut self, selector: impl Into<String>, xpath: impl Into<String>) -> Self {
        self.selector = selector.into();
        self.xpath = xpath.into();
        self
    }

    pub fn with_fixed(mut self, is_fixed: bool) -> Self {
        self.is_fixed = is_fixed;
        self
    }

    pub fn is_heading(&self) -> bool {
        HEADING_TAGS.contains(&self.tag_name.as_str())
    }

    /// Text length in characters.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Stamp the source tile, keep the captured rectangle and move `rect` into
    /// page coordinates.
    pub fn rebase_onto_tile(&mut self, tile: &TileBounds) {
        self.tile_index = Some(tile.index);
        self.tile_relative_rect = Some(self.rect);
        self.rect = to_absolute(&self.rect, tile);
    }
}

/// Extractor policy: which elements are reported and how many.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionOptions {
    pub selectors: Vec<String>,
    pub include_hidden: bool,
    pub min_text_length: usize,
    pub max_elements: usize,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            selectors: [
                "h1", "h2", "h3", "h4", "h5", "h6", "p", "span", "a", "li", "button", "label",
                "td", "th", "caption", "figcaption", "blockquote",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            include_hidden: false,
            min_text_length: 1,
            max_elements: 500,
        }
    }
}

impl ExtractionOptions {
    /// Whether `record` passes the visibility, text-length and tag rules.
    ///
    /// Tag filtering only applies when every selector is a bare tag name;
    /// compound CSS selectors cannot be evaluated without the DOM.
    pub fn admits(&self, record: &PageElementRecord) -> bool {
        if !self.include_hidden && !record.is_visible {
            return false;
        }
        if record.text.trim().chars().count() < self.min_text_length {
            return false;
        }
        self.matches_tag(&record.tag_name)
    }

    fn matches_tag(&self, tag: &str) -> bool {
        let bare = self
            .selectors
            .iter()
            .all(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()));
        if !bare {
            return true;
        }
        self.selectors.iter().any(|s| s.eq_ignore_ascii_case(tag))
    }

    /// Apply the policy to already-extracted records, keeping document order.
    pub fn filter(&self, records: Vec<PageElementRecord>) -> Vec<PageElementRecord> {
        records
            .into_iter()
            .filter(|r| self.admits(r))
            .take(self.max_elements)
            .collect()
    }
}

/// Everything one extractor run reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionPayload {
    pub elements: Vec<PageElementRecord>,
    #[serde(default)]
    pub viewport: ViewportInfo,
    #[serde(default)]
    pub extraction_time_ms: f64,
    #[serde(default)]
    pub element_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tile(index: u32, x: u32, y: u32) -> TileBounds {
        TileBounds { index, row: index, column: 0, x, y, width: 1568, height: 1568 }
    }

    #[test]
    fn deserialize_normalizes_tag() {
        let record: PageElementRecord = serde_json::from_value(json!({
            "tag_name": " H2 ",
            "text": "Section",
            "rect": {"x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0},
            "is_visible": true,
            "computed_style": {"fontWeight": "700", "textTransform": "none"}
        }))
        .unwrap();
        assert_eq!(record.tag_name, "h2");
        assert!(record.is_heading());
        assert_eq!(record.z_index, 0);
        assert_eq!(record.computed_style.font_weight.as_deref(), Some("700"));
        assert!(record.computed_style.extra.contains_key("textTransform"));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let result: Result<PageElementRecord, _> =
            serde_json::from_value(json!({"tag_name": "p", "text": "x", "is_visible": true}));
        assert!(result.is_err());
    }

    #[test]
    fn rebase_keeps_original_rect() {
        let rect = BoundingRect::new(100.0, 200.0, 50.0, 30.0);
        let mut record = PageElementRecord::new("p", "text", true, rect);
        record.rebase_onto_tile(&tile(1, 0, 1518));
        assert_eq!(record.tile_index, Some(1));
        assert_eq!(record.tile_relative_rect, Some(rect));
        assert_eq!(record.rect, BoundingRect::new(100.0, 1718.0, 50.0, 30.0));
    }

    #[test]
    fn text_length_counts_characters() {
        let record = PageElementRecord::new("p", "héllo wörld", true, BoundingRect::default());
        assert_eq!(record.text_len(), 11);
    }

    #[test]
    fn options_filter_hidden_short_and_unlisted() {
        let rect = BoundingRect::default();
        let records = vec![
            PageElementRecord::new("p", "kept", true, rect),
            PageElementRecord::new("p", "hidden", false, rect),
            PageElementRecord::new("p", "   ", true, rect),
            PageElementRecord::new("div", "not selected", true, rect),
            PageElementRecord::new("H1", "Title", true, rect),
        ];
        let kept = ExtractionOptions::default().filter(records.clone());
        let tags: Vec<_> = kept.iter().map(|r| r.tag_name.as_str()).collect();
        assert_eq!(tags, vec!["p", "h1"]);

        let options = ExtractionOptions {
            include_hidden: true,
            max_elements: 2,
            ..Default::default()
        };
        let kept = options.filter(records);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].text, "hidden");
    }

    #[test]
    fn compound_selectors_disable_tag_filter() {
        let options = ExtractionOptions {
            selectors: vec!["main .card".into()],
            ..Default::default()
        };
        let record = PageElementRecord::new("div", "card body", true, BoundingRect::default());
        assert!(options.admits(&record));
    }

    #[test]
    fn payload_defaults() {
        let payload: ExtractionPayload = serde_json::from_value(json!({
            "elements": [],
            "viewport": {
                "width": 1568,
                "height": 1568,
                "document_width": 1568,
                "document_height": 4000
            }
        }))
        .unwrap();
        assert!(payload.elements.is_empty());
        assert_eq!(payload.viewport.document_dimensions(), Some((1568, 4000)));
    }
}
