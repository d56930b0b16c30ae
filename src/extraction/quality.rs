//! # Extraction Quality Classifier
//!
//! Scores a set of extracted element records by how useful they are likely to
//! be for spatial grounding, and explains what looks wrong.
//!
//! ## Tiers
//!
//! | Elements | Tier |
//! |----------|------|
//! | 0 | `Empty` |
//! | 1-4 | `Poor` |
//! | 5-20 | `Low` |
//! | 21+ | `Good` when ≥ 3 distinct tags and a heading, else `Low` |
//!
//! ## Warnings
//!
//! Independent of the tier and of each other, always in this order:
//! 1. `LOW_ELEMENT_COUNT`: 1-4 elements
//! 2. `LOW_TAG_DIVERSITY`: fewer than 3 distinct tags among 21+ elements
//! 3. `NO_HEADINGS`: no h1-h6 among 10+ elements
//! 4. `MANY_HIDDEN`: more than half the elements hidden
//! 5. `MINIMAL_TEXT`: average text under 10 characters
//!
//! An empty input yields only `NO_ELEMENTS` and zeroed metrics.
//!
//! Classification is a single pass and never fails.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::extraction::element::{PageElementRecord, HEADING_TAGS};

pub const POOR_MAX_ELEMENTS: usize = 4;
pub const LOW_MAX_ELEMENTS: usize = 20;
pub const MIN_TAG_DIVERSITY: usize = 3;
/// Heading check starts at half the `Low` ceiling.
pub const HEADING_CHECK_MIN_ELEMENTS: usize = LOW_MAX_ELEMENTS / 2;
pub const MAX_HIDDEN_RATIO: f64 = 0.5;
pub const MIN_AVG_TEXT_CHARS: f64 = 10.0;

/// Pages known to extract cleanly, for checking the setup.
pub const VERIFICATION_URLS: [&str; 2] = ["https://example.com", "https://httpbin.org/html"];

/// Quality tier of an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionQuality {
    Empty,
    Poor,
    Low,
    Good,
}

impl fmt::Display for ExtractionQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExtractionQuality::Empty => "empty",
            ExtractionQuality::Poor => "poor",
            ExtractionQuality::Low => "low",
            ExtractionQuality::Good => "good",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    NoElements,
    LowElementCount,
    LowTagDiversity,
    NoHeadings,
    ManyHidden,
    MinimalText,
    LowElementCountPerTile,
}

impl WarningCode {
    pub fn as_str(self) -> &'static str {
        match self {
            WarningCode::NoElements => "NO_ELEMENTS",
            WarningCode::LowElementCount => "LOW_ELEMENT_COUNT",
            WarningCode::LowTagDiversity => "LOW_TAG_DIVERSITY",
            WarningCode::NoHeadings => "NO_HEADINGS",
            WarningCode::ManyHidden => "MANY_HIDDEN",
            WarningCode::MinimalText => "MINIMAL_TEXT",
            WarningCode::LowElementCountPerTile => "LOW_ELEMENT_COUNT_PER_TILE",
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    Info,
    Warning,
}

/// One actionable finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityWarning {
    pub code: WarningCode,
    pub message: String,
    pub suggestion: String,
    pub severity: WarningSeverity,
}

impl QualityWarning {
    pub fn new(
        code: WarningCode,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            suggestion: suggestion.into(),
            severity: WarningSeverity::Warning,
        }
    }

    pub fn with_severity(mut self, severity: WarningSeverity) -> Self {
        self.severity = severity;
        self
    }
}

/// Text length statistics, in characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStats {
    pub total_chars: usize,
    pub avg_chars: f64,
    pub min_chars: usize,
    pub max_chars: usize,
}

/// Counts and ratios gathered during classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub total_elements: usize,
    pub visible_elements: usize,
    pub hidden_elements: usize,
    pub heading_count: usize,
    pub unique_tags: usize,
    pub visible_ratio: f64,
    pub hidden_ratio: f64,
    pub tag_distribution: BTreeMap<String, usize>,
    pub text: TextStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub quality: ExtractionQuality,
    pub metrics: QualityMetrics,
    pub warnings: Vec<QualityWarning>,
}

impl QualityReport {
    pub fn has_warning(&self, code: WarningCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    pub fn warning_codes(&self) -> Vec<WarningCode> {
        self.warnings.iter().map(|w| w.code).collect()
    }
}

/// Classify `elements` in one pass.
///
/// Pass an empty iterator when no extraction took place.
///
/// ```rust
/// use tiled_vision::extraction::quality::{assess_quality, ExtractionQuality, WarningCode};
///
/// let report = assess_quality(&[]);
/// assert_eq!(report.quality, ExtractionQuality::Empty);
/// assert_eq!(report.warning_codes(), vec![WarningCode::NoElements]);
/// ```
pub fn assess_quality<'a, I>(elements: I) -> QualityReport
where
    I: IntoIterator<Item = &'a PageElementRecord>,
{
    let mut metrics = QualityMetrics::default();
    let mut tags: HashSet<String> = HashSet::new();
    let mut min_chars = usize::MAX;

    for element in elements {
        metrics.total_elements += 1;

        let tag = element.tag_name.to_ascii_lowercase();
        if HEADING_TAGS.contains(&tag.as_str()) {
            metrics.heading_count += 1;
        }
        *metrics.tag_distribution.entry(tag.clone()).or_default() += 1;
        tags.insert(tag);

        if element.is_visible {
            metrics.visible_elements += 1;
        }

        let chars = element.text_len();
        metrics.text.total_chars += chars;
        min_chars = min_chars.min(chars);
        metrics.text.max_chars = metrics.text.max_chars.max(chars);
    }

    let count = metrics.total_elements;
    if count == 0 {
        return QualityReport {
            quality: ExtractionQuality::Empty,
            metrics,
            warnings: vec![QualityWarning::new(
                WarningCode::NoElements,
                "No DOM elements were extracted from the page.",
                format!(
                    "Verify the page has loaded completely and contains the expected content. \
                     Try a simple page like {} or {} to confirm extraction is working.",
                    VERIFICATION_URLS[0], VERIFICATION_URLS[1]
                ),
            )],
        };
    }

    metrics.unique_tags = tags.len();
    metrics.hidden_elements = count - metrics.visible_elements;
    metrics.visible_ratio = metrics.visible_elements as f64 / count as f64;
    metrics.hidden_ratio = metrics.hidden_elements as f64 / count as f64;
    metrics.text.min_chars = min_chars;
    metrics.text.avg_chars = metrics.text.total_chars as f64 / count as f64;

    let has_heading = metrics.heading_count > 0;
    let mut warnings = Vec::new();

    if count <= POOR_MAX_ELEMENTS {
        warnings.push(QualityWarning::new(
            WarningCode::LowElementCount,
            format!("Only {count} element(s) extracted, which is very sparse."),
            format!(
                "Check that the page finished loading, or widen the extraction selectors. \
                 Test with {} to verify the setup.",
                VERIFICATION_URLS[0]
            ),
        ));
    }

    if metrics.unique_tags < MIN_TAG_DIVERSITY && count > LOW_MAX_ELEMENTS {
        warnings.push(QualityWarning::new(
            WarningCode::LowTagDiversity,
            format!(
                "Only {} unique tag type(s) found among {count} elements.",
                metrics.unique_tags
            ),
            "Widen the extraction selectors to capture a broader variety of content \
             (headings, paragraphs, links).",
        ));
    }

    if !has_heading && count >= HEADING_CHECK_MIN_ELEMENTS {
        warnings.push(QualityWarning::new(
            WarningCode::NoHeadings,
            "No heading elements (h1-h6) found in the extraction.",
            "Headings carry most of a page's structure. Add h1-h6 to the extraction selectors.",
        ));
    }

    if metrics.hidden_ratio > MAX_HIDDEN_RATIO {
        warnings.push(QualityWarning::new(
            WarningCode::ManyHidden,
            format!(
                "{}% of elements are hidden ({}/{count}).",
                (metrics.hidden_ratio * 100.0) as u32,
                metrics.hidden_elements
            ),
            "The page may not have rendered fully, or content sits behind user interaction. \
             Add wait time or check for dynamically loaded content.",
        ));
    }

    if metrics.text.avg_chars < MIN_AVG_TEXT_CHARS {
        warnings.push(QualityWarning::new(
            WarningCode::MinimalText,
            format!(
                "Average text length is only {:.1} characters per element.",
                metrics.text.avg_chars
            ),
            "Extraction may be picking up UI chrome rather than content, \
             or the page has little text.",
        ));
    }

    let quality = if count <= POOR_MAX_ELEMENTS {
        ExtractionQuality::Poor
    } else if count <= LOW_MAX_ELEMENTS {
        ExtractionQuality::Low
    } else if metrics.unique_tags >= MIN_TAG_DIVERSITY && has_heading {
        ExtractionQuality::Good
    } else {
        ExtractionQuality::Low
    };

    QualityReport {
        quality,
        metrics,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_grid::BoundingRect;

    fn el(tag: &str, text: &str, visible: bool) -> PageElementRecord {
        PageElementRecord::new(tag, text, visible, BoundingRect::new(0.0, 0.0, 10.0, 10.0))
    }

    #[test]
    fn empty_returns_only_no_elements() {
        let report = assess_quality(&[]);
        assert_eq!(report.quality, ExtractionQuality::Empty);
        assert_eq!(report.warning_codes(), vec![WarningCode::NoElements]);
        assert_eq!(report.metrics, QualityMetrics::default());
        assert!(report.warnings[0].suggestion.contains("https://example.com"));
    }

    #[test]
    fn tier_boundaries() {
        let make = |n: usize| -> Vec<PageElementRecord> {
            (0..n)
                .map(|i| match i % 3 {
                    0 => el("h1", "A heading of decent length", true),
                    1 => el("p", "Paragraph with enough text", true),
                    _ => el("a", "A link with enough text", true),
                })
                .collect()
        };
        assert_eq!(assess_quality(&make(1)).quality, ExtractionQuality::Poor);
        assert_eq!(assess_quality(&make(4)).quality, ExtractionQuality::Poor);
        assert_eq!(assess_quality(&make(5)).quality, ExtractionQuality::Low);
        assert_eq!(assess_quality(&make(20)).quality, ExtractionQuality::Low);
        assert_eq!(assess_quality(&make(21)).quality, ExtractionQuality::Good);
        assert!(assess_quality(&make(21)).warnings.is_empty());
    }

    #[test]
    fn tags_compare_case_insensitively() {
        let mut records = vec![el("p", "Paragraph with enough text", true); 20];
        records.push(el("p", "Paragraph with enough text", true));
        for r in records.iter_mut().take(10) {
            r.tag_name = "P".into();
        }
        let report = assess_quality(&records);
        assert_eq!(report.metrics.unique_tags, 1);
        assert_eq!(report.metrics.tag_distribution["p"], 21);
    }

    #[test]
    fn many_hidden_reports_percentage() {
        let records = vec![
            el("p", "Visible paragraph text", true),
            el("p", "Hidden paragraph text", false),
            el("p", "Hidden paragraph text", false),
        ];
        let report = assess_quality(&records);
        let warning = report.warnings.iter().find(|w| w.code == WarningCode::ManyHidden).unwrap();
        assert_eq!(warning.message, "66% of elements are hidden (2/3).");
        assert_eq!(report.quality, ExtractionQuality::Poor);
        assert_eq!(
            report.warning_codes(),
            vec![WarningCode::LowElementCount, WarningCode::ManyHidden]
        );
    }

    #[test]
    fn exactly_half_hidden_is_not_many() {
        let records = vec![
            el("p", "Visible paragraph text", true),
            el("p", "Hidden paragraph text", false),
        ];
        assert!(!assess_quality(&records).has_warning(WarningCode::ManyHidden));
    }

    #[test]
    fn text_stats() {
        let records = vec![el("p", "abc", true), el("p", "", true), el("p", "héllo", true)];
        let stats = assess_quality(&records).metrics.text;
        assert_eq!(stats.total_chars, 8);
        assert_eq!((stats.min_chars, stats.max_chars), (0, 5));
        assert!((stats.avg_chars - 8.0 / 3.0).abs() < 1e-9);
    }
}
