//! Common test utilities and helpers for the tiled-vision tests
//!
//! Element fixtures shaped like real extractor output, plus a few assertions
//! shared by the integration suites.

#![allow(dead_code)]

/// Element record fixtures
pub mod fixtures {
    use tiled_vision::grid::BoundingRect;
    use tiled_vision::PageElementRecord;

    /// One visible element, 320x18 at `(0, y)`.
    pub fn element(tag: &str, text: &str, y: f64) -> PageElementRecord {
        PageElementRecord::new(tag, text, true, BoundingRect::new(0.0, y, 320.0, 18.0))
    }

    pub fn hidden(tag: &str, text: &str) -> PageElementRecord {
        PageElementRecord::new(tag, text, false, BoundingRect::new(0.0, 0.0, 0.0, 0.0))
    }

    /// A well-structured article: one h1 followed by paragraphs, links and
    /// list items, all visible with plenty of text.
    pub fn article(count: usize) -> Vec<PageElementRecord> {
        (0..count)
            .map(|i| {
                let y = i as f64 * 24.0;
                match i % 4 {
                    0 if i == 0 => element("h1", "Quarterly report on tiling", y),
                    0 => element("li", "A list item with some detail", y),
                    1 => element("p", "Paragraph text describing the results", y),
                    2 => element("a", "Read the full methodology", y),
                    _ => element("h2", "Section heading for findings", y),
                }
            })
            .collect()
    }

    /// `count` identical `div` records.
    pub fn divs(count: usize) -> Vec<PageElementRecord> {
        (0..count)
            .map(|i| element("div", "Generic container text", i as f64 * 20.0))
            .collect()
    }

    /// A fixed navigation bar as it appears in every tile.
    pub fn fixed_nav() -> PageElementRecord {
        element("a", "Home navigation link", 0.0)
            .with_selector("#nav > a", "/html/body/nav/a")
            .with_fixed(true)
    }
}

/// Assertion helpers
pub mod assertions {
    pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected} ± {tolerance}, got {actual}"
        );
    }
}
