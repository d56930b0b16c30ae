//! # Extraction Module
//!
//! Element records reported by the page extractor and the quality classifier
//! that scores them.
//!
//! ## Module Structure
//!
//! - **`element`**: normalized element records and the extraction policy
//! - **`style`**: computed-style and viewport payloads
//! - **`quality`**: tiering and warnings over a set of records

pub mod element;
pub mod quality;
pub mod style;

pub use element::{ExtractionOptions, ExtractionPayload, PageElementRecord, RawElementRecord};
pub use quality::{
    assess_quality, ExtractionQuality, QualityMetrics, QualityReport, QualityWarning, WarningCode,
    WarningSeverity,
};
pub use style::{StyleMap, ViewportInfo};
