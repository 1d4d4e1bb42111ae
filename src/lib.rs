//! omr-score - score entity assembly for optical music recognition
//!
//! Classified glyphs (a shape, a bounding box, a fitted line) are turned
//! into the logical entities of a score: time slots and chords, beams,
//! barlines, dynamics, notations, directions and lyrics.
//!
//! # Example
//!
//! ```rust
//! use omr_score::assemble;
//!
//! let report = assemble(r#"
//!     [[pages]]
//!     [[pages.systems]]
//!     parts = [{ staves = [{ left = 0.0, top = 100.0, width = 200.0 }] }]
//! "#).unwrap();
//! assert!(report.contains("measure M#0"));
//! ```

pub mod assembly;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fixture;
pub mod geometry;
pub mod glyph;
pub mod report;
pub mod score;
pub mod tables;

pub use assembly::Assembler;
pub use config::{ConfigError, ScoreConfig, SlotPolicy};
pub use diagnostics::{Diagnostic, DiagnosticCategory, Diagnostics};
pub use error::ScoreError;
pub use fixture::{FixtureError, LoadedScore};
pub use glyph::{Fraction, Glyph, GlyphId, Scale, Shape, ShapeFamily};
pub use score::Score;
pub use tables::SignatureTables;

use thiserror::Error;

/// Errors that can occur during the fixture to report pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Error while loading the fixture
    #[error("fixture error: {0}")]
    Fixture(#[from] FixtureError),

    /// Structural error during assembly
    #[error("assembly error: {0}")]
    Score(#[from] ScoreError),
}

/// Configuration for the complete pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Assembly thresholds
    pub score: ScoreConfig,
    /// Signature lookup tables
    pub tables: SignatureTables,
    /// Append glyph to entity links to the report
    pub links: bool,
}

impl PipelineConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the assembly thresholds
    pub fn with_score(mut self, config: ScoreConfig) -> Self {
        self.score = config;
        self
    }

    /// Set the signature tables
    pub fn with_tables(mut self, tables: SignatureTables) -> Self {
        self.tables = tables;
        self
    }

    /// Enable or disable the links section of the report
    pub fn with_links(mut self, links: bool) -> Self {
        self.links = links;
        self
    }
}

/// An assembled score and its report
#[derive(Debug)]
pub struct Assembled {
    pub score: Score,
    pub report: String,
}

/// Load a fixture, assemble it and render the report with default
/// configuration
pub fn assemble(source: &str) -> Result<String, PipelineError> {
    assemble_with_config(source, &PipelineConfig::default()).map(|a| a.report)
}

/// Load a fixture, assemble it and render the report
pub fn assemble_with_config(
    source: &str,
    config: &PipelineConfig,
) -> Result<Assembled, PipelineError> {
    let LoadedScore { mut score, systems } = LoadedScore::from_str(source)?;

    let assembler = Assembler::new(&config.score, &config.tables);
    assembler.assemble(&mut score, &systems)?;

    let mut report = report::render(&score, &config.tables);
    if config.links {
        report.push_str(&report::render_links(&score));
    }
    Ok(Assembled { score, report })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_empty_page() {
        let report = assemble("[[pages]]").unwrap();
        assert_eq!(report, "");
    }

    #[test]
    fn test_assemble_invalid_fixture() {
        let err = assemble("pages = 3").unwrap_err();
        assert!(matches!(err, PipelineError::Fixture(FixtureError::ParseError(_))));
    }

    #[test]
    fn test_glyph_outside_measures_does_not_stop_assembly() {
        let assembled = assemble_with_config(
            r#"
            [[pages]]
            [[pages.systems]]
            parts = [{ staves = [{ left = 0.0, top = 100.0, width = 200.0 }] }]
            glyphs = [{ shape = "CODA", bounds = [300.0, 60.0, 20.0, 20.0] }]

            [[pages.systems]]
            parts = [{ staves = [{ left = 0.0, top = 400.0, width = 200.0 }] }]
            glyphs = [{ shape = "SEGNO", bounds = [50.0, 360.0, 20.0, 20.0] }]
            "#,
            &PipelineConfig::default(),
        )
        .unwrap();
        let diagnostics = assembled.score.diagnostics.entries();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics[0].to_string(),
            "[unattached] G#0: CODA at 310.0 lies outside every measure of P#0"
        );
        assert!(assembled.report.contains("segno E#0 on no chord"));
    }
}
