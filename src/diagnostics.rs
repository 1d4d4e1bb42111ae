//! Error sink for recoverable assembly problems
//!
//! Nothing reported here stops assembly. Each entry is also forwarded to
//! the `log` facade so a pipeline run leaves a trace.

use std::fmt;

use crate::glyph::GlyphId;

/// A recoverable problem found during assembly
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub glyph: Option<GlyphId>,
    pub message: String,
}

/// Category of assembly problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// No chord or slot qualified for a notation glyph
    Unattached,
    /// Composite signature not found in the lookup tables
    Signature,
    /// Entity created without its expected context (e.g. no chord)
    Context,
    /// Lyrics or beam mapping failure
    Mapping,
    /// Glyph whose shape has no assembly rule
    Unsupported,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Unattached => write!(f, "unattached"),
            DiagnosticCategory::Signature => write!(f, "signature"),
            DiagnosticCategory::Context => write!(f, "context"),
            DiagnosticCategory::Mapping => write!(f, "mapping"),
            DiagnosticCategory::Unsupported => write!(f, "unsupported"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.glyph {
            Some(glyph) => write!(f, "[{}] {}: {}", self.category, glyph, self.message),
            None => write!(f, "[{}] {}", self.category, self.message),
        }
    }
}

/// Collector of diagnostics for one score
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem, optionally tied to a glyph
    pub fn add_error(
        &mut self,
        category: DiagnosticCategory,
        glyph: Option<GlyphId>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            category,
            glyph,
            message: message.into(),
        };
        log::warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn of_category(&self, category: DiagnosticCategory) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.category == category)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
