//! Error types for structural failures during assembly
//!
//! Geometric ambiguity is never an error: it ends up in
//! [`Diagnostics`](crate::diagnostics::Diagnostics). A `ScoreError` means the
//! score tree handed to the assembler is inconsistent.

use thiserror::Error;

use crate::glyph::GlyphId;
use crate::score::{MeasureId, SystemId};

#[derive(Debug, Error)]
pub enum ScoreError {
    /// A system was populated before any part/staff was defined
    #[error("system {0} has no staff")]
    MissingStaff(SystemId),

    /// Reference to a glyph that is not in the store
    #[error("unknown glyph {0}")]
    UnknownGlyph(GlyphId),

    /// Glyph handed to populate without any shape
    #[error("glyph {0} has no shape")]
    MissingShape(GlyphId),

    /// Accessor invoked on a structure that lacks a required component
    #[error("illegal state in measure {measure}: {reason}")]
    IllegalState { measure: MeasureId, reason: String },
}

impl ScoreError {
    pub fn illegal_state(measure: MeasureId, reason: impl Into<String>) -> Self {
        Self::IllegalState {
            measure,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoreError>;
