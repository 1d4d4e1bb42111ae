//! Clefs and the pitch position to step/octave mapping

use std::fmt;

use crate::geometry::Point;
use crate::glyph::{GlyphId, Shape};

use super::StaffId;

/// Diatonic note step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Step {
    const ALL: [Step; 7] = [Step::C, Step::D, Step::E, Step::F, Step::G, Step::A, Step::B];
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A clef found in a measure
#[derive(Debug, Clone, PartialEq)]
pub struct Clef {
    pub shape: Shape,
    pub staff: StaffId,
    pub center: Point,
    pub glyph: GlyphId,
}

impl Clef {
    /// Diatonic rank (`octave * 7 + step`) of the staff middle line
    fn middle_line_rank(shape: Shape) -> Option<i32> {
        let rank = match shape {
            // B4
            Shape::GClef | Shape::PercussionClef => 34,
            Shape::GClef8va => 41,
            Shape::GClef8vb => 27,
            // C4
            Shape::CClef => 28,
            // D3
            Shape::FClef => 22,
            Shape::FClef8va => 29,
            Shape::FClef8vb => 15,
            _ => return None,
        };
        Some(rank)
    }

    fn rank_of(&self, pitch_position: i32) -> i32 {
        // Defaults to treble for shapes that are not clefs
        Self::middle_line_rank(self.shape).unwrap_or(34) - pitch_position
    }

    pub fn is_clef_shape(shape: Shape) -> bool {
        Self::middle_line_rank(shape).is_some()
    }

    pub fn step_of(&self, pitch_position: i32) -> Step {
        Step::ALL[self.rank_of(pitch_position).rem_euclid(7) as usize]
    }

    pub fn octave_of(&self, pitch_position: i32) -> i32 {
        self.rank_of(pitch_position).div_euclid(7)
    }
}
