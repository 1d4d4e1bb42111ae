//! Time signatures: one whole glyph, or stacked numerator and denominator
//! digits

use std::fmt;

use thiserror::Error;

use crate::geometry::{Point, Rect};
use crate::glyph::{GlyphId, GlyphStore, Shape};
use crate::tables::SignatureTables;

use super::{Staff, StaffId};

/// Duration of a quarter note, in divisions
pub const QUARTER_DURATION: u32 = 96;

/// Value of a time signature, as written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRational {
    pub num: u32,
    pub den: u32,
}

impl TimeRational {
    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    /// Measure duration in divisions
    pub fn duration(&self) -> u32 {
        4 * QUARTER_DURATION * self.num / self.den
    }
}

impl Default for TimeRational {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

impl fmt::Display for TimeRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Why the glyphs of a time signature do not make a value
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimeSignatureError {
    #[error("time component {0} sits on the middle line")]
    MiddleLine(GlyphId),
    #[error("single time component {0}")]
    SingleComponent(GlyphId),
    #[error("whole time signature {0} mixed with other components")]
    Mixed(GlyphId),
    #[error("time signature without numerator or denominator")]
    Incomplete,
    #[error("{0} is not a time component")]
    NotTime(GlyphId),
}

/// Time signature of one staff in a measure
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSignature {
    staff: StaffId,
    glyphs: Vec<GlyphId>,
}

impl TimeSignature {
    pub(crate) fn new(staff: StaffId, glyph: GlyphId) -> Self {
        Self {
            staff,
            glyphs: vec![glyph],
        }
    }

    pub fn staff(&self) -> StaffId {
        self.staff
    }

    pub fn glyphs(&self) -> &[GlyphId] {
        &self.glyphs
    }

    /// Add a component, keeping digits ordered left to right so that `12`
    /// reads as twelve
    pub(crate) fn add_glyph(&mut self, glyph: GlyphId, store: &GlyphStore) {
        if self.glyphs.contains(&glyph) {
            return;
        }
        self.glyphs.push(glyph);
        self.glyphs.sort_by(|a, b| {
            let xa = store.get(*a).map_or(0.0, |g| g.bounds().x);
            let xb = store.get(*b).map_or(0.0, |g| g.bounds().x);
            xa.total_cmp(&xb).then_with(|| a.cmp(b))
        });
    }

    pub fn bounds(&self, store: &GlyphStore) -> Option<Rect> {
        self.glyphs
            .iter()
            .filter_map(|g| store.get(*g))
            .map(|g| g.bounds())
            .reduce(|acc, r| acc.union(&r))
    }

    pub fn center(&self, store: &GlyphStore) -> Option<Point> {
        self.bounds(store).map(|b| b.center())
    }

    /// Whether one of the glyphs draws the whole signature
    pub fn is_whole(&self, store: &GlyphStore, tables: &SignatureTables) -> bool {
        self.glyphs
            .iter()
            .filter_map(|g| store.get(*g).and_then(|g| g.shape()))
            .any(|s| tables.whole_time(s).is_some())
    }

    /// Value read from the glyphs, digits above the middle line making the
    /// numerator and digits below it the denominator
    pub fn rational(
        &self,
        store: &GlyphStore,
        staff: &Staff,
        tables: &SignatureTables,
    ) -> Result<TimeRational, TimeSignatureError> {
        let mut num = 0;
        let mut den = 0;
        for id in &self.glyphs {
            let Some(glyph) = store.get(*id) else {
                continue;
            };
            let shape = glyph.shape().ok_or(TimeSignatureError::NotTime(*id))?;
            if let Some(rational) = tables.whole_time(shape) {
                if self.glyphs.len() > 1 {
                    return Err(TimeSignatureError::Mixed(*id));
                }
                return Ok(rational);
            }
            if self.glyphs.len() == 1 {
                return Err(TimeSignatureError::SingleComponent(*id));
            }
            let value = shape.time_digit().ok_or(TimeSignatureError::NotTime(*id))?;
            let pitch = staff.pitch_position_of(glyph.location().y).round() as i32;
            match pitch.signum() {
                -1 => num = 10 * num + value,
                1 => den = 10 * den + value,
                _ => return Err(TimeSignatureError::MiddleLine(*id)),
            }
        }
        if num == 0 || den == 0 {
            return Err(TimeSignatureError::Incomplete);
        }
        Ok(TimeRational::new(num, den))
    }

    /// Single-glyph shape equivalent to the signature, when there is one
    pub fn shape(&self, store: &GlyphStore, staff: &Staff, tables: &SignatureTables) -> Option<Shape> {
        self.rational(store, staff, tables)
            .ok()
            .and_then(|r| tables.time_shape(r))
    }
}
