//! Key signatures: a sequence of sharps or of flats at the start of a staff

use crate::geometry::{Point, Rect};
use crate::glyph::{GlyphId, GlyphStore, Shape};

use super::{Step, StaffId};

/// Steps altered by successive sharps
pub const SHARP_STEPS: [Step; 7] = [Step::F, Step::C, Step::G, Step::D, Step::A, Step::E, Step::B];

/// Steps altered by successive flats
pub const FLAT_STEPS: [Step; 7] = [Step::B, Step::E, Step::A, Step::D, Step::G, Step::C, Step::F];

/// Pitch positions of successive sharps under a treble clef
pub const SHARP_POSITIONS: [i32; 7] = [-4, -1, -5, -2, 1, -3, 0];

/// Pitch positions of successive flats under a treble clef
pub const FLAT_POSITIONS: [i32; 7] = [0, -3, 1, -2, 2, -1, 3];

/// Mean pitch position of the first `|key|` items of a key, under a
/// treble clef
pub fn mean_position(key: i32) -> f64 {
    let count = key.unsigned_abs().clamp(1, 7) as usize;
    let positions = if key >= 0 {
        &SHARP_POSITIONS
    } else {
        &FLAT_POSITIONS
    };
    positions[..count].iter().sum::<i32>() as f64 / count as f64
}

/// Key signature of one staff in a measure
#[derive(Debug, Clone, PartialEq)]
pub struct KeySignature {
    staff: StaffId,
    /// Ordered by abscissa
    glyphs: Vec<GlyphId>,
}

impl KeySignature {
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

    /// Number of sharps (positive) or flats (negative), `None` when sharps
    /// and flats are mixed
    pub fn key(&self, store: &GlyphStore) -> Option<i32> {
        let values: Vec<i32> = self
            .glyphs
            .iter()
            .filter_map(|g| store.get(*g).and_then(|g| g.shape()))
            .filter_map(|s: Shape| s.key_value())
            .collect();
        if values.iter().all(|v| *v > 0) || values.iter().all(|v| *v < 0) {
            Some(values.iter().sum::<i32>().clamp(-7, 7))
        } else {
            None
        }
    }

    /// Alteration the key applies to a step: 1, -1 or 0
    pub fn alter_for(&self, store: &GlyphStore, step: Step) -> Option<i32> {
        let key = self.key(store)?;
        let count = key.unsigned_abs() as usize;
        let alter = if key > 0 && SHARP_STEPS[..count].contains(&step) {
            1
        } else if key < 0 && FLAT_STEPS[..count].contains(&step) {
            -1
        } else {
            0
        };
        Some(alter)
    }
}
