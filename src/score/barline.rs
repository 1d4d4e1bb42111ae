//! Logical barlines built from stacked bar and dot glyphs

use std::cell::OnceCell;

use crate::error::{Result, ScoreError};
use crate::geometry::Rect;
use crate::glyph::{GlyphId, GlyphStore, Shape};
use crate::tables::SignatureTables;

use super::{MeasureId, Staff};

/// The barline closing a measure
///
/// Its shape is decoded from a signature string, one code per component
/// (`N` thin, `K` thick, `O` dot), read on the first staff of the part.
#[derive(Debug, Clone, Default)]
pub struct Barline {
    /// Ordered by abscissa
    glyphs: Vec<GlyphId>,
    signature: OnceCell<String>,
    shape: OnceCell<Option<Shape>>,
    forced: Option<Shape>,
}

impl Barline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn glyphs(&self) -> &[GlyphId] {
        &self.glyphs
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
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
        self.reset();
    }

    pub fn reset(&mut self) {
        self.signature.take();
        self.shape.take();
    }

    pub fn is_signature_cached(&self) -> bool {
        self.signature.get().is_some()
    }

    /// Signature of the components crossing the reference staff
    pub fn signature(&self, store: &GlyphStore, reference: &Staff) -> &str {
        self.signature
            .get_or_init(|| self.compute_signature(store, reference))
    }

    fn compute_signature(&self, store: &GlyphStore, reference: &Staff) -> String {
        let mut signature = String::new();
        let mut run = 0;
        let mut last = None;
        for glyph in self.glyphs.iter().filter_map(|g| store.get(*g)) {
            let Some(code) = glyph.shape().and_then(|s| s.barline_code()) else {
                continue;
            };
            let bounds = glyph.bounds();
            let on_staff = if code == 'O' {
                reference.contains_y(bounds.center().y)
            } else {
                reference.overlaps(bounds.y, bounds.bottom())
            };
            if !on_staff {
                continue;
            }
            if last == Some(code) {
                run += 1;
                let limit = if code == 'N' { 2 } else { 1 };
                if run > limit {
                    continue;
                }
            } else {
                run = 1;
                last = Some(code);
            }
            signature.push(code);
        }
        signature
    }

    /// Decoded shape, unless a shape was forced
    pub fn shape(
        &self,
        store: &GlyphStore,
        reference: &Staff,
        tables: &SignatureTables,
    ) -> Option<Shape> {
        if self.forced.is_some() {
            return self.forced;
        }
        *self
            .shape
            .get_or_init(|| tables.barline_shape(self.signature(store, reference)))
    }

    /// Override the decoded shape
    pub fn force_shape(&mut self, shape: Shape) {
        self.forced = Some(shape);
    }

    pub fn forced_shape(&self) -> Option<Shape> {
        self.forced
    }

    pub fn bounds(&self, store: &GlyphStore) -> Option<Rect> {
        self.glyphs
            .iter()
            .filter_map(|g| store.get(*g))
            .map(|g| g.bounds())
            .reduce(|acc, r| acc.union(&r))
    }

    /// Left edge of the leftmost component
    pub fn left_x(&self, store: &GlyphStore, measure: MeasureId) -> Result<f64> {
        self.bounds(store)
            .map(|b| b.x)
            .ok_or_else(|| ScoreError::illegal_state(measure, "barline has no component"))
    }

    /// Right edge of the rightmost component
    pub fn right_x(&self, store: &GlyphStore, measure: MeasureId) -> Result<f64> {
        self.bounds(store)
            .map(|b| b.right())
            .ok_or_else(|| ScoreError::illegal_state(measure, "barline has no component"))
    }
}
