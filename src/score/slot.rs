//! Time slots: positions in a measure where chords start together

use std::cell::Cell;

use crate::geometry::{Point, PointPopulation};
use crate::glyph::GlyphId;

use super::{Arena, Chord, ChordId, MeasureId, SlotId, StaffId};

/// A time slot
///
/// With a stem reference the slot sits at the stem that created it. Without
/// one, the reference point is the mean location of the inserted glyphs,
/// recomputed lazily after each insertion.
#[derive(Debug, Clone)]
pub struct Slot {
    id: SlotId,
    measure: MeasureId,
    stem_location: Option<Point>,
    population: PointPopulation,
    glyphs: Vec<GlyphId>,
    /// Ordered by staff, then head ordinate
    chords: Vec<ChordId>,
    reference: Cell<Option<Point>>,
}

impl Slot {
    /// Slot anchored at a stem location
    pub(crate) fn with_stem(id: SlotId, measure: MeasureId, stem_location: Point) -> Self {
        Self {
            stem_location: Some(stem_location),
            ..Self::with_heads(id, measure)
        }
    }

    /// Slot anchored at the mean of its note heads
    pub(crate) fn with_heads(id: SlotId, measure: MeasureId) -> Self {
        Self {
            id,
            measure,
            stem_location: None,
            population: PointPopulation::default(),
            glyphs: Vec::new(),
            chords: Vec::new(),
            reference: Cell::new(None),
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn measure(&self) -> MeasureId {
        self.measure
    }

    pub fn glyphs(&self) -> &[GlyphId] {
        &self.glyphs
    }

    pub fn chords(&self) -> &[ChordId] {
        &self.chords
    }

    pub(crate) fn add_glyph(&mut self, glyph: GlyphId, location: Point) {
        self.glyphs.push(glyph);
        self.population.include(location);
        self.reference.set(None);
    }

    pub(crate) fn add_chord(&mut self, chord: ChordId) {
        if !self.chords.contains(&chord) {
            self.chords.push(chord);
        }
    }

    /// Whether the cached reference point is still valid
    pub fn is_reference_cached(&self) -> bool {
        self.reference.get().is_some()
    }

    pub fn reference_point(&self) -> Point {
        if let Some(cached) = self.reference.get() {
            return cached;
        }
        let point = self
            .stem_location
            .or_else(|| self.population.mean())
            .unwrap_or_default();
        self.reference.set(Some(point));
        point
    }

    pub fn x(&self) -> f64 {
        self.reference_point().x
    }

    pub fn is_aligned_with(&self, point: Point, max_dx: f64) -> bool {
        (point.x - self.x()).abs() <= max_dx
    }

    /// Re-sort the chords vertically
    pub(crate) fn sort_chords(&mut self, chords: &Arena<ChordId, Chord>) {
        self.chords.sort_by(|a, b| chords[*a].vertical_cmp(&chords[*b]));
    }

    fn staff_chords<'a>(
        &'a self,
        chords: &'a Arena<ChordId, Chord>,
        staff: Option<StaffId>,
    ) -> impl Iterator<Item = &'a Chord> + 'a {
        self.chords
            .iter()
            .map(move |c| &chords[*c])
            .filter(move |c| staff.map_or(true, |s| c.staff() == s))
    }

    /// Lowest chord whose head lies above the point
    pub fn chord_above(
        &self,
        chords: &Arena<ChordId, Chord>,
        point: Point,
        staff: Option<StaffId>,
    ) -> Option<ChordId> {
        self.staff_chords(chords, staff)
            .filter(|c| c.head_location().y < point.y)
            .max_by(|a, b| a.head_location().y.total_cmp(&b.head_location().y))
            .map(Chord::id)
    }

    /// Highest chord whose head lies below the point
    pub fn chord_below(
        &self,
        chords: &Arena<ChordId, Chord>,
        point: Point,
        staff: Option<StaffId>,
    ) -> Option<ChordId> {
        self.staff_chords(chords, staff)
            .filter(|c| c.head_location().y > point.y)
            .min_by(|a, b| a.head_location().y.total_cmp(&b.head_location().y))
            .map(Chord::id)
    }

    /// Chords whose head/tail span overlaps `[top, bottom]`, top to bottom
    pub fn embraced_chords(
        &self,
        chords: &Arena<ChordId, Chord>,
        top: f64,
        bottom: f64,
    ) -> Vec<ChordId> {
        let mut found: Vec<&Chord> = self
            .chords
            .iter()
            .map(|c| &chords[*c])
            .filter(|c| c.is_embraced_by(top, bottom))
            .collect();
        found.sort_by(|a, b| a.span().0.total_cmp(&b.span().0));
        found.into_iter().map(Chord::id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_reference_is_fixed() {
        let mut slot = Slot::with_stem(SlotId(0), MeasureId(0), Point::new(100.0, 50.0));
        slot.add_glyph(GlyphId(0), Point::new(90.0, 60.0));
        slot.add_glyph(GlyphId(1), Point::new(94.0, 80.0));
        assert_eq!(slot.x(), 100.0);
    }

    #[test]
    fn test_head_reference_is_recomputed() {
        let mut slot = Slot::with_heads(SlotId(0), MeasureId(0));
        slot.add_glyph(GlyphId(0), Point::new(100.0, 60.0));
        assert_eq!(slot.reference_point(), Point::new(100.0, 60.0));
        assert!(slot.is_reference_cached());

        slot.add_glyph(GlyphId(1), Point::new(104.0, 80.0));
        assert!(!slot.is_reference_cached());
        assert_eq!(slot.reference_point(), Point::new(102.0, 70.0));
    }

    #[test]
    fn test_alignment() {
        let slot = Slot::with_stem(SlotId(0), MeasureId(0), Point::new(100.0, 50.0));
        assert!(slot.is_aligned_with(Point::new(125.0, 0.0), 25.0));
        assert!(!slot.is_aligned_with(Point::new(125.5, 0.0), 25.0));
    }
}
