//! Chords: notes performed together, anchors of notations and directions

use std::cell::Cell;
use std::cmp::Ordering;

use crate::geometry::{Point, Rect};
use crate::glyph::GlyphId;

use super::{ChordId, EntityId, MeasureId, SlotId, StaffId};

/// One note head (or rest) of a chord
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub glyph: GlyphId,
    pub center: Point,
    pub staff: StaffId,
    pub pitch_position: f64,
}

/// Stem glyph shared by the notes of a chord
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stem {
    pub glyph: GlyphId,
    pub bounds: Rect,
}

#[derive(Debug, Clone)]
pub struct Chord {
    id: ChordId,
    measure: MeasureId,
    staff: StaffId,
    slot: Option<SlotId>,
    stem: Option<Stem>,
    whole: bool,
    notes: Vec<Note>,
    /// Directions and notations whose parent is this chord
    entities: Vec<EntityId>,
    /// Notations attached to a sibling chord that also apply here
    notation_links: Vec<EntityId>,
    /// Head and tail locations, `None` when stale
    locations: Cell<Option<(Point, Point)>>,
}

impl Chord {
    pub(crate) fn new(
        id: ChordId,
        measure: MeasureId,
        staff: StaffId,
        slot: Option<SlotId>,
        stem: Option<Stem>,
    ) -> Self {
        Self {
            id,
            measure,
            staff,
            slot,
            stem,
            whole: false,
            notes: Vec::new(),
            entities: Vec::new(),
            notation_links: Vec::new(),
            locations: Cell::new(None),
        }
    }

    /// A chord made of a whole rest, outside any slot
    pub(crate) fn new_whole(id: ChordId, measure: MeasureId, staff: StaffId) -> Self {
        Self {
            whole: true,
            ..Self::new(id, measure, staff, None, None)
        }
    }

    pub fn id(&self) -> ChordId {
        self.id
    }

    pub fn measure(&self) -> MeasureId {
        self.measure
    }

    pub fn staff(&self) -> StaffId {
        self.staff
    }

    pub fn slot(&self) -> Option<SlotId> {
        self.slot
    }

    pub fn stem(&self) -> Option<Stem> {
        self.stem
    }

    pub fn is_whole(&self) -> bool {
        self.whole
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    pub fn notation_links(&self) -> &[EntityId] {
        &self.notation_links
    }

    pub(crate) fn add_note(&mut self, note: Note) {
        self.notes.push(note);
        self.locations.set(None);
    }

    pub(crate) fn add_entity(&mut self, entity: EntityId) {
        if !self.entities.contains(&entity) {
            self.entities.push(entity);
        }
    }

    pub(crate) fn add_notation_link(&mut self, entity: EntityId) {
        if !self.notation_links.contains(&entity) {
            self.notation_links.push(entity);
        }
    }

    /// Location of the head farthest from the stem tail
    pub fn head_location(&self) -> Point {
        self.locations().0
    }

    /// Location of the stem free end (the head for stemless chords)
    pub fn tail_location(&self) -> Point {
        self.locations().1
    }

    fn locations(&self) -> (Point, Point) {
        if let Some(cached) = self.locations.get() {
            return cached;
        }
        let computed = self.compute_locations();
        self.locations.set(Some(computed));
        computed
    }

    fn compute_locations(&self) -> (Point, Point) {
        let Some(first) = self.notes.first() else {
            let origin = self
                .stem
                .map(|s| s.bounds.center())
                .unwrap_or_default();
            return (origin, origin);
        };
        let Some(stem) = self.stem else {
            return (first.center, first.center);
        };

        let middle = stem.bounds.center();
        let farthest = self
            .notes
            .iter()
            .max_by(|a, b| {
                let da = (a.center.y - middle.y).abs();
                let db = (b.center.y - middle.y).abs();
                da.total_cmp(&db)
            })
            .unwrap_or(first);
        let stem_x = middle.x;
        let tail_y = if middle.y < farthest.center.y {
            // stem up
            stem.bounds.y
        } else {
            stem.bounds.bottom()
        };
        (
            Point::new(stem_x, farthest.center.y),
            Point::new(stem_x, tail_y),
        )
    }

    /// -1 for stem up, 1 for stem down, 0 without stem
    pub fn stem_dir(&self) -> i32 {
        if self.stem.is_none() {
            return 0;
        }
        let dy = self.tail_location().y - self.head_location().y;
        if dy < 0.0 {
            -1
        } else if dy > 0.0 {
            1
        } else {
            0
        }
    }

    /// Vertical span covered by head and tail
    pub fn span(&self) -> (f64, f64) {
        let (head, tail) = self.locations();
        (head.y.min(tail.y), head.y.max(tail.y))
    }

    /// Whether the head/tail span overlaps the `[top, bottom]` window
    pub fn is_embraced_by(&self, top: f64, bottom: f64) -> bool {
        let (low, high) = self.span();
        low <= bottom && high >= top
    }

    /// Order used within a slot: staff, then head ordinate, then id
    pub fn vertical_cmp(&self, other: &Chord) -> Ordering {
        self.staff
            .cmp(&other.staff)
            .then_with(|| {
                self.head_location()
                    .y
                    .total_cmp(&other.head_location().y)
            })
            .then_with(|| self.id.cmp(&other.id))
    }
}
