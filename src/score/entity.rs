//! Directions and notations anchored in a measure
//!
//! A single [`ScoreEntity`] type covers every point-anchored item: its
//! [`EntityKind`] says what it is, and consumers match on the kind instead
//! of dispatching through a class per item.

use std::cell::{Cell, OnceCell};
use std::fmt;

use crate::geometry::{Point, Rect};
use crate::glyph::{GlyphId, GlyphStore, Shape, ShapeFamily};
use crate::tables::SignatureTables;

use super::{ChordId, EntityId, MeasureId};

/// Notations belong to the notes of a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotationKind {
    Arpeggiate,
    Articulation,
    Fermata,
    Ornament,
}

/// Directions apply to the music from a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectionKind {
    Pedal,
    Wedge,
    Coda,
    Segno,
    Dynamics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Notation(NotationKind),
    Direction(DirectionKind),
}

impl EntityKind {
    /// Kind of entity a glyph family turns into, if any
    pub fn of_family(family: ShapeFamily) -> Option<EntityKind> {
        use EntityKind::*;
        let kind = match family {
            ShapeFamily::Arpeggiate => Notation(NotationKind::Arpeggiate),
            ShapeFamily::Articulation => Notation(NotationKind::Articulation),
            ShapeFamily::Fermata => Notation(NotationKind::Fermata),
            ShapeFamily::Ornament => Notation(NotationKind::Ornament),
            ShapeFamily::Pedal => Direction(DirectionKind::Pedal),
            ShapeFamily::Wedge => Direction(DirectionKind::Wedge),
            ShapeFamily::Coda => Direction(DirectionKind::Coda),
            ShapeFamily::Segno => Direction(DirectionKind::Segno),
            ShapeFamily::Dynamics => Direction(DirectionKind::Dynamics),
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_notation(&self) -> bool {
        matches!(self, EntityKind::Notation(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Notation(NotationKind::Arpeggiate) => "arpeggiate",
            EntityKind::Notation(NotationKind::Articulation) => "articulation",
            EntityKind::Notation(NotationKind::Fermata) => "fermata",
            EntityKind::Notation(NotationKind::Ornament) => "ornament",
            EntityKind::Direction(DirectionKind::Pedal) => "pedal",
            EntityKind::Direction(DirectionKind::Wedge) => "wedge",
            EntityKind::Direction(DirectionKind::Coda) => "coda",
            EntityKind::Direction(DirectionKind::Segno) => "segno",
            EntityKind::Direction(DirectionKind::Dynamics) => "dynamics",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What an entity can currently provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub has_chord: bool,
    pub has_glyphs: bool,
    pub has_reference_point: bool,
}

/// A direction or notation
///
/// Shape, bounds, reference point and signature are derived from the
/// component glyphs on first use. Every change of the glyph set resets them.
#[derive(Debug, Clone)]
pub struct ScoreEntity {
    id: EntityId,
    kind: EntityKind,
    measure: MeasureId,
    chord: Option<ChordId>,
    /// Ordered by abscissa
    glyphs: Vec<GlyphId>,
    start: bool,
    /// Explicit reference point, overriding the glyph box center
    anchor: Option<Point>,
    shape: OnceCell<Option<Shape>>,
    bounds: Cell<Option<Rect>>,
    reference: Cell<Option<Point>>,
    signature: OnceCell<String>,
}

impl ScoreEntity {
    pub(crate) fn new(
        id: EntityId,
        kind: EntityKind,
        measure: MeasureId,
        chord: Option<ChordId>,
    ) -> Self {
        Self {
            id,
            kind,
            measure,
            chord,
            glyphs: Vec::new(),
            start: true,
            anchor: None,
            shape: OnceCell::new(),
            bounds: Cell::new(None),
            reference: Cell::new(None),
            signature: OnceCell::new(),
        }
    }

    pub(crate) fn with_start(mut self, start: bool) -> Self {
        self.start = start;
        self
    }

    pub(crate) fn with_anchor(mut self, anchor: Point) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn measure(&self) -> MeasureId {
        self.measure
    }

    pub fn chord(&self) -> Option<ChordId> {
        self.chord
    }

    pub fn glyphs(&self) -> &[GlyphId] {
        &self.glyphs
    }

    /// Start of a two-sided event (pedal down, wedge opening), `true` for
    /// one-sided items
    pub fn is_start(&self) -> bool {
        self.start
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            has_chord: self.chord.is_some(),
            has_glyphs: !self.glyphs.is_empty(),
            has_reference_point: self.anchor.is_some() || !self.glyphs.is_empty(),
        }
    }

    /// Add a component glyph, keeping components ordered by abscissa
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

    /// Invalidate every cached value
    pub fn reset(&mut self) {
        self.shape.take();
        self.signature.take();
        self.bounds.set(None);
        self.reference.set(None);
    }

    pub fn is_shape_cached(&self) -> bool {
        self.shape.get().is_some()
    }

    /// Concatenated codes of the component glyphs (dynamics letters)
    pub fn signature(&self, store: &GlyphStore) -> &str {
        self.signature.get_or_init(|| {
            self.glyphs
                .iter()
                .filter_map(|g| store.get(*g))
                .filter_map(|g| g.shape().and_then(|s| s.dynamics_code()))
                .collect()
        })
    }

    /// Logical shape: the signature lookup for dynamics, the first
    /// component shape otherwise
    pub fn shape(&self, store: &GlyphStore, tables: &SignatureTables) -> Option<Shape> {
        *self.shape.get_or_init(|| match self.kind {
            EntityKind::Direction(DirectionKind::Dynamics) => {
                tables.dynamics_shape(self.signature(store))
            }
            _ => self
                .glyphs
                .first()
                .and_then(|g| store.get(*g))
                .and_then(|g| g.shape()),
        })
    }

    /// Union of the component boxes
    pub fn bounds(&self, store: &GlyphStore) -> Option<Rect> {
        if let Some(cached) = self.bounds.get() {
            return Some(cached);
        }
        let bounds = self
            .glyphs
            .iter()
            .filter_map(|g| store.get(*g))
            .map(|g| g.bounds())
            .reduce(|acc, r| acc.union(&r))?;
        self.bounds.set(Some(bounds));
        Some(bounds)
    }

    pub fn center(&self, store: &GlyphStore) -> Option<Point> {
        self.bounds(store).map(|b| b.center())
    }

    pub fn reference_point(&self, store: &GlyphStore) -> Option<Point> {
        if let Some(cached) = self.reference.get() {
            return Some(cached);
        }
        let point = self.anchor.or_else(|| self.center(store))?;
        self.reference.set(Some(point));
        Some(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::Glyph;

    fn dynamics() -> ScoreEntity {
        ScoreEntity::new(
            EntityId(0),
            EntityKind::Direction(DirectionKind::Dynamics),
            MeasureId(0),
            None,
        )
    }

    #[test]
    fn test_signature_follows_abscissa() {
        let mut store = GlyphStore::new();
        let f = store.insert(Glyph::new(Shape::DynamicsF, Rect::new(30.0, 0.0, 10.0, 12.0)));
        let m = store.insert(Glyph::new(Shape::DynamicsCharM, Rect::new(10.0, 0.0, 14.0, 10.0)));
        let mut entity = dynamics();
        entity.add_glyph(f, &store);
        entity.add_glyph(m, &store);
        assert_eq!(entity.signature(&store), "mf");
        assert_eq!(
            entity.shape(&store, &SignatureTables::standard()),
            Some(Shape::DynamicsMf)
        );
    }

    #[test]
    fn test_glyph_insertion_resets_caches() {
        let mut store = GlyphStore::new();
        let tables = SignatureTables::standard();
        let a = store.insert(Glyph::new(Shape::DynamicsF, Rect::new(0.0, 0.0, 10.0, 10.0)));
        let b = store.insert(Glyph::new(Shape::DynamicsF, Rect::new(12.0, 0.0, 10.0, 10.0)));
        let mut entity = dynamics();
        entity.add_glyph(a, &store);
        assert_eq!(entity.shape(&store, &tables), Some(Shape::DynamicsF));
        assert!(entity.is_shape_cached());

        entity.add_glyph(b, &store);
        assert!(!entity.is_shape_cached());
        assert_eq!(entity.shape(&store, &tables), Some(Shape::DynamicsFf));
        assert_eq!(entity.bounds(&store), Some(Rect::new(0.0, 0.0, 22.0, 10.0)));
    }

    #[test]
    fn test_unknown_signature_has_no_shape() {
        let mut store = GlyphStore::new();
        let z = store.insert(Glyph::new(Shape::DynamicsCharZ, Rect::new(0.0, 0.0, 10.0, 10.0)));
        let mut entity = dynamics();
        entity.add_glyph(z, &store);
        assert_eq!(entity.shape(&store, &SignatureTables::standard()), None);
    }

    #[test]
    fn test_anchor_overrides_center() {
        let mut store = GlyphStore::new();
        let wedge = store.insert(Glyph::new(Shape::Crescendo, Rect::new(0.0, 0.0, 100.0, 20.0)));
        let mut entity = ScoreEntity::new(
            EntityId(1),
            EntityKind::Direction(DirectionKind::Wedge),
            MeasureId(0),
            None,
        )
        .with_start(false)
        .with_anchor(Point::new(100.0, 10.0));
        entity.add_glyph(wedge, &store);
        assert!(!entity.is_start());
        assert_eq!(entity.reference_point(&store), Some(Point::new(100.0, 10.0)));
        assert_eq!(entity.center(&store), Some(Point::new(50.0, 10.0)));
    }

    #[test]
    fn test_capabilities() {
        let entity = dynamics();
        assert_eq!(entity.capabilities(), Capabilities::default());
    }
}
