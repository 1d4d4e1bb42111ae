//! Glyphs handed over by the classifier
//!
//! A glyph is a classified pixel blob: a shape, a bounding box and a fitted
//! line. Assembly turns glyphs into score entities and records, on each
//! glyph, which entities it translated into.

pub mod scale;
pub mod shape;

pub use scale::{Fraction, Scale};
pub use shape::{Shape, ShapeFamily, UnknownShape};

use std::fmt;

use crate::geometry::{Line, Point, Rect};
use crate::score::{
    BeamItemId, ChordId, EntityId, LyricsItemId, MeasureId, SlurId, StaffId,
};

/// Identifier of a glyph within a [`GlyphStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphId(pub usize);

impl fmt::Display for GlyphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G#{}", self.0)
    }
}

/// Who assigned the current shape of a glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeSource {
    #[default]
    Classifier,
    Assembly,
    Manual,
}

/// Non-owning link from a glyph to a logical entity it produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Translation {
    Chord(ChordId),
    Entity(EntityId),
    BeamItem(BeamItemId),
    Barline(MeasureId),
    Lyrics(LyricsItemId),
    TimeSignature(MeasureId, StaffId),
    KeySignature(MeasureId, StaffId),
    Slur(SlurId),
}

/// A classified glyph
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    id: GlyphId,
    shape: Option<Shape>,
    shape_source: ShapeSource,
    bounds: Rect,
    line: Line,
    weight: u32,
    vip: bool,
    stem: Option<GlyphId>,
    text: Option<String>,
    /// End points of a curve glyph
    ends: Option<(Point, Point)>,
    translations: Vec<Translation>,
}

impl Glyph {
    /// Create a glyph whose fitted line is horizontal through the box center
    pub fn new(shape: Shape, bounds: Rect) -> Self {
        Self {
            id: GlyphId(0),
            shape: Some(shape),
            shape_source: ShapeSource::Classifier,
            bounds,
            line: Line::through(bounds.center(), 0.0),
            weight: (bounds.width * bounds.height).round().max(0.0) as u32,
            vip: false,
            stem: None,
            text: None,
            ends: None,
            translations: Vec::new(),
        }
    }

    /// Set the fitted line slope, keeping the line through the box center
    pub fn with_slope(mut self, slope: f64) -> Self {
        self.line = Line::through(self.bounds.center(), slope);
        self
    }

    pub fn with_line(mut self, line: Line) -> Self {
        self.line = line;
        self
    }

    pub fn with_stem(mut self, stem: GlyphId) -> Self {
        self.stem = Some(stem);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_ends(mut self, first: Point, second: Point) -> Self {
        self.ends = Some((first, second));
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_vip(mut self, vip: bool) -> Self {
        self.vip = vip;
        self
    }

    pub fn id(&self) -> GlyphId {
        self.id
    }

    pub fn shape(&self) -> Option<Shape> {
        self.shape
    }

    pub fn shape_source(&self) -> ShapeSource {
        self.shape_source
    }

    /// Assign (or clear, with `None`) the glyph shape
    pub fn set_shape(&mut self, shape: Option<Shape>, source: ShapeSource) {
        self.shape = shape;
        self.shape_source = source;
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn line(&self) -> Line {
        self.line
    }

    /// Reference location: the bounding box center
    pub fn location(&self) -> Point {
        self.bounds.center()
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn is_vip(&self) -> bool {
        self.vip
    }

    pub fn stem(&self) -> Option<GlyphId> {
        self.stem
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Left then right end points of a curve, the bottom corners of the box
    /// when none were given
    pub fn ends(&self) -> (Point, Point) {
        let (a, b) = self.ends.unwrap_or((
            Point::new(self.bounds.x, self.bounds.bottom()),
            Point::new(self.bounds.right(), self.bounds.bottom()),
        ));
        if a.x <= b.x {
            (a, b)
        } else {
            (b, a)
        }
    }

    pub fn translations(&self) -> &[Translation] {
        &self.translations
    }

    pub fn is_translated(&self) -> bool {
        !self.translations.is_empty()
    }

    /// Replace all translations with a single one
    pub fn set_translation(&mut self, translation: Translation) {
        self.translations.clear();
        self.translations.push(translation);
    }

    pub fn add_translation(&mut self, translation: Translation) {
        if !self.translations.contains(&translation) {
            self.translations.push(translation);
        }
    }

    pub fn clear_translations(&mut self) {
        self.translations.clear();
    }
}

/// Arena of the glyphs of a score
#[derive(Debug, Clone, Default)]
pub struct GlyphStore {
    glyphs: Vec<Glyph>,
}

impl GlyphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a glyph, assigning its id
    pub fn insert(&mut self, mut glyph: Glyph) -> GlyphId {
        let id = GlyphId(self.glyphs.len());
        glyph.id = id;
        self.glyphs.push(glyph);
        id
    }

    pub fn get(&self, id: GlyphId) -> Option<&Glyph> {
        self.glyphs.get(id.0)
    }

    pub fn get_mut(&mut self, id: GlyphId) -> Option<&mut Glyph> {
        self.glyphs.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Glyph> {
        self.glyphs.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}
