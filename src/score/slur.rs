//! Slurs and ties, possibly continued from one system to the next

use crate::geometry::Point;
use crate::glyph::GlyphId;

use super::{ChordId, PartId, SlurId};

/// Note a slur end is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlurEnd {
    pub chord: ChordId,
    /// Index of the note within its chord
    pub note: usize,
}

/// A slur glyph with the notes it embraces
///
/// A slur may leave its system on one side. Such an orphan side is then
/// linked to the matching orphan of the neighbouring system.
#[derive(Debug, Clone, PartialEq)]
pub struct Slur {
    id: SlurId,
    part: PartId,
    glyph: GlyphId,
    /// Left end point
    p1: Point,
    /// Right end point
    p2: Point,
    below: bool,
    left: Option<SlurEnd>,
    right: Option<SlurEnd>,
    left_orphan: bool,
    right_orphan: bool,
    left_extension: Option<SlurId>,
    right_extension: Option<SlurId>,
    tie: bool,
}

impl Slur {
    pub(crate) fn new(
        id: SlurId,
        part: PartId,
        glyph: GlyphId,
        (p1, p2): (Point, Point),
        below: bool,
        (left, right): (Option<SlurEnd>, Option<SlurEnd>),
        (left_orphan, right_orphan): (bool, bool),
    ) -> Self {
        Self {
            id,
            part,
            glyph,
            p1,
            p2,
            below,
            left,
            right,
            left_orphan,
            right_orphan,
            left_extension: None,
            right_extension: None,
            tie: false,
        }
    }

    pub fn id(&self) -> SlurId {
        self.id
    }

    pub fn part(&self) -> PartId {
        self.part
    }

    pub fn glyph(&self) -> GlyphId {
        self.glyph
    }

    pub fn p1(&self) -> Point {
        self.p1
    }

    pub fn p2(&self) -> Point {
        self.p2
    }

    /// Whether the slur lies below the notes it embraces
    pub fn is_below(&self) -> bool {
        self.below
    }

    pub fn left(&self) -> Option<SlurEnd> {
        self.left
    }

    pub fn right(&self) -> Option<SlurEnd> {
        self.right
    }

    /// No left note, starting in the first measure of its system
    pub fn is_left_orphan(&self) -> bool {
        self.left_orphan
    }

    /// No right note, ending in the last measure of its system
    pub fn is_right_orphan(&self) -> bool {
        self.right_orphan
    }

    pub fn left_extension(&self) -> Option<SlurId> {
        self.left_extension
    }

    pub fn right_extension(&self) -> Option<SlurId> {
        self.right_extension
    }

    pub fn is_tie(&self) -> bool {
        self.tie
    }

    pub fn midpoint(&self) -> Point {
        Point::new((self.p1.x + self.p2.x) / 2.0, (self.p1.y + self.p2.y) / 2.0)
    }

    pub(crate) fn set_left_extension(&mut self, slur: SlurId) {
        self.left_extension = Some(slur);
    }

    pub(crate) fn set_right_extension(&mut self, slur: SlurId) {
        self.right_extension = Some(slur);
    }

    pub(crate) fn set_tie(&mut self, tie: bool) {
        self.tie = tie;
    }
}
