//! Beams and the decomposition of beam pack glyphs
//!
//! A beam glyph may hold up to three parallel strokes stuck together. Each
//! stroke becomes a [`BeamItem`], and items lined up end to end across
//! several glyphs make a [`Beam`].

use crate::geometry::{Line, LineFit, Point, Rect};
use crate::glyph::GlyphId;

use super::{Arena, BeamId, BeamItemId, ChordId, MeasureId};

/// One stroke of a beam pack
#[derive(Debug, Clone, PartialEq)]
pub struct BeamItem {
    id: BeamItemId,
    glyph: GlyphId,
    beam: BeamId,
    measure: MeasureId,
    left: Point,
    right: Point,
    pack_card: usize,
    pack_index: usize,
}

impl BeamItem {
    pub(crate) fn new(
        id: BeamItemId,
        glyph: GlyphId,
        beam: BeamId,
        measure: MeasureId,
        (left, right): (Point, Point),
        pack_card: usize,
        pack_index: usize,
    ) -> Self {
        Self {
            id,
            glyph,
            beam,
            measure,
            left,
            right,
            pack_card,
            pack_index,
        }
    }

    pub fn id(&self) -> BeamItemId {
        self.id
    }

    pub fn glyph(&self) -> GlyphId {
        self.glyph
    }

    pub fn beam(&self) -> BeamId {
        self.beam
    }

    pub fn measure(&self) -> MeasureId {
        self.measure
    }

    pub fn left(&self) -> Point {
        self.left
    }

    pub fn right(&self) -> Point {
        self.right
    }

    /// Number of strokes in the pack this item comes from
    pub fn pack_card(&self) -> usize {
        self.pack_card
    }

    /// 0-based index in the pack, from the top
    pub fn pack_index(&self) -> usize {
        self.pack_index
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left.x + self.right.x) / 2.0,
            (self.left.y + self.right.y) / 2.0,
        )
    }

    /// Whether the segment `left`..`right` continues this item on either side
    pub fn is_adjacent(&self, left: Point, right: Point, max_dx: f64, max_dy: f64) -> bool {
        let near = |a: Point, b: Point| (a.x - b.x).abs() <= max_dx && (a.y - b.y).abs() <= max_dy;
        near(self.right, left) || near(right, self.left)
    }
}

/// A logical beam: items joined end to end
#[derive(Debug, Clone, PartialEq)]
pub struct Beam {
    id: BeamId,
    measure: MeasureId,
    /// Ordered by left abscissa
    items: Vec<BeamItemId>,
    chords: Vec<ChordId>,
}

impl Beam {
    pub(crate) fn new(id: BeamId, measure: MeasureId) -> Self {
        Self {
            id,
            measure,
            items: Vec::new(),
            chords: Vec::new(),
        }
    }

    pub fn id(&self) -> BeamId {
        self.id
    }

    pub fn measure(&self) -> MeasureId {
        self.measure
    }

    pub fn items(&self) -> &[BeamItemId] {
        &self.items
    }

    /// Chords whose stem ends on this beam
    pub fn chords(&self) -> &[ChordId] {
        &self.chords
    }

    pub(crate) fn add_item(&mut self, item: BeamItemId, arena: &Arena<BeamItemId, BeamItem>) {
        if !self.items.contains(&item) {
            self.items.push(item);
        }
        self.items
            .sort_by(|a, b| arena[*a].left().x.total_cmp(&arena[*b].left().x).then(a.cmp(b)));
    }

    pub(crate) fn set_chords(&mut self, chords: Vec<ChordId>) {
        self.chords = chords;
    }

    /// Leftmost and rightmost abscissae
    pub fn span(&self, arena: &Arena<BeamItemId, BeamItem>) -> Option<(f64, f64)> {
        let left = self.items.iter().map(|i| arena[*i].left().x).reduce(f64::min)?;
        let right = self.items.iter().map(|i| arena[*i].right().x).reduce(f64::max)?;
        Some((left, right))
    }

    /// Least-squares line through every item endpoint
    pub fn line(&self, arena: &Arena<BeamItemId, BeamItem>) -> Option<Line> {
        let mut fit = LineFit::new();
        for item in self.items.iter().map(|i| &arena[*i]) {
            fit.include(item.left());
            fit.include(item.right());
        }
        fit.line()
    }
}

/// Endpoints of each stroke of a beam pack glyph, top stroke first
///
/// Packs with a realistic slope are split along their fitted line, the
/// pack hugging the box bottom on its low side and the box top on its
/// high side. Hooks and steep packs are cut into equal horizontal strips.
pub fn pack_endpoints(
    card: usize,
    hook: bool,
    bounds: Rect,
    line: Line,
    max_slope: f64,
) -> Vec<(Point, Point)> {
    let (left, right) = (bounds.x, bounds.right());
    let (top, bottom) = (bounds.y, bounds.bottom());
    if card == 0 {
        return Vec::new();
    }

    if hook || line.slope.abs() > max_slope {
        let strip = bounds.height / card as f64;
        return (0..card)
            .map(|i| {
                let y = top + (i as f64 + 0.5) * strip;
                (Point::new(left, y), Point::new(right, y))
            })
            .collect();
    }

    let y_left = line.y_at(left);
    let y_right = line.y_at(right);
    let clearance = |y: f64| (y - top).min(bottom - y);
    let delta_mid = (clearance(y_left) + clearance(y_right)) / 2.0;
    let pack_top_low = bottom - 2.0 * delta_mid;
    let ascending = y_left > y_right;

    (0..card)
        .map(|i| {
            let delta_y = (4 * i + 1) as f64 * delta_mid / (2 * card - 1) as f64;
            let (yl, yr) = if ascending {
                (pack_top_low + delta_y, top + delta_y)
            } else {
                (top + delta_y, pack_top_low + delta_y)
            };
            (Point::new(left, yl), Point::new(right, yr))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_pack_of_three() {
        // 5 units of 4px: stroke, gap, stroke, gap, stroke
        let bounds = Rect::new(100.0, 200.0, 60.0, 20.0);
        let line = Line::through(bounds.center(), 0.0);
        let items = pack_endpoints(3, false, bounds, line, 1.0);
        let ys: Vec<f64> = items.iter().map(|(l, _)| l.y).collect();
        assert_eq!(ys, vec![202.0, 210.0, 218.0]);
        assert!(items.iter().all(|(l, r)| l.y == r.y && l.x == 100.0 && r.x == 160.0));
    }

    #[test]
    fn test_ascending_pack_hugs_opposite_corners() {
        // pack 12px high, rising 20px over the box width
        let bounds = Rect::new(0.0, 100.0, 40.0, 32.0);
        let line = Line::new(-0.5, 126.0);
        let items = pack_endpoints(2, false, bounds, line, 1.0);
        assert_eq!(items.len(), 2);
        let (l0, r0) = items[0];
        let (l1, r1) = items[1];
        assert_eq!((l0.y, r0.y), (122.0, 102.0));
        assert_eq!((l1.y, r1.y), (130.0, 110.0));
    }

    #[test]
    fn test_descending_pack() {
        let bounds = Rect::new(0.0, 100.0, 40.0, 32.0);
        let line = Line::new(0.5, 106.0);
        let items = pack_endpoints(2, false, bounds, line, 1.0);
        let (l0, r0) = items[0];
        assert_eq!((l0.y, r0.y), (102.0, 122.0));
    }

    #[test]
    fn test_steep_pack_uses_strips() {
        let bounds = Rect::new(0.0, 0.0, 10.0, 30.0);
        let line = Line::new(3.0, 0.0);
        let items = pack_endpoints(3, false, bounds, line, 1.0);
        let ys: Vec<f64> = items.iter().map(|(l, _)| l.y).collect();
        assert_eq!(ys, vec![5.0, 15.0, 25.0]);
    }

    #[test]
    fn test_hook_is_its_midline() {
        let bounds = Rect::new(0.0, 10.0, 12.0, 6.0);
        let items = pack_endpoints(1, true, bounds, Line::new(0.3, 10.0), 1.0);
        assert_eq!(items, vec![(Point::new(0.0, 13.0), Point::new(12.0, 13.0))]);
    }
}
