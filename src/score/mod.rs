//! Score tree: pages, systems, parts, staves, measures and everything
//! assembled inside them
//!
//! Every node lives in a typed [`Arena`] owned by [`Score`] and is addressed
//! by a copyable id. Back-references (glyph translations, chord links) are
//! plain ids, so no node owns another through a shared pointer.

pub mod barline;
pub mod beam;
pub mod chord;
pub mod clef;
pub mod entity;
pub mod key;
pub mod lyrics;
pub mod measure;
pub mod slot;
pub mod slur;
pub mod staff;
pub mod time;

pub use barline::Barline;
pub use beam::{Beam, BeamItem};
pub use chord::{Chord, Note};
pub use clef::{Clef, Step};
pub use entity::{Capabilities, DirectionKind, EntityKind, NotationKind, ScoreEntity};
pub use key::KeySignature;
pub use lyrics::{LyricsItem, LyricsKind, LyricsLine, Syllabic};
pub use measure::Measure;
pub use slot::Slot;
pub use slur::{Slur, SlurEnd};
pub use staff::Staff;
pub use time::{TimeRational, TimeSignature, TimeSignatureError};

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use crate::diagnostics::Diagnostics;
use crate::error::{Result, ScoreError};
use crate::geometry::Point;
use crate::glyph::{GlyphId, GlyphStore, Scale, Shape, Translation};
use crate::tables::SignatureTables;

/// Identifier usable as an arena index
pub trait ArenaId: Copy {
    fn from_index(index: usize) -> Self;
    fn index(self) -> usize;
}

macro_rules! ids {
    ($($name:ident => $prefix:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $name(pub usize);

            impl ArenaId for $name {
                fn from_index(index: usize) -> Self {
                    Self(index)
                }

                fn index(self) -> usize {
                    self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, concat!($prefix, "#{}"), self.0)
                }
            }
        )*
    };
}

ids! {
    PageId => "Pg",
    SystemId => "S",
    PartId => "P",
    StaffId => "St",
    MeasureId => "M",
    SlotId => "Sl",
    ChordId => "C",
    EntityId => "E",
    BeamId => "B",
    BeamItemId => "BI",
    LyricsLineId => "LL",
    LyricsItemId => "LI",
    SlurId => "SL",
}

/// Vector of nodes indexed by a typed id
#[derive(Debug, Clone)]
pub struct Arena<I, T> {
    items: Vec<T>,
    _id: PhantomData<I>,
}

impl<I: ArenaId, T> Arena<I, T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            _id: PhantomData,
        }
    }

    /// Insert a node built from its future id
    pub fn push_with(&mut self, build: impl FnOnce(I) -> T) -> I {
        let id = I::from_index(self.items.len());
        self.items.push(build(id));
        id
    }

    pub fn get(&self, id: I) -> Option<&T> {
        self.items.get(id.index())
    }

    pub fn get_mut(&mut self, id: I) -> Option<&mut T> {
        self.items.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = I> {
        (0..self.items.len()).map(I::from_index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        &self.items[id.index()]
    }
}

impl<I: ArenaId, T> IndexMut<I> for Arena<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        &mut self.items[id.index()]
    }
}

/// One scanned page
#[derive(Debug, Clone)]
pub struct Page {
    pub id: PageId,
    pub scale: Scale,
    pub systems: Vec<SystemId>,
}

/// A system: parts played together, across the page width
#[derive(Debug, Clone)]
pub struct ScoreSystem {
    pub id: SystemId,
    pub page: PageId,
    pub parts: Vec<PartId>,
}

/// The staves of one instrument within a system
#[derive(Debug, Clone)]
pub struct SystemPart {
    pub id: PartId,
    pub system: SystemId,
    /// Logical part number, stable from one system to the next
    pub number: usize,
    pub staves: Vec<StaffId>,
    pub measures: Vec<MeasureId>,
    pub lyrics_lines: Vec<LyricsLineId>,
    pub slurs: Vec<SlurId>,
}

/// The whole score tree, plus the glyphs it was assembled from
#[derive(Debug, Default)]
pub struct Score {
    pub glyphs: GlyphStore,
    pub diagnostics: Diagnostics,
    pub(crate) pages: Arena<PageId, Page>,
    pub(crate) systems: Arena<SystemId, ScoreSystem>,
    pub(crate) parts: Arena<PartId, SystemPart>,
    pub(crate) staves: Arena<StaffId, Staff>,
    pub(crate) measures: Arena<MeasureId, Measure>,
    pub(crate) slots: Arena<SlotId, Slot>,
    pub(crate) chords: Arena<ChordId, Chord>,
    pub(crate) entities: Arena<EntityId, ScoreEntity>,
    pub(crate) beams: Arena<BeamId, Beam>,
    pub(crate) beam_items: Arena<BeamItemId, BeamItem>,
    pub(crate) lyrics_lines: Arena<LyricsLineId, LyricsLine>,
    pub(crate) lyrics_items: Arena<LyricsItemId, LyricsItem>,
    pub(crate) slurs: Arena<SlurId, Slur>,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Building the grid ─────────────────────────────────────────

    pub fn add_page(&mut self, scale: Scale) -> PageId {
        self.pages.push_with(|id| Page {
            id,
            scale,
            systems: Vec::new(),
        })
    }

    /// Append a system; systems are ordered by creation across pages
    pub fn add_system(&mut self, page: PageId) -> SystemId {
        let id = self.systems.push_with(|id| ScoreSystem {
            id,
            page,
            parts: Vec::new(),
        });
        self.pages[page].systems.push(id);
        id
    }

    pub fn add_part(&mut self, system: SystemId) -> PartId {
        let number = self.systems[system].parts.len() + 1;
        let id = self.parts.push_with(|id| SystemPart {
            id,
            system,
            number,
            staves: Vec::new(),
            measures: Vec::new(),
            lyrics_lines: Vec::new(),
            slurs: Vec::new(),
        });
        self.systems[system].parts.push(id);
        id
    }

    /// Append a staff given its left abscissa, top line ordinate and width
    pub fn add_staff(&mut self, part: PartId, left: f64, top: f64, width: f64) -> StaffId {
        let interline = self.part_scale(part).interline();
        let index = self.parts[part].staves.len() + 1;
        let id = self
            .staves
            .push_with(|id| Staff::new(id, part, index, left, top, width, interline));
        self.parts[part].staves.push(id);
        id
    }

    /// Append a measure spanning `[left_x, right_x]`
    pub fn add_measure(&mut self, part: PartId, left_x: f64, right_x: f64) -> MeasureId {
        let id = self
            .measures
            .push_with(|id| Measure::new(id, part, left_x, right_x));
        let measures = &mut self.parts[part].measures;
        measures.push(id);
        let arena = &self.measures;
        measures.sort_by(|a, b| arena[*a].left_x().total_cmp(&arena[*b].left_x()));
        id
    }

    // ── Arena access ──────────────────────────────────────────────

    pub fn pages(&self) -> &Arena<PageId, Page> {
        &self.pages
    }

    pub fn systems(&self) -> &Arena<SystemId, ScoreSystem> {
        &self.systems
    }

    pub fn parts(&self) -> &Arena<PartId, SystemPart> {
        &self.parts
    }

    pub fn staves(&self) -> &Arena<StaffId, Staff> {
        &self.staves
    }

    pub fn measures(&self) -> &Arena<MeasureId, Measure> {
        &self.measures
    }

    pub fn slots(&self) -> &Arena<SlotId, Slot> {
        &self.slots
    }

    pub fn chords(&self) -> &Arena<ChordId, Chord> {
        &self.chords
    }

    pub fn entities(&self) -> &Arena<EntityId, ScoreEntity> {
        &self.entities
    }

    pub fn beams(&self) -> &Arena<BeamId, Beam> {
        &self.beams
    }

    pub fn beam_items(&self) -> &Arena<BeamItemId, BeamItem> {
        &self.beam_items
    }

    pub fn lyrics_lines(&self) -> &Arena<LyricsLineId, LyricsLine> {
        &self.lyrics_lines
    }

    pub fn lyrics_items(&self) -> &Arena<LyricsItemId, LyricsItem> {
        &self.lyrics_items
    }

    pub fn slurs(&self) -> &Arena<SlurId, Slur> {
        &self.slurs
    }

    // ── Navigation ────────────────────────────────────────────────

    pub fn system_scale(&self, system: SystemId) -> Scale {
        self.pages[self.systems[system].page].scale
    }

    pub fn part_scale(&self, part: PartId) -> Scale {
        self.system_scale(self.parts[part].system)
    }

    pub fn measure_scale(&self, measure: MeasureId) -> Scale {
        self.part_scale(self.measures[measure].part())
    }

    /// Staff of the system whose middle line is closest to the ordinate
    pub fn staff_at(&self, system: SystemId, y: f64) -> Option<StaffId> {
        self.systems[system]
            .parts
            .iter()
            .flat_map(|p| self.parts[*p].staves.iter().copied())
            .min_by(|a, b| {
                let da = self.staves[*a].vertical_distance(y);
                let db = self.staves[*b].vertical_distance(y);
                da.total_cmp(&db)
            })
    }

    /// Staff of the part whose middle line is closest to the ordinate
    pub fn part_staff_at(&self, part: PartId, y: f64) -> Option<StaffId> {
        self.parts[part].staves.iter().copied().min_by(|a, b| {
            let da = self.staves[*a].vertical_distance(y);
            let db = self.staves[*b].vertical_distance(y);
            da.total_cmp(&db)
        })
    }

    /// Measure of the part whose abscissa range contains `x`
    pub fn measure_at(&self, part: PartId, x: f64) -> Option<MeasureId> {
        self.parts[part]
            .measures
            .iter()
            .copied()
            .find(|m| self.measures[*m].contains_x(x))
    }

    pub fn preceding_system(&self, system: SystemId) -> Option<SystemId> {
        system.0.checked_sub(1).map(SystemId)
    }

    pub fn following_system(&self, system: SystemId) -> Option<SystemId> {
        let next = SystemId(system.0 + 1);
        self.systems.get(next).map(|s| s.id)
    }

    /// Part with the same logical number in another system
    pub fn corresponding_part(&self, part: PartId, system: SystemId) -> Option<PartId> {
        let number = self.parts[part].number;
        self.systems[system]
            .parts
            .iter()
            .copied()
            .find(|p| self.parts[*p].number == number)
    }

    /// Previous measure of the same logical part, possibly in a previous system
    pub fn preceding_measure(&self, measure: MeasureId) -> Option<MeasureId> {
        let part = self.measures[measure].part();
        let measures = &self.parts[part].measures;
        let pos = measures.iter().position(|m| *m == measure)?;
        if pos > 0 {
            return Some(measures[pos - 1]);
        }
        let mut system = self.parts[part].system;
        while let Some(prev) = self.preceding_system(system) {
            if let Some(prev_part) = self.corresponding_part(part, prev) {
                if let Some(last) = self.parts[prev_part].measures.last() {
                    return Some(*last);
                }
            }
            system = prev;
        }
        None
    }

    /// Next measure of the same logical part, possibly in a following system
    pub fn following_measure(&self, measure: MeasureId) -> Option<MeasureId> {
        let part = self.measures[measure].part();
        let measures = &self.parts[part].measures;
        let pos = measures.iter().position(|m| *m == measure)?;
        if let Some(next) = measures.get(pos + 1) {
            return Some(*next);
        }
        let mut system = self.parts[part].system;
        while let Some(next) = self.following_system(system) {
            if let Some(next_part) = self.corresponding_part(part, next) {
                if let Some(first) = self.parts[next_part].measures.first() {
                    return Some(*first);
                }
            }
            system = next;
        }
        None
    }

    /// Last clef of the same staff at or before the point, looking back
    /// through preceding measures and systems
    pub fn clef_before(&self, measure: MeasureId, point: Point, staff: StaffId) -> Option<&Clef> {
        let index = self.staves[staff].index();
        let same_staff = |clef: &&Clef| self.staves[clef.staff].index() == index;
        if let Some(clef) = self.measures[measure]
            .clefs()
            .iter()
            .rev()
            .filter(same_staff)
            .find(|c| c.center.x <= point.x)
        {
            return Some(clef);
        }
        let mut current = measure;
        while let Some(prev) = self.preceding_measure(current) {
            if let Some(clef) = self.measures[prev].clefs().iter().rev().find(same_staff) {
                return Some(clef);
            }
            current = prev;
        }
        None
    }

    /// Step and octave of a note, given the clef in effect
    pub fn note_pitch(&self, chord: ChordId, note: &Note) -> Option<(Step, i32)> {
        let clef = self.clef_before(self.chords[chord].measure(), note.center, note.staff)?;
        let position = note.pitch_position.round() as i32;
        Some((clef.step_of(position), clef.octave_of(position)))
    }

    /// Time signature in effect in a measure: its own, or the last one of
    /// the preceding measures, possibly in previous systems
    pub fn current_time_signature(&self, measure: MeasureId) -> Option<(MeasureId, &TimeSignature)> {
        let mut current = Some(measure);
        while let Some(m) = current {
            if let Some(sig) = self.measures[m].time_signatures().first() {
                return Some((m, sig));
            }
            current = self.preceding_measure(m);
        }
        None
    }

    /// Duration a measure should last, in divisions, 4/4 when no time
    /// signature is in effect
    pub fn expected_duration(
        &self,
        measure: MeasureId,
        tables: &SignatureTables,
    ) -> std::result::Result<u32, TimeSignatureError> {
        let rational = match self.current_time_signature(measure) {
            Some((_, sig)) => sig.rational(&self.glyphs, &self.staves[sig.staff()], tables)?,
            None => TimeRational::default(),
        };
        Ok(rational.duration())
    }

    /// Key signature in effect on a staff at a point, looking back through
    /// preceding measures and systems
    pub fn key_before(&self, measure: MeasureId, point: Point, staff: StaffId) -> Option<&KeySignature> {
        let index = self.staves[staff].index();
        let same_staff = |key: &&KeySignature| self.staves[key.staff()].index() == index;
        let before = |key: &&KeySignature| {
            key.center(&self.glyphs)
                .is_some_and(|c| c.x <= point.x)
        };
        if let Some(key) = self.measures[measure]
            .key_signatures()
            .iter()
            .rev()
            .filter(same_staff)
            .find(before)
        {
            return Some(key);
        }
        let mut current = measure;
        while let Some(prev) = self.preceding_measure(current) {
            if let Some(key) = self.measures[prev].key_signatures().iter().rev().find(same_staff) {
                return Some(key);
            }
            current = prev;
        }
        None
    }

    /// Override the decoded shape of the barline closing a measure
    pub fn force_barline_shape(&mut self, measure: MeasureId, shape: Shape) -> Result<()> {
        match self.measures[measure].barline_mut_if_present() {
            Some(barline) => {
                barline.force_shape(shape);
                Ok(())
            }
            None => Err(ScoreError::illegal_state(measure, "no barline to force")),
        }
    }

    /// Reference point of whatever a translation designates
    pub fn translation_point(&self, translation: Translation) -> Option<Point> {
        match translation {
            Translation::Chord(chord) => Some(self.chords[chord].head_location()),
            Translation::Entity(entity) => self.entities[entity].reference_point(&self.glyphs),
            Translation::BeamItem(item) => Some(self.beam_items[item].center()),
            Translation::Barline(measure) => self.measures[measure]
                .barline()
                .and_then(|b| b.bounds(&self.glyphs))
                .map(|r| r.center()),
            Translation::Lyrics(item) => Some(self.lyrics_items[item].bounds().center()),
            Translation::TimeSignature(measure, staff) => self.measures[measure]
                .time_signatures()
                .iter()
                .find(|t| t.staff() == staff)
                .and_then(|t| t.center(&self.glyphs)),
            Translation::KeySignature(measure, staff) => self.measures[measure]
                .key_signatures()
                .iter()
                .find(|k| k.staff() == staff)
                .and_then(|k| k.center(&self.glyphs)),
            Translation::Slur(slur) => Some(self.slurs[slur].midpoint()),
        }
    }

    /// Lines from a glyph center to each entity it translated into
    pub fn translation_links(&self, glyph: GlyphId) -> Vec<(Point, Point)> {
        let Some(g) = self.glyphs.get(glyph) else {
            return Vec::new();
        };
        let from = g.location();
        g.translations()
            .iter()
            .filter_map(|t| self.translation_point(*t))
            .map(|to| (from, to))
            .collect()
    }

    /// Drop every assembled entity and glyph translation, keeping the grid
    pub fn clear_assembly(&mut self) {
        for glyph in self.glyphs.iter_mut() {
            glyph.clear_translations();
        }
        for measure in self.measures.items.iter_mut() {
            measure.clear_content();
        }
        for part in self.parts.items.iter_mut() {
            part.lyrics_lines.clear();
            part.slurs.clear();
        }
        self.slots.clear();
        self.chords.clear();
        self.entities.clear();
        self.beams.clear();
        self.beam_items.clear();
        self.lyrics_lines.clear();
        self.lyrics_items.clear();
        self.slurs.clear();
        self.diagnostics.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_systems() -> (Score, Vec<MeasureId>) {
        let mut score = Score::new();
        let page = score.add_page(Scale::new(20.0));
        let mut measures = Vec::new();
        for _ in 0..2 {
            let system = score.add_system(page);
            let part = score.add_part(system);
            score.add_staff(part, 0.0, 100.0, 400.0);
            measures.push(score.add_measure(part, 200.0, 400.0));
            measures.push(score.add_measure(part, 0.0, 200.0));
        }
        (score, measures)
    }

    #[test]
    fn test_ids_display() {
        assert_eq!(ChordId(3).to_string(), "C#3");
        assert_eq!(LyricsItemId(0).to_string(), "LI#0");
    }

    #[test]
    fn test_measures_sorted_by_abscissa() {
        let (score, m) = two_systems();
        let part = score.measures()[m[0]].part();
        assert_eq!(score.parts()[part].measures, vec![m[1], m[0]]);
        assert_eq!(score.measure_at(part, 250.0), Some(m[0]));
        assert_eq!(score.measure_at(part, 450.0), None);
    }

    #[test]
    fn test_measure_chain_across_systems() {
        let (score, m) = two_systems();
        // second system: m[3] at left, m[2] at right
        assert_eq!(score.following_measure(m[1]), Some(m[0]));
        assert_eq!(score.following_measure(m[0]), Some(m[3]));
        assert_eq!(score.preceding_measure(m[3]), Some(m[0]));
        assert_eq!(score.preceding_measure(m[1]), None);
        assert_eq!(score.following_measure(m[2]), None);
    }

    #[test]
    fn test_staff_at() {
        let mut score = Score::new();
        let page = score.add_page(Scale::new(20.0));
        let system = score.add_system(page);
        let part = score.add_part(system);
        let upper = score.add_staff(part, 0.0, 100.0, 400.0);
        let lower = score.add_staff(part, 0.0, 300.0, 400.0);
        assert_eq!(score.staff_at(system, 90.0), Some(upper));
        assert_eq!(score.staff_at(system, 260.0), Some(lower));
        assert_eq!(score.part_staff_at(part, 199.0), Some(upper));
    }
}
