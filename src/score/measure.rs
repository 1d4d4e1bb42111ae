//! Measures: the time-ordered containers of a part within a system

use super::{
    Barline, BeamId, ChordId, Clef, EntityId, KeySignature, MeasureId, PartId, SlotId, StaffId,
    TimeSignature,
};

#[derive(Debug, Clone)]
pub struct Measure {
    id: MeasureId,
    part: PartId,
    left_x: f64,
    right_x: f64,
    barline: Option<Barline>,
    /// Ordered by reference abscissa
    slots: Vec<SlotId>,
    chords: Vec<ChordId>,
    whole_chords: Vec<ChordId>,
    beams: Vec<BeamId>,
    entities: Vec<EntityId>,
    clefs: Vec<Clef>,
    /// At most one per staff
    time_signatures: Vec<TimeSignature>,
    key_signatures: Vec<KeySignature>,
}

impl Measure {
    pub(crate) fn new(id: MeasureId, part: PartId, left_x: f64, right_x: f64) -> Self {
        Self {
            id,
            part,
            left_x,
            right_x,
            barline: None,
            slots: Vec::new(),
            chords: Vec::new(),
            whole_chords: Vec::new(),
            beams: Vec::new(),
            entities: Vec::new(),
            clefs: Vec::new(),
            time_signatures: Vec::new(),
            key_signatures: Vec::new(),
        }
    }

    pub fn id(&self) -> MeasureId {
        self.id
    }

    pub fn part(&self) -> PartId {
        self.part
    }

    pub fn left_x(&self) -> f64 {
        self.left_x
    }

    /// Abscissa of the right barline, as located by the grid
    pub fn right_x(&self) -> f64 {
        self.right_x
    }

    pub fn width(&self) -> f64 {
        self.right_x - self.left_x
    }

    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.left_x && x <= self.right_x
    }

    /// Whether the abscissa lies within the measure widened by `margin`
    pub fn brackets(&self, x: f64, margin: f64) -> bool {
        x >= self.left_x - margin && x <= self.right_x + margin
    }

    pub fn barline(&self) -> Option<&Barline> {
        self.barline.as_ref()
    }

    pub(crate) fn barline_mut(&mut self) -> &mut Barline {
        self.barline.get_or_insert_with(Barline::new)
    }

    pub(crate) fn barline_mut_if_present(&mut self) -> Option<&mut Barline> {
        self.barline.as_mut()
    }

    pub fn slots(&self) -> &[SlotId] {
        &self.slots
    }

    /// Note chords, i.e. every chord but whole rests
    pub fn chords(&self) -> &[ChordId] {
        &self.chords
    }

    pub fn whole_chords(&self) -> &[ChordId] {
        &self.whole_chords
    }

    pub fn beams(&self) -> &[BeamId] {
        &self.beams
    }

    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    pub fn clefs(&self) -> &[Clef] {
        &self.clefs
    }

    pub fn time_signatures(&self) -> &[TimeSignature] {
        &self.time_signatures
    }

    pub fn key_signatures(&self) -> &[KeySignature] {
        &self.key_signatures
    }

    pub(crate) fn time_signature_mut(&mut self, staff: StaffId) -> Option<&mut TimeSignature> {
        self.time_signatures.iter_mut().find(|t| t.staff() == staff)
    }

    pub(crate) fn add_time_signature(&mut self, signature: TimeSignature) {
        self.time_signatures.push(signature);
    }

    pub(crate) fn key_signatures_mut(&mut self) -> &mut Vec<KeySignature> {
        &mut self.key_signatures
    }

    pub(crate) fn slots_mut(&mut self) -> &mut Vec<SlotId> {
        &mut self.slots
    }

    pub(crate) fn add_chord(&mut self, chord: ChordId) {
        self.chords.push(chord);
    }

    pub(crate) fn add_whole_chord(&mut self, chord: ChordId) {
        self.whole_chords.push(chord);
    }

    pub(crate) fn add_beam(&mut self, beam: BeamId) {
        self.beams.push(beam);
    }

    pub(crate) fn add_entity(&mut self, entity: EntityId) {
        self.entities.push(entity);
    }

    pub(crate) fn add_clef(&mut self, clef: Clef) {
        self.clefs.push(clef);
        self.clefs.sort_by(|a, b| a.center.x.total_cmp(&b.center.x));
    }

    pub(crate) fn clear_content(&mut self) {
        self.barline = None;
        self.slots.clear();
        self.chords.clear();
        self.whole_chords.clear();
        self.beams.clear();
        self.entities.clear();
        self.clefs.clear();
        self.time_signatures.clear();
        self.key_signatures.clear();
    }
}
