//! Nearest chord, slot and staff lookups
//!
//! None of these queries fails when nothing qualifies: they return `None`
//! and leave the decision to the placement rule.

use crate::geometry::Point;
use crate::score::{BeamId, ChordId, MeasureId, Score, SlotId};

/// Slot whose reference abscissa is closest to the point
pub fn closest_slot(score: &Score, measure: MeasureId, point: Point) -> Option<SlotId> {
    score.measures()[measure]
        .slots()
        .iter()
        .copied()
        .min_by(|a, b| {
            let da = (score.slots()[*a].x() - point.x).abs();
            let db = (score.slots()[*b].x() - point.x).abs();
            da.total_cmp(&db)
        })
}

/// Chord sounding at the point
///
/// Takes the closest slot, then the chords of the staff nearest to the
/// point: the chord right above when the point is below the staff middle
/// line, the chord right below otherwise.
pub fn event_chord(score: &Score, measure: MeasureId, point: Point) -> Option<ChordId> {
    let slot = &score.slots()[closest_slot(score, measure, point)?];
    let part = score.measures()[measure].part();
    let staff = score.part_staff_at(part, point.y)?;
    if score.staves()[staff].mid_y() <= point.y {
        slot.chord_above(score.chords(), point, Some(staff))
    } else {
        slot.chord_below(score.chords(), point, Some(staff))
    }
}

/// Event chord at the point shifted right by `head_shift` pixels
///
/// Glyphs drawn over a note head are anchored on its left side.
pub fn find_chord(
    score: &Score,
    measure: MeasureId,
    point: Point,
    head_shift: f64,
) -> Option<ChordId> {
    event_chord(score, measure, point.shifted_x(head_shift))
}

/// Note chords of the measure whose head lies above the point
pub fn chords_above(score: &Score, measure: MeasureId, point: Point) -> Vec<ChordId> {
    score.measures()[measure]
        .chords()
        .iter()
        .copied()
        .filter(|c| score.chords()[*c].head_location().y < point.y)
        .collect()
}

/// Note chords of the measure whose head lies below the point
pub fn chords_below(score: &Score, measure: MeasureId, point: Point) -> Vec<ChordId> {
    score.measures()[measure]
        .chords()
        .iter()
        .copied()
        .filter(|c| score.chords()[*c].head_location().y > point.y)
        .collect()
}

/// Chord whose head abscissa is closest to the point
pub fn closest_chord(score: &Score, chords: &[ChordId], point: Point) -> Option<ChordId> {
    chords.iter().copied().min_by(|a, b| {
        let da = (score.chords()[*a].head_location().x - point.x).abs();
        let db = (score.chords()[*b].head_location().x - point.x).abs();
        da.total_cmp(&db).then(a.cmp(b))
    })
}

pub fn closest_whole_chord_above(score: &Score, measure: MeasureId, point: Point) -> Option<ChordId> {
    let whole: Vec<ChordId> = score.measures()[measure]
        .whole_chords()
        .iter()
        .copied()
        .filter(|c| score.chords()[*c].head_location().y < point.y)
        .collect();
    closest_chord(score, &whole, point)
}

pub fn closest_whole_chord_below(score: &Score, measure: MeasureId, point: Point) -> Option<ChordId> {
    let whole: Vec<ChordId> = score.measures()[measure]
        .whole_chords()
        .iter()
        .copied()
        .filter(|c| score.chords()[*c].head_location().y > point.y)
        .collect();
    closest_chord(score, &whole, point)
}

/// Closest note chord above, falling back to whole rests
pub fn closest_chord_above(score: &Score, measure: MeasureId, point: Point) -> Option<ChordId> {
    closest_chord(score, &chords_above(score, measure, point), point)
        .or_else(|| closest_whole_chord_above(score, measure, point))
}

/// Closest note chord below, falling back to whole rests
pub fn closest_chord_below(score: &Score, measure: MeasureId, point: Point) -> Option<ChordId> {
    closest_chord(score, &chords_below(score, measure, point), point)
        .or_else(|| closest_whole_chord_below(score, measure, point))
}

/// Chords of the measure whose stem tail lies on the beam line
pub fn beam_chords(score: &Score, beam: BeamId, max_dx: f64, max_dy: f64) -> Vec<ChordId> {
    let beam = &score.beams()[beam];
    let Some((left, right)) = beam.span(score.beam_items()) else {
        return Vec::new();
    };
    let Some(line) = beam.line(score.beam_items()) else {
        return Vec::new();
    };

    let mut chords: Vec<ChordId> = score.measures()[beam.measure()]
        .chords()
        .iter()
        .copied()
        .filter(|c| {
            let chord = &score.chords()[*c];
            if chord.stem().is_none() {
                return false;
            }
            let tail = chord.tail_location();
            tail.x >= left - max_dx
                && tail.x <= right + max_dx
                && (line.y_at(tail.x) - tail.y).abs() <= max_dy
        })
        .collect();
    chords.sort_by(|a, b| {
        score.chords()[*a]
            .tail_location()
            .x
            .total_cmp(&score.chords()[*b].tail_location().x)
    });
    chords
}
