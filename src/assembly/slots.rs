//! Time slots and chords built from note heads and rests

use crate::config::{SlotConfig, SlotPolicy};
use crate::error::{Result, ScoreError};
use crate::geometry::Point;
use crate::glyph::{GlyphId, Translation};
use crate::score::chord::Stem;
use crate::score::{Chord, ChordId, MeasureId, Note, Score, Slot, SlotId, StaffId};

/// Turn a note head or rest glyph into a note of some chord
pub fn populate_note(
    config: &SlotConfig,
    score: &mut Score,
    measure: MeasureId,
    staff: StaffId,
    glyph: GlyphId,
) -> Result<ChordId> {
    let g = score.glyphs.get(glyph).ok_or(ScoreError::UnknownGlyph(glyph))?;
    let shape = g.shape().ok_or(ScoreError::MissingShape(glyph))?;
    let center = g.location();
    let stem = g.stem().and_then(|s| score.glyphs.get(s)).map(|s| Stem {
        glyph: s.id(),
        bounds: s.bounds(),
    });
    let note = Note {
        glyph,
        center,
        staff,
        pitch_position: score.staves()[staff].pitch_position_of(center.y),
    };

    let chord = if shape.is_whole_rest() {
        let chord = score
            .chords
            .push_with(|id| Chord::new_whole(id, measure, staff));
        score.measures[measure].add_whole_chord(chord);
        chord
    } else {
        let existing = stem.and_then(|stem| {
            score.measures()[measure]
                .chords()
                .iter()
                .copied()
                .find(|c| score.chords()[*c].stem().map(|s| s.glyph) == Some(stem.glyph))
        });
        match existing {
            Some(chord) => chord,
            None => {
                let slot = slot_for(config, score, measure, center, stem);
                let chord = score
                    .chords
                    .push_with(|id| Chord::new(id, measure, staff, Some(slot), stem));
                score.measures[measure].add_chord(chord);
                score.slots[slot].add_chord(chord);
                chord
            }
        }
    };

    score.chords[chord].add_note(note);
    if let Some(slot) = score.chords()[chord].slot() {
        score.slots[slot].add_glyph(glyph, center);
        score.slots[slot].sort_chords(&score.chords);
        sort_slots(score, measure);
    }
    if let Some(g) = score.glyphs.get_mut(glyph) {
        g.set_translation(Translation::Chord(chord));
    }
    log::debug!("{} {} joined chord {}", shape, glyph, chord);
    Ok(chord)
}

/// First slot aligned with the glyph, or a new one
fn slot_for(
    config: &SlotConfig,
    score: &mut Score,
    measure: MeasureId,
    center: Point,
    stem: Option<Stem>,
) -> SlotId {
    let stem_location = match config.policy {
        SlotPolicy::Stem => stem.map(|s| s.bounds.center()),
        SlotPolicy::Head => None,
    };
    let anchor = stem_location.unwrap_or(center);
    let max_dx = score.measure_scale(measure).to_pixels(config.max_dx);

    let aligned = score.measures()[measure]
        .slots()
        .iter()
        .copied()
        .find(|s| score.slots()[*s].is_aligned_with(anchor, max_dx));
    if let Some(slot) = aligned {
        return slot;
    }

    let slot = score.slots.push_with(|id| match stem_location {
        Some(location) => Slot::with_stem(id, measure, location),
        None => Slot::with_heads(id, measure),
    });
    score.measures[measure].slots_mut().push(slot);
    slot
}

/// Keep the measure slots ordered by reference abscissa
fn sort_slots(score: &mut Score, measure: MeasureId) {
    let slots = &score.slots;
    score.measures[measure]
        .slots_mut()
        .sort_by(|a, b| slots[*a].x().total_cmp(&slots[*b].x()).then(a.cmp(b)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::glyph::{Glyph, Scale, Shape};

    fn setup() -> (Score, MeasureId, StaffId) {
        let mut score = Score::new();
        let page = score.add_page(Scale::new(20.0));
        let system = score.add_system(page);
        let part = score.add_part(system);
        let staff = score.add_staff(part, 0.0, 100.0, 800.0);
        let measure = score.add_measure(part, 0.0, 400.0);
        (score, measure, staff)
    }

    fn head(score: &mut Score, x: f64, y: f64, stem: Option<GlyphId>) -> GlyphId {
        let mut glyph = Glyph::new(Shape::NoteheadBlack, Rect::new(x, y - 8.0, 22.0, 16.0));
        if let Some(stem) = stem {
            glyph = glyph.with_stem(stem);
        }
        score.glyphs.insert(glyph)
    }

    fn stem(score: &mut Score, x: f64, top: f64) -> GlyphId {
        score
            .glyphs
            .insert(Glyph::new(Shape::Stem, Rect::new(x, top, 2.0, 70.0)))
    }

    #[test]
    fn test_heads_sharing_a_stem_share_a_chord() {
        let (mut score, measure, staff) = setup();
        let config = SlotConfig::default();
        let s = stem(&mut score, 120.0, 80.0);
        let a = head(&mut score, 100.0, 140.0, Some(s));
        let b = head(&mut score, 100.0, 120.0, Some(s));
        let ca = populate_note(&config, &mut score, measure, staff, a).unwrap();
        let cb = populate_note(&config, &mut score, measure, staff, b).unwrap();
        assert_eq!(ca, cb);
        assert_eq!(score.measures()[measure].slots().len(), 1);
        assert_eq!(score.chords()[ca].notes().len(), 2);
        assert_eq!(score.glyphs.get(b).unwrap().translations(), &[Translation::Chord(ca)]);
    }

    #[test]
    fn test_aligned_stems_share_a_slot() {
        let (mut score, measure, staff) = setup();
        let config = SlotConfig::default();
        let s1 = stem(&mut score, 120.0, 80.0);
        let s2 = stem(&mut score, 140.0, 140.0);
        let s3 = stem(&mut score, 60.0, 80.0);
        let a = head(&mut score, 100.0, 150.0, Some(s1));
        let b = head(&mut score, 120.0, 140.0, Some(s2));
        let c = head(&mut score, 40.0, 150.0, Some(s3));
        for g in [a, b, c] {
            populate_note(&config, &mut score, measure, staff, g).unwrap();
        }
        let slots = score.measures()[measure].slots();
        assert_eq!(slots.len(), 2);
        assert_eq!(score.slots()[slots[0]].x(), 61.0);
        assert_eq!(score.slots()[slots[1]].chords().len(), 2);
    }

    #[test]
    fn test_whole_rest_stays_out_of_slots() {
        let (mut score, measure, staff) = setup();
        let rest = score
            .glyphs
            .insert(Glyph::new(Shape::WholeRest, Rect::new(190.0, 120.0, 20.0, 10.0)));
        let chord = populate_note(&SlotConfig::default(), &mut score, measure, staff, rest).unwrap();
        assert!(score.measures()[measure].slots().is_empty());
        assert_eq!(score.measures()[measure].whole_chords(), &[chord]);
        assert!(score.chords()[chord].is_whole());
    }

    #[test]
    fn test_head_policy_uses_mean_location() {
        let (mut score, measure, staff) = setup();
        let config = SlotConfig {
            policy: SlotPolicy::Head,
            ..SlotConfig::default()
        };
        let a = head(&mut score, 100.0, 150.0, None);
        let b = head(&mut score, 110.0, 110.0, None);
        populate_note(&config, &mut score, measure, staff, a).unwrap();
        populate_note(&config, &mut score, measure, staff, b).unwrap();
        let slots = score.measures()[measure].slots();
        assert_eq!(slots.len(), 1);
        assert_eq!(score.slots()[slots[0]].x(), 116.0);
    }
}
