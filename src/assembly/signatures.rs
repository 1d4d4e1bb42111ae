//! Time and key signatures, gathered per staff at the start of a measure

use crate::config::SignatureConfig;
use crate::diagnostics::DiagnosticCategory;
use crate::error::{Result, ScoreError};
use crate::glyph::{GlyphId, Shape, Translation};
use crate::score::key::{self, KeySignature};
use crate::score::{MeasureId, Score, StaffId, SystemId, TimeSignature};
use crate::tables::SignatureTables;

/// Join the glyph to the time signature of its staff, or start one
pub fn populate_time(
    config: &SignatureConfig,
    tables: &SignatureTables,
    score: &mut Score,
    measure: MeasureId,
    staff: StaffId,
    glyph: GlyphId,
) -> Result<()> {
    let g = score.glyphs.get(glyph).ok_or(ScoreError::UnknownGlyph(glyph))?;
    let shape = g.shape().ok_or(ScoreError::MissingShape(glyph))?;
    let center = g.location();
    let scale = score.measure_scale(measure);

    let offset = center.x - score.measures()[measure].left_x();
    if offset < scale.to_pixels(config.time_min_offset) {
        score.diagnostics.add_error(
            DiagnosticCategory::Unattached,
            Some(glyph),
            format!("{} too close to the start of {}", shape, measure),
        );
        return Ok(());
    }

    let max_distance = scale.to_pixels(config.time_max_distance);
    let existing = score.measures()[measure]
        .time_signatures()
        .iter()
        .find(|t| t.staff() == staff)
        .map(|t| (t.center(&score.glyphs), t.is_whole(&score.glyphs, tables)));

    match existing {
        Some((_, true)) => {
            score.diagnostics.add_error(
                DiagnosticCategory::Unattached,
                Some(glyph),
                format!("{} beside a whole time signature in {}", shape, measure),
            );
            return Ok(());
        }
        Some(_) if tables.whole_time(shape).is_some() => {
            score.diagnostics.add_error(
                DiagnosticCategory::Unattached,
                Some(glyph),
                format!("second time signature on {} in {}", staff, measure),
            );
            return Ok(());
        }
        Some((Some(c), false)) if c.distance(center) <= max_distance => {
            let glyphs = &score.glyphs;
            if let Some(sig) = score.measures[measure].time_signature_mut(staff) {
                sig.add_glyph(glyph, glyphs);
            }
            log::debug!("{} joins the time signature of {} in {}", glyph, staff, measure);
        }
        Some(_) => {
            score.diagnostics.add_error(
                DiagnosticCategory::Unattached,
                Some(glyph),
                format!("{} too far from the time signature of {} in {}", shape, staff, measure),
            );
            return Ok(());
        }
        None => {
            score.measures[measure].add_time_signature(TimeSignature::new(staff, glyph));
            log::debug!("time signature started by {} on {} in {}", glyph, staff, measure);
        }
    }
    if let Some(g) = score.glyphs.get_mut(glyph) {
        g.add_translation(Translation::TimeSignature(measure, staff));
    }
    Ok(())
}

/// Report every time signature of the system that does not read as a value
pub fn check_time_signatures(score: &mut Score, system: SystemId, tables: &SignatureTables) {
    let mut invalid = Vec::new();
    for part in &score.systems()[system].parts {
        for measure in &score.parts()[*part].measures {
            for sig in score.measures()[*measure].time_signatures() {
                let staff = &score.staves()[sig.staff()];
                if let Err(err) = sig.rational(&score.glyphs, staff, tables) {
                    invalid.push((sig.glyphs().first().copied(), *measure, err));
                }
            }
        }
    }
    for (glyph, measure, err) in invalid {
        score.diagnostics.add_error(
            DiagnosticCategory::Signature,
            glyph,
            format!("invalid time signature in {}: {}", measure, err),
        );
    }
}

/// Shift of key item positions for a clef, from the treble clef ones
fn clef_delta(shape: Shape) -> i32 {
    match shape {
        Shape::FClef | Shape::FClef8va | Shape::FClef8vb => 2,
        Shape::CClef => 1,
        _ => 0,
    }
}

/// Extend the key signature of the staff with the glyph, or start one when
/// the glyph sits where the first item of a key goes
pub fn populate_key(
    config: &SignatureConfig,
    score: &mut Score,
    measure: MeasureId,
    staff: StaffId,
    glyph: GlyphId,
) -> Result<()> {
    let g = score.glyphs.get(glyph).ok_or(ScoreError::UnknownGlyph(glyph))?;
    let shape = g.shape().ok_or(ScoreError::MissingShape(glyph))?;
    let Some(value) = shape.key_value() else {
        log::trace!("{} {} is no key component", shape, glyph);
        return Ok(());
    };
    let bounds = g.bounds();
    let center = g.location();
    let scale = score.measure_scale(measure);
    let pitch = score.staves()[staff].pitch_position_of(center.y);

    let reject = |score: &mut Score, reason: String| {
        score
            .diagnostics
            .add_error(DiagnosticCategory::Unattached, Some(glyph), reason);
    };

    if pitch.abs() > 5.0 {
        reject(score, format!("{} at pitch {:.1}, away from {}", shape, pitch, staff));
        return Ok(());
    }

    let margin = scale.to_pixels(config.key_margin);
    let fat = bounds.grown(margin, margin);
    let crowded = score.measures()[measure].chords().iter().any(|c| {
        let chord = &score.chords()[*c];
        chord.notes().iter().any(|n| fat.contains(n.center))
            || chord.stem().is_some_and(|s| fat.intersects(&s.bounds))
    });
    if crowded {
        reject(score, format!("{} too close to a note of {}", shape, measure));
        return Ok(());
    }

    let extended = score.measures()[measure]
        .key_signatures()
        .iter()
        .position(|k| {
            k.staff() == staff
                && k.center(&score.glyphs).is_some_and(|c| c.x <= center.x)
                && k.bounds(&score.glyphs).is_some_and(|b| b.intersects(&fat))
        });
    if let Some(index) = extended {
        let key = score.measures()[measure].key_signatures()[index].key(&score.glyphs);
        if key.is_some_and(|k| k.signum() != value.signum()) {
            reject(score, format!("{} opposite to the key of {}", shape, staff));
            return Ok(());
        }
        let glyphs = &score.glyphs;
        score.measures[measure].key_signatures_mut()[index].add_glyph(glyph, glyphs);
        log::debug!("{} extends the key of {} in {}", glyph, staff, measure);
    } else {
        let expected = key::mean_position(value);
        let tolerance = 2.0 * config.key_y_margin.value();
        let deltas: Vec<i32> = match score.clef_before(measure, center, staff) {
            Some(clef) => vec![clef_delta(clef.shape)],
            None => vec![0, 2, 1],
        };
        let fits = deltas
            .iter()
            .any(|d| (pitch - (expected + *d as f64)).abs() <= tolerance);
        if !fits {
            reject(score, format!("{} at pitch {:.1} cannot start a key", shape, pitch));
            return Ok(());
        }
        score.measures[measure]
            .key_signatures_mut()
            .push(KeySignature::new(staff, glyph));
        log::debug!("key started by {} on {} in {}", glyph, staff, measure);
    }
    if let Some(g) = score.glyphs.get_mut(glyph) {
        g.add_translation(Translation::KeySignature(measure, staff));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::Clef;

    #[test]
    fn test_clef_deltas() {
        assert_eq!(clef_delta(Shape::GClef), 0);
        assert_eq!(clef_delta(Shape::FClef8vb), 2);
        assert_eq!(clef_delta(Shape::CClef), 1);
        assert!(Clef::is_clef_shape(Shape::PercussionClef));
    }
}
