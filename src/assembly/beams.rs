//! Beam items from beam pack glyphs, and beam to chord linkage

use crate::config::BeamConfig;
use crate::error::{Result, ScoreError};
use crate::glyph::{GlyphId, Translation};
use crate::score::beam::pack_endpoints;
use crate::score::{Beam, BeamId, BeamItem, BeamItemId, MeasureId, Score};

use super::resolver;

/// Split a beam glyph into one item per stroke and join each to a beam
pub fn populate_beam(
    config: &BeamConfig,
    score: &mut Score,
    measure: MeasureId,
    glyph: GlyphId,
) -> Result<Vec<BeamItemId>> {
    let g = score.glyphs.get(glyph).ok_or(ScoreError::UnknownGlyph(glyph))?;
    let shape = g.shape().ok_or(ScoreError::MissingShape(glyph))?;
    let card = shape.beam_cardinality().unwrap_or(1);
    let hook = shape == crate::glyph::Shape::BeamHook;
    let endpoints = pack_endpoints(card, hook, g.bounds(), g.line(), config.max_slope);

    let scale = score.measure_scale(measure);
    let join_dx = scale.to_pixels(config.join_dx);
    let join_dy = scale.to_pixels(config.join_dy);

    let mut items = Vec::with_capacity(card);
    for (index, (left, right)) in endpoints.into_iter().enumerate() {
        let joined = score.measures()[measure].beams().iter().copied().find(|b| {
            score.beams()[*b].items().iter().any(|i| {
                score.beam_items()[*i].glyph() != glyph
                    && score.beam_items()[*i].is_adjacent(left, right, join_dx, join_dy)
            })
        });
        let beam = match joined {
            Some(beam) => beam,
            None => {
                let beam = score.beams.push_with(|id| Beam::new(id, measure));
                score.measures[measure].add_beam(beam);
                beam
            }
        };
        let item = score.beam_items.push_with(|id| {
            BeamItem::new(id, glyph, beam, measure, (left, right), card, index)
        });
        score.beams[beam].add_item(item, &score.beam_items);
        if let Some(g) = score.glyphs.get_mut(glyph) {
            g.add_translation(Translation::BeamItem(item));
        }
        items.push(item);
    }
    log::debug!("{} split into {} beam item(s)", glyph, items.len());
    Ok(items)
}

/// Record on each beam of the measure the chords whose stems end on it
pub fn link_chords(config: &BeamConfig, score: &mut Score, measure: MeasureId) {
    let scale = score.measure_scale(measure);
    let max_dx = scale.to_pixels(config.join_dx);
    let max_dy = scale.to_pixels(config.stem_dy);
    let beams: Vec<BeamId> = score.measures()[measure].beams().to_vec();
    for beam in beams {
        let chords = resolver::beam_chords(score, beam, max_dx, max_dy);
        score.beams[beam].set_chords(chords);
    }
}
