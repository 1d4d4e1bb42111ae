//! Dynamics accretion: letters and tokens merged into one mark

use crate::config::ScoreConfig;
use crate::diagnostics::DiagnosticCategory;
use crate::error::{Result, ScoreError};
use crate::glyph::{GlyphId, Translation};
use crate::score::{DirectionKind, EntityId, EntityKind, MeasureId, Score, SystemId};
use crate::tables::SignatureTables;

use super::placement::{self, EntitySpec};
use super::resolver;

const DYNAMICS: EntityKind = EntityKind::Direction(DirectionKind::Dynamics);

/// Merge the glyph into a nearby dynamics of the measure, or start a new one
pub fn populate_dynamics(
    config: &ScoreConfig,
    score: &mut Score,
    measure: MeasureId,
    glyph: GlyphId,
) -> Result<EntityId> {
    let g = score.glyphs.get(glyph).ok_or(ScoreError::UnknownGlyph(glyph))?;
    let bounds = g.bounds();
    let point = g.location();
    let scale = score.measure_scale(measure);
    let max_dx = scale.to_pixels(config.dynamics.merge_dx);
    let max_dy = scale.to_pixels(config.dynamics.merge_dy);

    let compatible = score.measures()[measure]
        .entities()
        .iter()
        .copied()
        .find(|e| {
            let entity = &score.entities()[*e];
            if entity.kind() != DYNAMICS {
                return false;
            }
            let (Some(other), Some(reference)) = (
                entity.bounds(&score.glyphs),
                entity.reference_point(&score.glyphs),
            ) else {
                return false;
            };
            other.horizontal_gap(&bounds) <= max_dx && (reference.y - point.y).abs() <= max_dy
        });

    if let Some(entity) = compatible {
        score.entities[entity].add_glyph(glyph, &score.glyphs);
        if let Some(g) = score.glyphs.get_mut(glyph) {
            g.add_translation(Translation::Entity(entity));
        }
        log::debug!("{} merged into dynamics {}", glyph, entity);
        return Ok(entity);
    }

    let chord = if config.dynamics.register_on_chord {
        let head_shift = scale.to_pixels(config.placement.head_shift);
        resolver::find_chord(score, measure, point, head_shift)
    } else {
        None
    };
    let spec = EntitySpec::new(DYNAMICS, measure, chord);
    if config.dynamics.register_on_chord {
        Ok(placement::direction(score, spec, glyph))
    } else {
        Ok(placement::create_entity(score, spec, glyph))
    }
}

/// Report every dynamics of the system whose signature is not in the table
pub fn check_signatures(score: &mut Score, system: SystemId, tables: &SignatureTables) {
    let mut unmapped = Vec::new();
    for part in &score.systems()[system].parts {
        for measure in &score.parts()[*part].measures {
            for entity in score.measures()[*measure].entities() {
                let e = &score.entities()[*entity];
                if e.kind() == DYNAMICS && e.shape(&score.glyphs, tables).is_none() {
                    unmapped.push((
                        e.glyphs().first().copied(),
                        e.signature(&score.glyphs).to_string(),
                        *entity,
                    ));
                }
            }
        }
    }
    for (glyph, signature, entity) in unmapped {
        score.diagnostics.add_error(
            DiagnosticCategory::Signature,
            glyph,
            format!("no dynamics shape for signature '{}' of {}", signature, entity),
        );
    }
}
