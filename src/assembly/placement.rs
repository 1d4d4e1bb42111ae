//! Placement rules of notations and directions
//!
//! Each shape family has one fixed rule deciding which chord hosts the
//! glyph. Notations need a chord: when none qualifies the glyph is left
//! unattached. Directions are created anyway and flagged.

use crate::config::ScoreConfig;
use crate::diagnostics::DiagnosticCategory;
use crate::error::{Result, ScoreError};
use crate::geometry::Point;
use crate::glyph::{GlyphId, Shape, ShapeFamily, ShapeSource, Translation};
use crate::score::{
    ChordId, DirectionKind, EntityId, EntityKind, MeasureId, NotationKind, Score, ScoreEntity,
};

use super::resolver;

/// Entity to create for a glyph
pub(crate) struct EntitySpec {
    pub kind: EntityKind,
    pub measure: MeasureId,
    pub chord: Option<ChordId>,
    pub start: bool,
    pub anchor: Option<Point>,
}

impl EntitySpec {
    pub fn new(kind: EntityKind, measure: MeasureId, chord: Option<ChordId>) -> Self {
        Self {
            kind,
            measure,
            chord,
            start: true,
            anchor: None,
        }
    }
}

/// Create an entity from one glyph and register it on its measure, its
/// chord and the glyph
pub(crate) fn create_entity(score: &mut Score, spec: EntitySpec, glyph: GlyphId) -> EntityId {
    let entity = score.entities.push_with(|id| {
        let entity = ScoreEntity::new(id, spec.kind, spec.measure, spec.chord).with_start(spec.start);
        match spec.anchor {
            Some(anchor) => entity.with_anchor(anchor),
            None => entity,
        }
    });
    score.entities[entity].add_glyph(glyph, &score.glyphs);
    score.measures[spec.measure].add_entity(entity);
    if let Some(chord) = spec.chord {
        score.chords[chord].add_entity(entity);
    }
    if let Some(g) = score.glyphs.get_mut(glyph) {
        g.add_translation(Translation::Entity(entity));
    }
    log::debug!("{} {} created from {}", spec.kind, entity, glyph);
    entity
}

/// Apply the placement rule of the glyph shape
pub fn populate_mark(
    config: &ScoreConfig,
    score: &mut Score,
    measure: MeasureId,
    glyph: GlyphId,
) -> Result<Vec<EntityId>> {
    let g = score.glyphs.get(glyph).ok_or(ScoreError::UnknownGlyph(glyph))?;
    let shape = g.shape().ok_or(ScoreError::MissingShape(glyph))?;
    let bounds = g.bounds();
    let point = g.location();
    let scale = score.measure_scale(measure);
    let head_shift = scale.to_pixels(config.placement.head_shift);

    let entities = match shape.family() {
        ShapeFamily::Articulation => {
            let chord = resolver::find_chord(score, measure, point, head_shift);
            let Some(chord) = chord else {
                unattached(score, glyph, shape);
                return Ok(Vec::new());
            };
            let c = &score.chords()[chord];
            let dy = (c.head_location().y - point.y)
                .abs()
                .min((c.tail_location().y - point.y).abs());
            if scale.pixels_to_frac(dy) > config.placement.articulation_max_dy.value() {
                if let Some(g) = score.glyphs.get_mut(glyph) {
                    g.set_shape(None, ShapeSource::Assembly);
                }
                score.diagnostics.add_error(
                    DiagnosticCategory::Unattached,
                    Some(glyph),
                    format!(
                        "{} too far from {} ({:.2} interlines), shape cleared",
                        shape,
                        chord,
                        scale.pixels_to_frac(dy)
                    ),
                );
                return Ok(Vec::new());
            }
            let kind = EntityKind::Notation(NotationKind::Articulation);
            vec![create_entity(score, EntitySpec::new(kind, measure, Some(chord)), glyph)]
        }

        ShapeFamily::Arpeggiate => {
            let shifted = point.shifted_x(scale.to_pixels(config.placement.arpeggiate_shift));
            let chords = resolver::closest_slot(score, measure, shifted)
                .map(|slot| {
                    score.slots()[slot].embraced_chords(score.chords(), bounds.y, bounds.bottom())
                })
                .unwrap_or_default();
            let Some((first, others)) = chords.split_first() else {
                unattached(score, glyph, shape);
                return Ok(Vec::new());
            };
            let kind = EntityKind::Notation(NotationKind::Arpeggiate);
            let entity = create_entity(score, EntitySpec::new(kind, measure, Some(*first)), glyph);
            for chord in others {
                score.chords[*chord].add_notation_link(entity);
            }
            vec![entity]
        }

        ShapeFamily::Fermata => {
            let chord = if shape == Shape::FermataBelow {
                resolver::closest_chord_above(score, measure, point)
            } else {
                resolver::closest_chord_below(score, measure, point)
            };
            let Some(chord) = chord else {
                unattached(score, glyph, shape);
                return Ok(Vec::new());
            };
            let kind = EntityKind::Notation(NotationKind::Fermata);
            vec![create_entity(score, EntitySpec::new(kind, measure, Some(chord)), glyph)]
        }

        ShapeFamily::Ornament => {
            let Some(chord) = chord_below_in_slot(score, measure, point) else {
                unattached(score, glyph, shape);
                return Ok(Vec::new());
            };
            let kind = EntityKind::Notation(NotationKind::Ornament);
            vec![create_entity(score, EntitySpec::new(kind, measure, Some(chord)), glyph)]
        }

        ShapeFamily::Coda | ShapeFamily::Segno => {
            let kind = if shape.family() == ShapeFamily::Coda {
                DirectionKind::Coda
            } else {
                DirectionKind::Segno
            };
            let chord = chord_below_in_slot(score, measure, point);
            vec![direction(score, EntitySpec::new(EntityKind::Direction(kind), measure, chord), glyph)]
        }

        ShapeFamily::Pedal => {
            let chord = resolver::find_chord(score, measure, point, head_shift);
            let mut spec = EntitySpec::new(EntityKind::Direction(DirectionKind::Pedal), measure, chord);
            spec.start = shape == Shape::PedalMark;
            vec![direction(score, spec, glyph)]
        }

        ShapeFamily::Wedge => {
            let part = score.measures()[measure].part();
            let left = Point::new(bounds.x, point.y);
            let right = Point::new(bounds.right(), point.y);
            let mut created = Vec::with_capacity(2);
            for (start, end) in [(true, left), (false, right)] {
                let host = score.measure_at(part, end.x).unwrap_or(measure);
                let chord = resolver::find_chord(score, host, end, head_shift);
                let mut spec =
                    EntitySpec::new(EntityKind::Direction(DirectionKind::Wedge), host, chord);
                spec.start = start;
                spec.anchor = Some(end);
                created.push(direction(score, spec, glyph));
            }
            created
        }

        family => {
            score.diagnostics.add_error(
                DiagnosticCategory::Unsupported,
                Some(glyph),
                format!("no placement rule for {} ({:?})", shape, family),
            );
            Vec::new()
        }
    };
    Ok(entities)
}

/// Create a direction, flagging it when no chord hosts it
pub(crate) fn direction(score: &mut Score, spec: EntitySpec, glyph: GlyphId) -> EntityId {
    let orphan = spec.chord.is_none();
    let kind = spec.kind;
    let entity = create_entity(score, spec, glyph);
    if orphan {
        score.diagnostics.add_error(
            DiagnosticCategory::Context,
            Some(glyph),
            format!("{} {} has no related chord", kind, entity),
        );
    }
    entity
}

/// Chord right below the point in the closest slot
fn chord_below_in_slot(score: &Score, measure: MeasureId, point: Point) -> Option<ChordId> {
    let slot = resolver::closest_slot(score, measure, point)?;
    score.slots()[slot].chord_below(score.chords(), point, None)
}

fn unattached(score: &mut Score, glyph: GlyphId, shape: Shape) {
    score.diagnostics.add_error(
        DiagnosticCategory::Unattached,
        Some(glyph),
        format!("no chord found for {}", shape),
    );
}
