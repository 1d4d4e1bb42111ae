//! Slurs: embraced notes at both ends, halves joined across systems

use std::collections::HashSet;

use crate::config::SlurConfig;
use crate::diagnostics::DiagnosticCategory;
use crate::error::{Result, ScoreError};
use crate::geometry::{Point, Rect};
use crate::glyph::{GlyphId, ShapeFamily, Translation};
use crate::score::{PartId, Score, Slur, SlurEnd, SlurId};

/// Lookup area of one slur end, reaching outwards and towards the notes
fn end_area(config: &SlurConfig, score: &Score, part: PartId, end: Point, left: bool, below: bool) -> Rect {
    let scale = score.part_scale(part);
    let dx = scale.to_pixels(config.area_dx);
    let margin = scale.to_pixels(config.area_x_margin);
    let dy = scale.to_pixels(config.area_dy);
    let x = if left { end.x - dx } else { end.x - margin };
    let y = if below { end.y - dy } else { end.y };
    Rect::new(x, y, dx + margin, dy)
}

/// Notes of the part in the area, reached through a head or a stem tail,
/// keeping only those closest to the slur end
fn closest_notes(score: &Score, part: PartId, area: Rect, end: Point) -> Vec<SlurEnd> {
    let mut found: Vec<(SlurEnd, f64)> = Vec::new();
    for measure in &score.parts()[part].measures {
        for chord in score.measures()[*measure].chords() {
            let c = &score.chords()[*chord];
            let tail = c.tail_location();
            if c.stem().is_some() && area.contains(tail) {
                let nearest = c
                    .notes()
                    .iter()
                    .enumerate()
                    .min_by(|a, b| a.1.center.distance(tail).total_cmp(&b.1.center.distance(tail)));
                if let Some((note, _)) = nearest {
                    found.push((SlurEnd { chord: *chord, note }, tail.distance(end)));
                }
            }
            for (note, n) in c.notes().iter().enumerate() {
                let is_head = score
                    .glyphs
                    .get(n.glyph)
                    .and_then(|g| g.shape())
                    .is_some_and(|s| s.family() == ShapeFamily::NoteHead);
                if is_head && area.contains(n.center) {
                    found.push((SlurEnd { chord: *chord, note }, n.center.distance(end)));
                }
            }
        }
    }
    let Some(min) = found.iter().map(|(_, d)| *d).reduce(f64::min) else {
        return Vec::new();
    };
    let mut closest: Vec<SlurEnd> = Vec::new();
    for (node, distance) in found {
        if distance <= min && !closest.contains(&node) {
            closest.push(node);
        }
    }
    closest
}

/// Pick one end among the candidates, favouring a chord whose stem goes the
/// same way as the other end's
fn pick(score: &Score, own: &[SlurEnd], other: &[SlurEnd]) -> Option<SlurEnd> {
    let first = *own.first()?;
    let Some(partner) = other.first() else {
        return Some(first);
    };
    let dir = score.chords()[partner.chord].stem_dir();
    Some(
        own.iter()
            .copied()
            .find(|e| score.chords()[e.chord].stem_dir() == dir)
            .unwrap_or(first),
    )
}

/// Whether two slur ends sit on notes of the same step and octave
fn same_pitch(score: &Score, a: Option<SlurEnd>, b: Option<SlurEnd>) -> bool {
    let pitch = |end: SlurEnd| {
        let note = score.chords()[end.chord].notes().get(end.note)?;
        score.note_pitch(end.chord, note)
    };
    match (a.and_then(pitch), b.and_then(pitch)) {
        (Some(pa), Some(pb)) => pa == pb,
        _ => false,
    }
}

/// Attach a slur glyph to the notes at its ends
pub fn populate_slur(
    config: &SlurConfig,
    score: &mut Score,
    part: PartId,
    glyph: GlyphId,
) -> Result<Option<SlurId>> {
    let g = score.glyphs.get(glyph).ok_or(ScoreError::UnknownGlyph(glyph))?;
    let bounds = g.bounds();
    let (p1, p2) = g.ends();
    let below = (p1.y + p2.y) / 2.0 < bounds.center().y;

    let left_nodes = closest_notes(score, part, end_area(config, score, part, p1, true, below), p1);
    let right_nodes = closest_notes(score, part, end_area(config, score, part, p2, false, below), p2);
    if left_nodes.is_empty() && right_nodes.is_empty() {
        score.diagnostics.add_error(
            DiagnosticCategory::Unattached,
            Some(glyph),
            "slur with no embraced notes",
        );
        return Ok(None);
    }
    let left = pick(score, &left_nodes, &right_nodes);
    let right = pick(score, &right_nodes, &left_nodes);

    let measures = &score.parts()[part].measures;
    let first = measures.first().map(|m| &score.measures()[*m]);
    let last = measures.last().map(|m| &score.measures()[*m]);
    let left_orphan = left.is_none() && first.is_some_and(|m| p1.x <= m.right_x());
    let right_orphan = right.is_none() && last.is_some_and(|m| p2.x >= m.left_x());
    let tie = left.zip(right).is_some_and(|(l, r)| l.chord != r.chord) && same_pitch(score, left, right);

    let slur = score.slurs.push_with(|id| {
        Slur::new(id, part, glyph, (p1, p2), below, (left, right), (left_orphan, right_orphan))
    });
    score.slurs[slur].set_tie(tie);
    score.parts[part].slurs.push(slur);
    if let Some(g) = score.glyphs.get_mut(glyph) {
        g.add_translation(Translation::Slur(slur));
    }
    log::debug!("{} created from {} in {}", slur, glyph, part);
    Ok(Some(slur))
}

/// Whether the right orphan `prev` and the left orphan `next` can be the two
/// halves of one slur
fn can_extend(config: &SlurConfig, score: &Score, prev: &Slur, next: &Slur) -> bool {
    if prev.right_extension().is_some() || next.left_extension().is_some() {
        return false;
    }
    let (Some(prev_staff), Some(next_staff)) = (
        score.part_staff_at(prev.part(), prev.p2().y),
        score.part_staff_at(next.part(), next.p1().y),
    ) else {
        return false;
    };
    let prev_staff = &score.staves()[prev_staff];
    let next_staff = &score.staves()[next_staff];
    if prev_staff.index() != next_staff.index() {
        return false;
    }
    let delta = next_staff.pitch_position_of(next.p1().y) - prev_staff.pitch_position_of(prev.p2().y);
    delta.abs() <= 2.0 * config.max_delta_y.value()
}

/// Pairs of orphans to join between a part and the same part in the
/// preceding system, top down
fn match_orphans(config: &SlurConfig, score: &Score, prev_part: PartId, part: PartId) -> Vec<(SlurId, SlurId)> {
    let sorted = |part: PartId, keep: fn(&Slur) -> bool, y: fn(&Slur) -> f64| {
        let mut slurs: Vec<SlurId> = score.parts()[part]
            .slurs
            .iter()
            .copied()
            .filter(|s| keep(&score.slurs()[*s]))
            .collect();
        slurs.sort_by(|a, b| y(&score.slurs()[*a]).total_cmp(&y(&score.slurs()[*b])));
        slurs
    };
    let previous = sorted(prev_part, Slur::is_right_orphan, |s: &Slur| s.p2().y);
    let orphans = sorted(part, Slur::is_left_orphan, |s: &Slur| s.p1().y);

    let mut used = HashSet::new();
    let mut pairs = Vec::new();
    for orphan in orphans {
        let next = &score.slurs()[orphan];
        let matched = previous
            .iter()
            .copied()
            .find(|p| !used.contains(p) && can_extend(config, score, &score.slurs()[*p], next));
        if let Some(prev) = matched {
            used.insert(prev);
            pairs.push((prev, orphan));
        }
    }
    pairs
}

/// Join slur halves across systems and pages
pub fn connect_systems(config: &SlurConfig, score: &mut Score) {
    let mut pairs = Vec::new();
    for system in score.systems().ids() {
        let Some(prev_system) = score.preceding_system(system) else {
            continue;
        };
        for part in &score.systems()[system].parts {
            if let Some(prev_part) = score.corresponding_part(*part, prev_system) {
                pairs.extend(match_orphans(config, score, prev_part, *part));
            }
        }
    }

    for (prev, next) in pairs {
        let tie = same_pitch(score, score.slurs()[prev].left(), score.slurs()[next].right());
        score.slurs[prev].set_right_extension(next);
        score.slurs[next].set_left_extension(prev);
        score.slurs[prev].set_tie(tie);
        score.slurs[next].set_tie(tie);
        log::debug!("{} continues as {}{}", prev, next, if tie { ", tied" } else { "" });
    }

    for slur in score.slurs().iter() {
        if slur.is_left_orphan() && slur.left_extension().is_none() {
            log::warn!("{} has no left continuation", slur.id());
        }
        if slur.is_right_orphan() && slur.right_extension().is_none() {
            log::warn!("{} has no right continuation", slur.id());
        }
    }
}
