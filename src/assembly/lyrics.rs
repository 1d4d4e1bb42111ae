//! Lyrics: line assignment, syllable to note mapping and syllabic types

use crate::config::LyricsConfig;
use crate::diagnostics::DiagnosticCategory;
use crate::error::{Result, ScoreError};
use crate::glyph::{GlyphId, Translation};
use crate::score::lyrics::split_text;
use crate::score::{
    ChordId, LyricsItem, LyricsItemId, LyricsLine, LyricsLineId, PartId, Score, StaffId,
    Syllabic, SystemId,
};

/// Split a text glyph into lyrics items and file them into lines of the part
pub fn populate_text(
    config: &LyricsConfig,
    score: &mut Score,
    part: PartId,
    glyph: GlyphId,
) -> Result<Vec<LyricsItemId>> {
    let g = score.glyphs.get(glyph).ok_or(ScoreError::UnknownGlyph(glyph))?;
    let Some(text) = g.text() else {
        score.diagnostics.add_error(
            DiagnosticCategory::Mapping,
            Some(glyph),
            "text glyph without content",
        );
        return Ok(Vec::new());
    };
    let tokens = split_text(text, g.bounds());
    let max_dy = score.part_scale(part).to_pixels(config.line_dy);

    let mut items = Vec::with_capacity(tokens.len());
    for (kind, bounds) in tokens {
        let item = score
            .lyrics_items
            .push_with(|id| LyricsItem::new(id, glyph, part, kind, bounds));
        let y = bounds.center().y;
        let line = score.parts()[part]
            .lyrics_lines
            .iter()
            .copied()
            .find(|l| {
                score.lyrics_lines()[*l]
                    .mean_y()
                    .is_some_and(|mean| (mean - y).abs() <= max_dy)
            });
        let line = match line {
            Some(line) => line,
            None => {
                let line = score
                    .lyrics_lines
                    .push_with(|id| LyricsLine::new(id, part));
                score.parts[part].lyrics_lines.push(line);
                line
            }
        };
        score.lyrics_lines[line].add_item(item, &score.lyrics_items);
        score.lyrics_items[item].set_line(line);
        if let Some(g) = score.glyphs.get_mut(glyph) {
            g.add_translation(Translation::Lyrics(item));
        }
        items.push(item);
    }
    renumber_lines(score, part);
    Ok(items)
}

/// Order the lines of the part from top to bottom and number them from 1
fn renumber_lines(score: &mut Score, part: PartId) {
    let lines = &score.lyrics_lines;
    let mut ordered = score.parts[part].lyrics_lines.clone();
    ordered.sort_by(|a, b| {
        let ya = lines[*a].mean_y().unwrap_or_default();
        let yb = lines[*b].mean_y().unwrap_or_default();
        ya.total_cmp(&yb)
    });
    for (index, line) in ordered.iter().enumerate() {
        score.lyrics_lines[*line].set_number(index + 1);
    }
    score.parts[part].lyrics_lines = ordered;
}

/// Closest staff of the part lying above the ordinate
fn staff_above(score: &Score, part: PartId, y: f64) -> Option<StaffId> {
    let staves = &score.parts()[part].staves;
    staves
        .iter()
        .copied()
        .filter(|s| score.staves()[*s].bottom() <= y)
        .max_by(|a, b| {
            score.staves()[*a]
                .bottom()
                .total_cmp(&score.staves()[*b].bottom())
        })
        .or_else(|| staves.first().copied())
}

/// Give each line its staff and map each syllable of the system to a chord
pub fn map_system(config: &LyricsConfig, score: &mut Score, system: SystemId) {
    let parts = score.systems()[system].parts.clone();
    for part in parts {
        let margin = score.part_scale(part).to_pixels(config.note_dx);
        for line in score.parts()[part].lyrics_lines.clone() {
            let Some(mean) = score.lyrics_lines()[line].mean_y() else {
                continue;
            };
            let Some(staff) = staff_above(score, part, mean) else {
                continue;
            };
            score.lyrics_lines[line].set_staff(staff);
            for item in score.lyrics_lines()[line].items().to_vec() {
                if !score.lyrics_items()[item].is_syllable() {
                    continue;
                }
                match note_for(score, part, staff, item, margin) {
                    Some(chord) => score.lyrics_items[item].set_chord(chord),
                    None => {
                        let glyph = score.lyrics_items()[item].glyph();
                        let message = format!(
                            "no note found for syllable {}",
                            score.lyrics_items()[item].kind()
                        );
                        score
                            .diagnostics
                            .add_error(DiagnosticCategory::Mapping, Some(glyph), message);
                    }
                }
            }
        }
    }
}

/// Chord above the syllable on the line staff, closest by head abscissa
fn note_for(
    score: &Score,
    part: PartId,
    staff: StaffId,
    item: LyricsItemId,
    margin: f64,
) -> Option<ChordId> {
    let center = score.lyrics_items()[item].bounds().center();
    let (chord, dx) = score.parts()[part]
        .measures
        .iter()
        .map(|m| &score.measures()[*m])
        .filter(|m| m.brackets(center.x, margin))
        .flat_map(|m| m.chords().iter().chain(m.whole_chords()).copied())
        .filter_map(|c| {
            let chord = &score.chords()[c];
            let head = chord.head_location();
            (chord.staff() == staff && head.y < center.y).then(|| (c, (head.x - center.x).abs()))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))?;
    (dx <= margin).then_some(chord)
}

/// Item just before the first item of the line, found in the same line of
/// the same part in the preceding system
fn item_before_line(score: &Score, line: LyricsLineId) -> Option<LyricsItemId> {
    let counterpart = corresponding_line(score, line, score.preceding_system(system_of(score, line))?)?;
    score.lyrics_lines()[counterpart].last_item()
}

/// Item just after the last item of the line, found in the same line of the
/// same part in the following system
fn item_after_line(score: &Score, line: LyricsLineId) -> Option<LyricsItemId> {
    let counterpart = corresponding_line(score, line, score.following_system(system_of(score, line))?)?;
    score.lyrics_lines()[counterpart].first_item()
}

fn system_of(score: &Score, line: LyricsLineId) -> SystemId {
    score.parts()[score.lyrics_lines()[line].part()].system
}

fn corresponding_line(score: &Score, line: LyricsLineId, system: SystemId) -> Option<LyricsLineId> {
    let line = &score.lyrics_lines()[line];
    let part = score.corresponding_part(line.part(), system)?;
    score.parts()[part]
        .lyrics_lines
        .iter()
        .copied()
        .find(|l| score.lyrics_lines()[*l].number() == line.number())
}

/// Assign a syllabic type to every syllable of the score
///
/// Runs after every page is populated, since the neighbours of the items at
/// both ends of a line live in other systems.
pub fn infer_syllabics(score: &mut Score) {
    let mut assigned = Vec::new();
    for line in score.lyrics_lines().ids() {
        let items = score.lyrics_lines()[line].items();
        for (pos, item) in items.iter().enumerate() {
            if !score.lyrics_items()[*item].is_syllable() {
                continue;
            }
            let before = match pos.checked_sub(1) {
                Some(prev) => Some(items[prev]),
                None => item_before_line(score, line),
            };
            let after = match items.get(pos + 1) {
                Some(next) => Some(*next),
                None => item_after_line(score, line),
            };
            let is_hyphen =
                |i: Option<LyricsItemId>| i.is_some_and(|i| score.lyrics_items()[i].kind().is_hyphen());
            assigned.push((*item, Syllabic::from_neighbours(is_hyphen(before), is_hyphen(after))));
        }
    }
    for (item, syllabic) in assigned {
        score.lyrics_items[item].set_syllabic(syllabic);
    }
}
