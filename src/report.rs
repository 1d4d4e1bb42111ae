//! Textual dump of an assembled score
//!
//! One line per node, indented by depth. Entities are rendered by matching
//! on their kind, so adding a kind forces this module to handle it.

use crate::geometry::Point;
use crate::glyph::Shape;
use crate::score::{
    ChordId, DirectionKind, EntityId, EntityKind, LyricsLineId, MeasureId, NotationKind, PartId,
    Score, ScoreEntity, SlotId, SlurEnd, SlurId, SystemId,
};
use crate::tables::SignatureTables;

/// Build the report incrementally
struct ReportBuilder<'a> {
    score: &'a Score,
    tables: &'a SignatureTables,
    out: String,
    indent: usize,
}

impl<'a> ReportBuilder<'a> {
    fn new(score: &'a Score, tables: &'a SignatureTables) -> Self {
        Self {
            score,
            tables,
            out: String::new(),
            indent: 0,
        }
    }

    fn line(&mut self, text: impl AsRef<str>) {
        self.out.push_str(&"  ".repeat(self.indent));
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.indent += 1;
        f(self);
        self.indent -= 1;
    }

    fn system(&mut self, system: SystemId) {
        let s = &self.score.systems()[system];
        self.line(format!("system {} on {}", system, s.page));
        self.nested(|b| {
            for part in &s.parts {
                b.part(*part);
            }
        });
    }

    fn part(&mut self, part: PartId) {
        let p = &self.score.parts()[part];
        self.line(format!("part {} number {}", part, p.number));
        self.nested(|b| {
            for measure in &p.measures {
                b.measure(*measure);
            }
            for line in &p.lyrics_lines {
                b.lyrics_line(*line);
            }
            for slur in &p.slurs {
                b.slur(*slur);
            }
        });
    }

    fn slur(&mut self, slur: SlurId) {
        let s = &self.score.slurs()[slur];
        let end = |end: Option<SlurEnd>, orphan: bool| match end {
            Some(end) => end.chord.to_string(),
            None if orphan => "|".to_string(),
            None => "-".to_string(),
        };
        let mut text = format!(
            "{} {} {} -> {}",
            if s.is_tie() { "tie" } else { "slur" },
            slur,
            end(s.left(), s.is_left_orphan()),
            end(s.right(), s.is_right_orphan())
        );
        if let Some(prev) = s.left_extension() {
            text.push_str(&format!(" from {}", prev));
        }
        if let Some(next) = s.right_extension() {
            text.push_str(&format!(" to {}", next));
        }
        self.line(text);
    }

    fn measure(&mut self, measure: MeasureId) {
        let m = &self.score.measures()[measure];
        self.line(format!(
            "measure {} [{:.1}, {:.1}]",
            measure,
            m.left_x(),
            m.right_x()
        ));
        self.nested(|b| {
            for clef in m.clefs() {
                b.line(format!("clef {} on {} at {}", clef.shape, clef.staff, clef.center));
            }
            for key in m.key_signatures() {
                let value = key
                    .key(&b.score.glyphs)
                    .map(|k| format!("{:+}", k))
                    .unwrap_or_else(|| "?".to_string());
                b.line(format!("key {} on {}", value, key.staff()));
            }
            for time in m.time_signatures() {
                let staff = &b.score.staves()[time.staff()];
                let value = time
                    .rational(&b.score.glyphs, staff, b.tables)
                    .map(|r| r.to_string())
                    .unwrap_or_else(|_| "?".to_string());
                b.line(format!("time {} on {}", value, time.staff()));
            }
            for slot in m.slots() {
                b.slot(*slot);
            }
            for chord in m.whole_chords() {
                b.chord(*chord, "whole chord");
            }
            for beam in m.beams() {
                let beam = &b.score.beams()[*beam];
                let items = ids(beam.items());
                let chords = ids(beam.chords());
                b.line(format!("beam {} items [{}] chords [{}]", beam.id(), items, chords));
            }
            for entity in m.entities() {
                let e = &b.score.entities()[*entity];
                if e.chord().is_none() || !e.kind().is_notation() {
                    b.entity(e);
                }
            }
            b.barline(measure);
        });
    }

    fn slot(&mut self, slot: SlotId) {
        let s = &self.score.slots()[slot];
        self.line(format!("slot {} x {:.1}", slot, s.x()));
        self.nested(|b| {
            for chord in s.chords() {
                b.chord(*chord, "chord");
            }
        });
    }

    fn chord(&mut self, chord: ChordId, label: &str) {
        let c = &self.score.chords()[chord];
        let stem = match c.stem_dir() {
            -1 => "stem up",
            1 => "stem down",
            _ => "no stem",
        };
        let pitches: Vec<String> = c
            .notes()
            .iter()
            .map(|note| match self.score.note_pitch(chord, note) {
                Some((step, octave)) => format!("{}{}", step, octave),
                None => format!("?{:.0}", note.pitch_position),
            })
            .collect();
        self.line(format!(
            "{} {} {} {} [{}]",
            label,
            chord,
            c.staff(),
            stem,
            pitches.join(" ")
        ));
        self.nested(|b| {
            for entity in c.entities() {
                let e = &b.score.entities()[*entity];
                if e.kind().is_notation() {
                    b.entity(e);
                }
            }
            for entity in c.notation_links() {
                b.line(format!("linked to {}", entity));
            }
        });
    }

    fn entity(&mut self, entity: &ScoreEntity) {
        let store = &self.score.glyphs;
        let shape = shape_name(entity.shape(store, self.tables));
        let host = host_name(entity.chord());
        let text = match entity.kind() {
            EntityKind::Notation(NotationKind::Arpeggiate)
            | EntityKind::Notation(NotationKind::Articulation)
            | EntityKind::Notation(NotationKind::Fermata)
            | EntityKind::Notation(NotationKind::Ornament) => {
                format!("{} {} {}", entity.kind(), entity.id(), shape)
            }
            EntityKind::Direction(DirectionKind::Dynamics) => {
                let sound = entity
                    .shape(store, self.tables)
                    .and_then(|s| self.tables.sound_level(s))
                    .map(|level| format!(" sound {}", level))
                    .unwrap_or_default();
                format!(
                    "dynamics {} '{}' {}{} on {}",
                    entity.id(),
                    entity.signature(store),
                    shape,
                    sound,
                    host
                )
            }
            EntityKind::Direction(DirectionKind::Wedge) => format!(
                "wedge {} {} {} at {} on {}",
                entity.id(),
                shape,
                start_stop(entity.is_start()),
                point_name(entity.reference_point(store)),
                host
            ),
            EntityKind::Direction(DirectionKind::Pedal) => format!(
                "pedal {} {} {} on {}",
                entity.id(),
                shape,
                start_stop(entity.is_start()),
                host
            ),
            EntityKind::Direction(DirectionKind::Coda)
            | EntityKind::Direction(DirectionKind::Segno) => {
                format!("{} {} on {}", entity.kind(), entity.id(), host)
            }
        };
        self.line(text);
    }

    fn barline(&mut self, measure: MeasureId) {
        let m = &self.score.measures()[measure];
        let Some(barline) = m.barline().filter(|b| !b.is_empty()) else {
            return;
        };
        let Some(reference) = self.score.parts()[m.part()]
            .staves
            .first()
            .map(|s| &self.score.staves()[*s])
        else {
            return;
        };
        let store = &self.score.glyphs;
        self.line(format!(
            "barline {} '{}'",
            shape_name(barline.shape(store, reference, self.tables)),
            barline.signature(store, reference)
        ));
    }

    fn lyrics_line(&mut self, line: LyricsLineId) {
        let l = &self.score.lyrics_lines()[line];
        let staff = l
            .staff()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        self.line(format!("lyrics line {} {} under {}", l.number(), line, staff));
        self.nested(|b| {
            for item in l.items() {
                let i = &b.score.lyrics_items()[*item];
                let mut text = format!("{} {}", item, i.kind());
                if let Some(syllabic) = i.syllabic() {
                    text.push_str(&format!(" {}", syllabic));
                }
                if i.is_syllable() {
                    text.push_str(&format!(" on {}", host_name(i.chord())));
                }
                b.line(text);
            }
        });
    }
}

fn ids<I: ToString>(ids: &[I]) -> String {
    ids.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(" ")
}

fn shape_name(shape: Option<Shape>) -> &'static str {
    shape.map(|s| s.name()).unwrap_or("<none>")
}

fn host_name(chord: Option<ChordId>) -> String {
    chord
        .map(|c| c.to_string())
        .unwrap_or_else(|| "no chord".to_string())
}

fn point_name(point: Option<Point>) -> String {
    point.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string())
}

fn start_stop(start: bool) -> &'static str {
    if start {
        "start"
    } else {
        "stop"
    }
}

/// Render the whole score tree
pub fn render(score: &Score, tables: &SignatureTables) -> String {
    let mut builder = ReportBuilder::new(score, tables);
    for system in score.systems().ids() {
        builder.system(system);
    }
    builder.out
}

/// Render the glyph to entity links, one line per translation
pub fn render_links(score: &Score) -> String {
    let mut out = String::new();
    for glyph in score.glyphs.iter() {
        for (from, to) in score.translation_links(glyph.id()) {
            out.push_str(&format!("{} {} -> {}\n", glyph.id(), from, to));
        }
    }
    out
}

/// Entity of the score, for callers that only hold an id
pub fn describe_entity(score: &Score, tables: &SignatureTables, entity: EntityId) -> String {
    let mut builder = ReportBuilder::new(score, tables);
    if let Some(e) = score.entities().get(entity) {
        builder.entity(e);
    }
    builder.out.trim_end().to_string()
}
