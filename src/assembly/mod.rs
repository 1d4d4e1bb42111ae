//! Assembly of classified glyphs into score entities
//!
//! The [`Assembler`] is the single entry point. For each glyph it locates
//! the staff, part and measure, then hands the glyph to the rule of its
//! shape family:
//!
//! - note heads and rests build time slots and chords ([`slots`])
//! - beam packs are split into beam items ([`beams`])
//! - barline strokes and dots accumulate on the measure barline ([`barlines`])
//! - dynamics letters accrete into marks ([`dynamics`])
//! - time digits and key accidentals gather into signatures ([`signatures`])
//! - slurs find the notes at their ends ([`slurs`])
//! - text becomes lyrics items ([`lyrics`])
//! - every other mark follows its placement rule ([`placement`])
//!
//! Population of a system runs in two passes so that chords exist before
//! anything looks for them. [`Assembler::finish_system`] then resolves
//! what needs the whole system, and [`Assembler::finish_score`] what needs
//! neighbouring systems.

pub mod barlines;
pub mod beams;
pub mod dynamics;
pub mod lyrics;
pub mod placement;
pub mod resolver;
pub mod signatures;
pub mod slots;
pub mod slurs;

use crate::config::ScoreConfig;
use crate::diagnostics::DiagnosticCategory;
use crate::error::{Result, ScoreError};
use crate::glyph::{GlyphId, ShapeFamily};
use crate::score::{Clef, MeasureId, Score, StaffId, SystemId};
use crate::tables::SignatureTables;

/// Drives glyph population with one configuration and one set of tables
#[derive(Debug, Clone, Copy)]
pub struct Assembler<'a> {
    config: &'a ScoreConfig,
    tables: &'a SignatureTables,
}

impl<'a> Assembler<'a> {
    pub fn new(config: &'a ScoreConfig, tables: &'a SignatureTables) -> Self {
        Self { config, tables }
    }

    pub fn config(&self) -> &ScoreConfig {
        self.config
    }

    pub fn tables(&self) -> &SignatureTables {
        self.tables
    }

    /// Turn one glyph of the system into score entities
    pub fn populate(&self, score: &mut Score, system: SystemId, glyph: GlyphId) -> Result<()> {
        let g = score.glyphs.get(glyph).ok_or(ScoreError::UnknownGlyph(glyph))?;
        let shape = g.shape().ok_or(ScoreError::MissingShape(glyph))?;
        let location = g.location();
        let family = shape.family();

        if family == ShapeFamily::Barline {
            barlines::populate_barline(&self.config.barlines, score, system, glyph)?;
            return Ok(());
        }

        let staff = score
            .staff_at(system, location.y)
            .ok_or(ScoreError::MissingStaff(system))?;
        let part = score.staves()[staff].part();
        match family {
            ShapeFamily::Text => {
                lyrics::populate_text(&self.config.lyrics, score, part, glyph)?;
                return Ok(());
            }
            ShapeFamily::Slur => {
                slurs::populate_slur(&self.config.slurs, score, part, glyph)?;
                return Ok(());
            }
            _ => {}
        }

        let Some(measure) = score.measure_at(part, location.x) else {
            score.diagnostics.add_error(
                DiagnosticCategory::Unattached,
                Some(glyph),
                format!("{} at {:.1} lies outside every measure of {}", shape, location.x, part),
            );
            return Ok(());
        };

        match family {
            ShapeFamily::NoteHead | ShapeFamily::Rest => {
                slots::populate_note(&self.config.slots, score, measure, staff, glyph)?;
            }
            ShapeFamily::Stem => {
                // stems join their chord through the heads attached to them
                log::trace!("{} {} left to its heads", shape, glyph);
            }
            ShapeFamily::Beam => {
                beams::populate_beam(&self.config.beams, score, measure, glyph)?;
            }
            ShapeFamily::Dynamics => {
                dynamics::populate_dynamics(self.config, score, measure, glyph)?;
            }
            ShapeFamily::Clef => populate_clef(score, measure, staff, glyph)?,
            ShapeFamily::TimeSignature => {
                signatures::populate_time(
                    &self.config.signatures,
                    self.tables,
                    score,
                    measure,
                    staff,
                    glyph,
                )?;
            }
            ShapeFamily::KeySignature => {
                signatures::populate_key(&self.config.signatures, score, measure, staff, glyph)?;
            }
            _ => {
                placement::populate_mark(self.config, score, measure, glyph)?;
            }
        }
        Ok(())
    }

    /// Populate every glyph of a system, then finish it
    ///
    /// Heads, rests and clefs go first, then key components from left to
    /// right, then the rest in the given order. Glyphs without a shape are
    /// skipped.
    pub fn populate_system(
        &self,
        score: &mut Score,
        system: SystemId,
        glyphs: &[GlyphId],
    ) -> Result<()> {
        let mut ranked = Vec::with_capacity(glyphs.len());
        for glyph in glyphs {
            let g = score.glyphs.get(*glyph).ok_or(ScoreError::UnknownGlyph(*glyph))?;
            let Some(shape) = g.shape() else {
                // e.g. an articulation rejected by a previous run
                log::debug!("{} has no shape, skipped", glyph);
                continue;
            };
            let rank = match shape.family() {
                ShapeFamily::NoteHead | ShapeFamily::Rest | ShapeFamily::Clef => 0,
                ShapeFamily::KeySignature => 1,
                _ => 2,
            };
            let x = if rank == 1 { g.bounds().x } else { 0.0 };
            ranked.push((rank, x, *glyph));
        }
        ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)));
        for (_, _, glyph) in ranked {
            self.populate(score, system, glyph)?;
        }
        self.finish_system(score, system);
        Ok(())
    }

    /// Resolve what needs a fully populated system: barline shapes, beam
    /// chords, dynamics and time signatures, lyrics notes
    pub fn finish_system(&self, score: &mut Score, system: SystemId) {
        barlines::resolve_barlines(score, system, self.tables);
        let measures: Vec<MeasureId> = score.systems()[system]
            .parts
            .iter()
            .flat_map(|p| score.parts()[*p].measures.iter().copied())
            .collect();
        for measure in measures {
            beams::link_chords(&self.config.beams, score, measure);
        }
        dynamics::check_signatures(score, system, self.tables);
        signatures::check_time_signatures(score, system, self.tables);
        lyrics::map_system(&self.config.lyrics, score, system);
        log::info!(
            "{} finished with {} diagnostic(s) so far",
            system,
            score.diagnostics.len()
        );
    }

    /// Sequential pass across systems and pages, once all are populated
    pub fn finish_score(&self, score: &mut Score) {
        slurs::connect_systems(&self.config.slurs, score);
        lyrics::infer_syllabics(score);
    }

    /// Populate each system with its glyphs, then finish the score
    pub fn assemble(&self, score: &mut Score, systems: &[(SystemId, Vec<GlyphId>)]) -> Result<()> {
        for (system, glyphs) in systems {
            self.populate_system(score, *system, glyphs)?;
        }
        self.finish_score(score);
        Ok(())
    }
}

fn populate_clef(score: &mut Score, measure: MeasureId, staff: StaffId, glyph: GlyphId) -> Result<()> {
    let g = score.glyphs.get(glyph).ok_or(ScoreError::UnknownGlyph(glyph))?;
    let shape = g.shape().ok_or(ScoreError::MissingShape(glyph))?;
    let clef = Clef {
        shape,
        staff,
        center: g.location(),
        glyph,
    };
    score.measures[measure].add_clef(clef);
    Ok(())
}
