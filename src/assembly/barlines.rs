//! Barline components and barline shape resolution
//!
//! A component belongs to the measure it closes: the one whose right
//! abscissa lies within `barlines.max_dx`. A component sitting on the left
//! abscissa of a measure closes the preceding one, if any.

use crate::config::BarlineConfig;
use crate::diagnostics::DiagnosticCategory;
use crate::error::{Result, ScoreError};
use crate::glyph::{GlyphId, Translation};
use crate::score::{Measure, MeasureId, PartId, Score, SystemId};
use crate::tables::SignatureTables;

/// Where a barline component lands in a part
#[derive(Debug, Clone, Copy, PartialEq)]
enum Closing {
    Measure(MeasureId),
    /// On the left edge of the first measure
    SystemStart,
    /// Away from every measure edge
    Stray,
}

/// Add a barline component to the closing barline of every part it crosses
pub fn populate_barline(
    config: &BarlineConfig,
    score: &mut Score,
    system: SystemId,
    glyph: GlyphId,
) -> Result<Vec<MeasureId>> {
    let g = score.glyphs.get(glyph).ok_or(ScoreError::UnknownGlyph(glyph))?;
    let bounds = g.bounds();
    let is_stroke = g
        .shape()
        .and_then(|s| s.barline_code())
        .is_some_and(|code| code != 'O');
    let center = bounds.center();
    let max_dx = score.system_scale(system).to_pixels(config.max_dx);

    let parts: Vec<PartId> = score.systems()[system]
        .parts
        .iter()
        .copied()
        .filter(|p| {
            score.parts()[*p].staves.iter().any(|s| {
                let staff = &score.staves()[*s];
                if bounds.height < staff.interline() {
                    // dots only belong where they sit
                    staff.overlaps(center.y, center.y)
                } else {
                    staff.overlaps(bounds.y, bounds.bottom())
                }
            })
        })
        .collect();

    let mut measures = Vec::new();
    for part in parts {
        let measure = match closing_measure(score, part, center.x, max_dx) {
            Closing::Measure(measure) => measure,
            Closing::SystemStart => {
                log::debug!("{} opens {}, no measure to close", glyph, part);
                continue;
            }
            Closing::Stray if is_stroke => {
                score.diagnostics.add_error(
                    DiagnosticCategory::Unattached,
                    Some(glyph),
                    format!("barline at {:.1} is off every measure edge of {}", center.x, part),
                );
                continue;
            }
            Closing::Stray => {
                log::debug!("{} off every measure edge of {}, not a barline dot", glyph, part);
                continue;
            }
        };
        score.measures[measure]
            .barline_mut()
            .add_glyph(glyph, &score.glyphs);
        if let Some(g) = score.glyphs.get_mut(glyph) {
            g.add_translation(Translation::Barline(measure));
        }
        measures.push(measure);
    }
    Ok(measures)
}

/// Measure closed by a component at abscissa `x`
fn closing_measure(score: &Score, part: PartId, x: f64, max_dx: f64) -> Closing {
    let measures = &score.parts()[part].measures;
    let nearest = |edge: fn(&Measure) -> f64| {
        measures
            .iter()
            .enumerate()
            .map(|(i, m)| (i, (edge(&score.measures()[*m]) - x).abs()))
            .filter(|(_, dx)| *dx <= max_dx)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    };
    if let Some(i) = nearest(Measure::right_x) {
        return Closing::Measure(measures[i]);
    }
    match nearest(Measure::left_x) {
        Some(0) => Closing::SystemStart,
        Some(i) => Closing::Measure(measures[i - 1]),
        None => Closing::Stray,
    }
}

/// Decode the barline of each measure of the system, reporting unmapped
/// signatures
pub fn resolve_barlines(score: &mut Score, system: SystemId, tables: &SignatureTables) {
    let mut unmapped = Vec::new();
    for part in &score.systems()[system].parts {
        let part = &score.parts()[*part];
        let Some(reference) = part.staves.first().map(|s| &score.staves()[*s]) else {
            continue;
        };
        for measure in &part.measures {
            let Some(barline) = score.measures()[*measure].barline() else {
                continue;
            };
            if barline.is_empty() {
                continue;
            }
            if barline.shape(&score.glyphs, reference, tables).is_none() {
                let signature = barline.signature(&score.glyphs, reference).to_string();
                unmapped.push((*measure, barline.glyphs().first().copied(), signature));
            }
        }
    }
    for (measure, glyph, signature) in unmapped {
        score.diagnostics.add_error(
            DiagnosticCategory::Signature,
            glyph,
            format!("no barline shape for signature '{}' in {}", signature, measure),
        );
    }
}
