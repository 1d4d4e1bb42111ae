//! TOML page description loaded into a [`Score`]
//!
//! A fixture stands in for the upstream recognition stages: it gives the
//! staff grid, the measure boundaries and the classified glyphs of each
//! system.
//!
//! ```toml
//! [[pages]]
//! interline = 20.0
//!
//! [[pages.systems]]
//! parts = [{ staves = [{ left = 0.0, top = 100.0, width = 400.0 }], barlines = [0.0, 200.0, 400.0] }]
//!
//! [[pages.systems.glyphs]]
//! name = "s1"
//! shape = "STEM"
//! bounds = [60.0, 60.0, 2.0, 70.0]
//!
//! [[pages.systems.glyphs]]
//! shape = "NOTEHEAD_BLACK"
//! bounds = [40.0, 120.0, 21.0, 20.0]
//! stem = "s1"
//! ```

use std::collections::HashMap;
use std::path::Path;

use ariadne::{Color, Label, Report, ReportKind, Source};
use serde::Deserialize;
use thiserror::Error;

use crate::geometry::{Point, Rect};
use crate::glyph::{Glyph, GlyphId, Scale, Shape};
use crate::score::{Score, SystemId};

/// Errors that can occur when loading a fixture
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Failed to read fixture file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse fixture TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("glyph '{glyph}' refers to unknown stem '{stem}'")]
    UnknownStem { glyph: String, stem: String },
}

impl FixtureError {
    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let (FixtureError::ParseError(err), Some(span)) = (self, self.span()) else {
            return self.to_string();
        };
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message("invalid fixture")
            .with_label(
                Label::new((filename, span))
                    .with_message(err.message())
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }

    fn span(&self) -> Option<std::ops::Range<usize>> {
        match self {
            FixtureError::ParseError(err) => err.span(),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScoreFixture {
    #[serde(default)]
    pages: Vec<PageFixture>,
}

#[derive(Debug, Deserialize)]
struct PageFixture {
    #[serde(default = "default_interline")]
    interline: f64,
    #[serde(default)]
    systems: Vec<SystemFixture>,
}

fn default_interline() -> f64 {
    Scale::default().interline()
}

#[derive(Debug, Deserialize)]
struct SystemFixture {
    #[serde(default)]
    parts: Vec<PartFixture>,
    #[serde(default)]
    glyphs: Vec<GlyphFixture>,
}

#[derive(Debug, Deserialize)]
struct PartFixture {
    staves: Vec<StaffFixture>,
    /// Measure boundaries, left to right
    #[serde(default)]
    barlines: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct StaffFixture {
    left: f64,
    top: f64,
    width: f64,
}

#[derive(Debug, Deserialize)]
struct GlyphFixture {
    name: Option<String>,
    shape: Shape,
    /// x, y, width, height
    bounds: [f64; 4],
    slope: Option<f64>,
    stem: Option<String>,
    text: Option<String>,
    /// Curve end points: x1, y1, x2, y2
    ends: Option<[f64; 4]>,
}

/// A score grid with its glyphs, ready for assembly
#[derive(Debug)]
pub struct LoadedScore {
    pub score: Score,
    /// Glyphs of each system, in fixture order
    pub systems: Vec<(SystemId, Vec<GlyphId>)>,
}

impl LoadedScore {
    /// Load a fixture from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a fixture from a TOML string
    pub fn from_str(content: &str) -> Result<Self, FixtureError> {
        let fixture: ScoreFixture = toml::from_str(content)?;
        let mut score = Score::new();
        let mut systems = Vec::new();

        for page_fixture in &fixture.pages {
            let page = score.add_page(Scale::new(page_fixture.interline));
            for system_fixture in &page_fixture.systems {
                let system = score.add_system(page);
                for part_fixture in &system_fixture.parts {
                    build_part(&mut score, system, part_fixture);
                }
                let glyphs = insert_glyphs(&mut score, &system_fixture.glyphs)?;
                log::debug!("{} loaded with {} glyph(s)", system, glyphs.len());
                systems.push((system, glyphs));
            }
        }
        Ok(Self { score, systems })
    }
}

fn build_part(score: &mut Score, system: SystemId, fixture: &PartFixture) {
    let part = score.add_part(system);
    for staff in &fixture.staves {
        score.add_staff(part, staff.left, staff.top, staff.width);
    }
    let bounds: Vec<f64> = match (fixture.barlines.len(), fixture.staves.first()) {
        (0 | 1, Some(staff)) => vec![staff.left, staff.left + staff.width],
        _ => fixture.barlines.clone(),
    };
    for pair in bounds.windows(2) {
        score.add_measure(part, pair[0], pair[1]);
    }
}

/// Insert the glyphs of a system, resolving stem names to ids
fn insert_glyphs(score: &mut Score, fixtures: &[GlyphFixture]) -> Result<Vec<GlyphId>, FixtureError> {
    let base = score.glyphs.len();
    let names: HashMap<&str, GlyphId> = fixtures
        .iter()
        .enumerate()
        .filter_map(|(i, g)| g.name.as_deref().map(|name| (name, GlyphId(base + i))))
        .collect();

    let mut ids = Vec::with_capacity(fixtures.len());
    for (i, fixture) in fixtures.iter().enumerate() {
        let [x, y, width, height] = fixture.bounds;
        let mut glyph = Glyph::new(fixture.shape, Rect::new(x, y, width, height));
        if let Some(slope) = fixture.slope {
            glyph = glyph.with_slope(slope);
        }
        if let Some(stem) = &fixture.stem {
            let id = names
                .get(stem.as_str())
                .ok_or_else(|| FixtureError::UnknownStem {
                    glyph: fixture
                        .name
                        .clone()
                        .unwrap_or_else(|| format!("#{}", i)),
                    stem: stem.clone(),
                })?;
            glyph = glyph.with_stem(*id);
        }
        if let Some(text) = &fixture.text {
            glyph = glyph.with_text(text.as_str());
        }
        if let Some([x1, y1, x2, y2]) = fixture.ends {
            glyph = glyph.with_ends(Point::new(x1, y1), Point::new(x2, y2));
        }
        ids.push(score.glyphs.insert(glyph));
    }
    Ok(ids)
}
