//! Lyrics lines and their items

use std::fmt;

use crate::geometry::{Population, Rect};
use crate::glyph::GlyphId;

use super::{Arena, ChordId, LyricsItemId, LyricsLineId, PartId, StaffId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LyricsKind {
    Syllable(String),
    Hyphen,
    Extension,
    Elision,
}

impl LyricsKind {
    pub fn of_token(token: &str) -> Self {
        match token {
            "-" => LyricsKind::Hyphen,
            "_" => LyricsKind::Extension,
            "‿" => LyricsKind::Elision,
            _ => LyricsKind::Syllable(token.to_string()),
        }
    }

    pub fn is_hyphen(&self) -> bool {
        matches!(self, LyricsKind::Hyphen)
    }
}

impl fmt::Display for LyricsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LyricsKind::Syllable(text) => write!(f, "\"{}\"", text),
            LyricsKind::Hyphen => f.write_str("hyphen"),
            LyricsKind::Extension => f.write_str("extension"),
            LyricsKind::Elision => f.write_str("elision"),
        }
    }
}

/// Position of a syllable within its word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syllabic {
    Single,
    Begin,
    Middle,
    End,
}

impl Syllabic {
    /// Syllabic type given whether the neighbours are hyphens
    pub fn from_neighbours(hyphen_before: bool, hyphen_after: bool) -> Self {
        match (hyphen_before, hyphen_after) {
            (false, false) => Syllabic::Single,
            (false, true) => Syllabic::Begin,
            (true, true) => Syllabic::Middle,
            (true, false) => Syllabic::End,
        }
    }
}

impl fmt::Display for Syllabic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Syllabic::Single => f.write_str("single"),
            Syllabic::Begin => f.write_str("begin"),
            Syllabic::Middle => f.write_str("middle"),
            Syllabic::End => f.write_str("end"),
        }
    }
}

/// Split the text of a glyph into tokens, each with its share of the box
///
/// Tokens are whitespace separated. Every character, spaces included, gets
/// the same width.
pub fn split_text(text: &str, bounds: Rect) -> Vec<(LyricsKind, Rect)> {
    let total = text.chars().count();
    if total == 0 {
        return Vec::new();
    }
    let char_width = bounds.width / total as f64;
    let mut tokens = Vec::new();
    let mut start: Option<(usize, usize)> = None;
    for (pos, (byte, c)) in text.char_indices().enumerate() {
        if c.is_whitespace() {
            if let Some((first, from)) = start.take() {
                tokens.push((first, pos, &text[from..byte]));
            }
        } else if start.is_none() {
            start = Some((pos, byte));
        }
    }
    if let Some((first, from)) = start {
        tokens.push((first, total, &text[from..]));
    }

    tokens
        .into_iter()
        .map(|(first, end, token)| {
            let rect = Rect::new(
                bounds.x + first as f64 * char_width,
                bounds.y,
                (end - first) as f64 * char_width,
                bounds.height,
            );
            (LyricsKind::of_token(token), rect)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct LyricsItem {
    id: LyricsItemId,
    glyph: GlyphId,
    part: PartId,
    kind: LyricsKind,
    bounds: Rect,
    line: Option<LyricsLineId>,
    syllabic: Option<Syllabic>,
    chord: Option<ChordId>,
}

impl LyricsItem {
    pub(crate) fn new(
        id: LyricsItemId,
        glyph: GlyphId,
        part: PartId,
        kind: LyricsKind,
        bounds: Rect,
    ) -> Self {
        Self {
            id,
            glyph,
            part,
            kind,
            bounds,
            line: None,
            syllabic: None,
            chord: None,
        }
    }

    pub fn id(&self) -> LyricsItemId {
        self.id
    }

    pub fn glyph(&self) -> GlyphId {
        self.glyph
    }

    pub fn part(&self) -> PartId {
        self.part
    }

    pub fn kind(&self) -> &LyricsKind {
        &self.kind
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn line(&self) -> Option<LyricsLineId> {
        self.line
    }

    pub fn syllabic(&self) -> Option<Syllabic> {
        self.syllabic
    }

    /// Chord the syllable is sung on
    pub fn chord(&self) -> Option<ChordId> {
        self.chord
    }

    pub fn is_syllable(&self) -> bool {
        matches!(self.kind, LyricsKind::Syllable(_))
    }

    pub(crate) fn set_line(&mut self, line: LyricsLineId) {
        self.line = Some(line);
    }

    pub(crate) fn set_syllabic(&mut self, syllabic: Syllabic) {
        self.syllabic = Some(syllabic);
    }

    pub(crate) fn set_chord(&mut self, chord: ChordId) {
        self.chord = Some(chord);
    }
}

/// Items of a part sharing a common baseline
#[derive(Debug, Clone, PartialEq)]
pub struct LyricsLine {
    id: LyricsLineId,
    part: PartId,
    /// 1-based, from the top of the part
    number: usize,
    staff: Option<StaffId>,
    /// Ordered by abscissa
    items: Vec<LyricsItemId>,
    ordinates: Population,
}

impl LyricsLine {
    pub(crate) fn new(id: LyricsLineId, part: PartId) -> Self {
        Self {
            id,
            part,
            number: 0,
            staff: None,
            items: Vec::new(),
            ordinates: Population::new(),
        }
    }

    pub fn id(&self) -> LyricsLineId {
        self.id
    }

    pub fn part(&self) -> PartId {
        self.part
    }

    pub fn number(&self) -> usize {
        self.number
    }

    /// Staff right above the line
    pub fn staff(&self) -> Option<StaffId> {
        self.staff
    }

    pub fn items(&self) -> &[LyricsItemId] {
        &self.items
    }

    pub fn mean_y(&self) -> Option<f64> {
        self.ordinates.mean()
    }

    pub(crate) fn set_number(&mut self, number: usize) {
        self.number = number;
    }

    pub(crate) fn set_staff(&mut self, staff: StaffId) {
        self.staff = Some(staff);
    }

    pub(crate) fn add_item(&mut self, item: LyricsItemId, arena: &Arena<LyricsItemId, LyricsItem>) {
        self.ordinates.include(arena[item].bounds().center().y);
        self.items.push(item);
        self.items.sort_by(|a, b| {
            arena[*a]
                .bounds()
                .x
                .total_cmp(&arena[*b].bounds().x)
                .then(a.cmp(b))
        });
    }

    pub fn first_item(&self) -> Option<LyricsItemId> {
        self.items.first().copied()
    }

    pub fn last_item(&self) -> Option<LyricsItemId> {
        self.items.last().copied()
    }
}
