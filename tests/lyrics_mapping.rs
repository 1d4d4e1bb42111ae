//! Integration tests for lyrics lines, syllable mapping and syllabic types

use omr_score::diagnostics::DiagnosticCategory;
use omr_score::geometry::Rect;
use omr_score::score::{ChordId, LyricsKind, PartId, Syllabic, SystemId};
use omr_score::{Assembler, Glyph, GlyphId, Scale, Score, ScoreConfig, Shape, SignatureTables};
use pretty_assertions::assert_eq;

/// Systems stacked on one page, each with one staff at `top + 300 * i`
fn systems(count: usize) -> (Score, Vec<SystemId>) {
    let mut score = Score::new();
    let page = score.add_page(Scale::new(20.0));
    let mut ids = Vec::new();
    for i in 0..count {
        let system = score.add_system(page);
        let part = score.add_part(system);
        score.add_staff(part, 0.0, 100.0 + 300.0 * i as f64, 400.0);
        score.add_measure(part, 0.0, 400.0);
        ids.push(system);
    }
    (score, ids)
}

fn text(score: &mut Score, content: &str, x: f64, y: f64) -> GlyphId {
    let width = 10.0 * content.chars().count() as f64;
    score
        .glyphs
        .insert(Glyph::new(Shape::Text, Rect::new(x, y, width, 20.0)).with_text(content))
}

fn syllables(score: &Score) -> Vec<(String, Option<Syllabic>)> {
    score
        .lyrics_items()
        .iter()
        .filter_map(|item| match item.kind() {
            LyricsKind::Syllable(s) => Some((s.clone(), item.syllabic())),
            _ => None,
        })
        .collect()
}

#[test]
fn test_hyphenated_word_on_one_line() {
    let (mut score, ids) = systems(1);
    let glyph = text(&mut score, "Ky - ri - e", 20.0, 220.0);
    let config = ScoreConfig::default();
    let tables = SignatureTables::standard();
    let assembler = Assembler::new(&config, &tables);
    assembler
        .assemble(&mut score, &[(ids[0], vec![glyph])])
        .unwrap();

    assert_eq!(score.lyrics_items().len(), 5);
    assert_eq!(score.lyrics_lines().len(), 1);
    assert_eq!(
        syllables(&score),
        vec![
            ("Ky".to_string(), Some(Syllabic::Begin)),
            ("ri".to_string(), Some(Syllabic::Middle)),
            ("e".to_string(), Some(Syllabic::End)),
        ]
    );
    // no notes to sing them on
    assert_eq!(
        score
            .diagnostics
            .of_category(DiagnosticCategory::Mapping)
            .count(),
        3
    );
}

#[test]
fn test_lone_syllable_is_single_and_mapped_to_note_above() {
    let (mut score, ids) = systems(1);
    let stem = score
        .glyphs
        .insert(Glyph::new(Shape::Stem, Rect::new(60.0, 60.0, 2.0, 70.0)));
    let head = score.glyphs.insert(
        Glyph::new(Shape::NoteheadBlack, Rect::new(40.0, 120.0, 21.0, 20.0)).with_stem(stem),
    );
    let amen = text(&mut score, "Amen", 30.0, 220.0);
    let config = ScoreConfig::default();
    let tables = SignatureTables::standard();
    Assembler::new(&config, &tables)
        .assemble(&mut score, &[(ids[0], vec![stem, head, amen])])
        .unwrap();

    let item = score.lyrics_items().iter().next().unwrap();
    assert_eq!(item.syllabic(), Some(Syllabic::Single));
    assert_eq!(item.chord(), Some(ChordId(0)));
    assert!(score.diagnostics.is_empty());
}

#[test]
fn test_word_continues_on_next_system() {
    let (mut score, ids) = systems(2);
    let first = text(&mut score, "Glo -", 300.0, 220.0);
    let second = text(&mut score, "ri - a", 20.0, 520.0);
    let config = ScoreConfig::default();
    let tables = SignatureTables::standard();
    Assembler::new(&config, &tables)
        .assemble(&mut score, &[(ids[0], vec![first]), (ids[1], vec![second])])
        .unwrap();

    assert_eq!(
        syllables(&score),
        vec![
            ("Glo".to_string(), Some(Syllabic::Begin)),
            ("ri".to_string(), Some(Syllabic::Middle)),
            ("a".to_string(), Some(Syllabic::End)),
        ]
    );
}

#[test]
fn test_word_continues_on_next_page() {
    let mut score = Score::new();
    let mut ids = Vec::new();
    for _ in 0..2 {
        let page = score.add_page(Scale::new(20.0));
        let system = score.add_system(page);
        let part = score.add_part(system);
        score.add_staff(part, 0.0, 100.0, 400.0);
        score.add_measure(part, 0.0, 400.0);
        ids.push(system);
    }
    let first = text(&mut score, "Glo -", 300.0, 220.0);
    let second = text(&mut score, "ri - a", 20.0, 220.0);
    let config = ScoreConfig::default();
    let tables = SignatureTables::standard();
    Assembler::new(&config, &tables)
        .assemble(&mut score, &[(ids[0], vec![first]), (ids[1], vec![second])])
        .unwrap();

    assert_ne!(score.systems()[ids[0]].page, score.systems()[ids[1]].page);
    assert_eq!(
        syllables(&score),
        vec![
            ("Glo".to_string(), Some(Syllabic::Begin)),
            ("ri".to_string(), Some(Syllabic::Middle)),
            ("a".to_string(), Some(Syllabic::End)),
        ]
    );
}

#[test]
fn test_verses_are_numbered_top_down() {
    let (mut score, ids) = systems(1);
    // second verse arrives first
    let lower = text(&mut score, "world", 20.0, 270.0);
    let upper = text(&mut score, "hello", 20.0, 220.0);
    let config = ScoreConfig::default();
    let tables = SignatureTables::standard();
    Assembler::new(&config, &tables)
        .assemble(&mut score, &[(ids[0], vec![lower, upper])])
        .unwrap();

    let lines = &score.parts()[PartId(0)].lyrics_lines;
    let numbered: Vec<(usize, String)> = lines
        .iter()
        .map(|l| {
            let line = &score.lyrics_lines()[*l];
            let first = line.first_item().unwrap();
            (line.number(), score.lyrics_items()[first].kind().to_string())
        })
        .collect();
    assert_eq!(
        numbered,
        vec![(1, "\"hello\"".to_string()), (2, "\"world\"".to_string())]
    );
}

#[test]
fn test_text_without_content_is_reported() {
    let (mut score, ids) = systems(1);
    let glyph = score
        .glyphs
        .insert(Glyph::new(Shape::Text, Rect::new(20.0, 220.0, 40.0, 20.0)));
    let config = ScoreConfig::default();
    let tables = SignatureTables::standard();
    Assembler::new(&config, &tables)
        .populate(&mut score, ids[0], glyph)
        .unwrap();

    assert!(score.lyrics_items().is_empty());
    assert_eq!(
        score.diagnostics.entries()[0].to_string(),
        "[mapping] G#0: text glyph without content"
    );
}
