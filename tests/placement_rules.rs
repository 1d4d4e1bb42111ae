//! Integration tests for notation and direction placement

use omr_score::diagnostics::DiagnosticCategory;
use omr_score::geometry::Rect;
use omr_score::score::{ChordId, DirectionKind, EntityKind, NotationKind, SystemId};
use omr_score::{Assembler, Glyph, GlyphId, Scale, Score, ScoreConfig, Shape, SignatureTables};
use pretty_assertions::assert_eq;

/// One part, one staff (top 100, interline 20), measures [0, 200] and
/// [200, 400]
fn one_staff() -> (Score, SystemId) {
    let mut score = Score::new();
    let page = score.add_page(Scale::new(20.0));
    let system = score.add_system(page);
    let part = score.add_part(system);
    score.add_staff(part, 0.0, 100.0, 400.0);
    score.add_measure(part, 0.0, 200.0);
    score.add_measure(part, 200.0, 400.0);
    (score, system)
}

/// Stem up at x 61 from y 60 to 130, head centered at y 130
fn add_quarter(score: &mut Score) -> Vec<GlyphId> {
    let stem = score
        .glyphs
        .insert(Glyph::new(Shape::Stem, Rect::new(60.0, 60.0, 2.0, 70.0)));
    let head = score.glyphs.insert(
        Glyph::new(Shape::NoteheadBlack, Rect::new(40.0, 120.0, 21.0, 20.0)).with_stem(stem),
    );
    vec![stem, head]
}

fn run(score: &mut Score, system: SystemId, glyphs: &[GlyphId]) {
    let config = ScoreConfig::default();
    let tables = SignatureTables::standard();
    Assembler::new(&config, &tables)
        .populate_system(score, system, glyphs)
        .expect("Should assemble");
}

/// Articulation centered at (50, y), below the head of the quarter
fn articulation_at(y: f64) -> (Score, GlyphId) {
    let (mut score, system) = one_staff();
    let mut glyphs = add_quarter(&mut score);
    let mark = score
        .glyphs
        .insert(Glyph::new(Shape::Staccato, Rect::new(45.0, y - 5.0, 10.0, 10.0)));
    glyphs.push(mark);
    run(&mut score, system, &glyphs);
    (score, mark)
}

#[test]
fn test_articulation_at_four_interlines_is_accepted() {
    for y in [209.0, 210.0] {
        let (score, mark) = articulation_at(y);
        assert_eq!(score.entities().len(), 1, "at y {}", y);
        let entity = &score.entities()[omr_score::score::EntityId(0)];
        assert_eq!(entity.kind(), EntityKind::Notation(NotationKind::Articulation));
        assert_eq!(entity.chord(), Some(ChordId(0)));
        assert_eq!(score.chords()[ChordId(0)].entities(), &[entity.id()]);
        assert_eq!(score.glyphs.get(mark).and_then(|g| g.shape()), Some(Shape::Staccato));
        assert!(score.diagnostics.is_empty());
    }
}

#[test]
fn test_articulation_beyond_four_interlines_is_cleared() {
    let (score, mark) = articulation_at(211.0);
    assert_eq!(score.entities().len(), 0);
    assert_eq!(score.glyphs.get(mark).and_then(|g| g.shape()), None);
    assert_eq!(
        score
            .diagnostics
            .of_category(DiagnosticCategory::Unattached)
            .count(),
        1
    );
}

#[test]
fn test_repopulate_after_cleared_articulation_keeps_the_rest() {
    let (mut score, system) = one_staff();
    let mut glyphs = add_quarter(&mut score);
    let staccato = score
        .glyphs
        .insert(Glyph::new(Shape::Staccato, Rect::new(45.0, 245.0, 10.0, 10.0)));
    let fermata = score
        .glyphs
        .insert(Glyph::new(Shape::Fermata, Rect::new(40.0, 50.0, 20.0, 14.0)));
    glyphs.extend([staccato, fermata]);
    run(&mut score, system, &glyphs);
    assert_eq!(score.glyphs.get(staccato).and_then(|g| g.shape()), None);
    assert_eq!(score.entities().len(), 1);

    score.clear_assembly();
    run(&mut score, system, &glyphs);

    assert_eq!(score.entities().len(), 1);
    let entity = &score.entities()[omr_score::score::EntityId(0)];
    assert_eq!(entity.kind(), EntityKind::Notation(NotationKind::Fermata));
    assert_eq!(entity.chord(), Some(ChordId(0)));
    assert!(score.diagnostics.is_empty());
}

#[test]
fn test_articulation_threshold_is_configurable() {
    let (mut score, system) = one_staff();
    let mut glyphs = add_quarter(&mut score);
    glyphs.push(
        score
            .glyphs
            .insert(Glyph::new(Shape::Accent, Rect::new(45.0, 225.0, 10.0, 10.0))),
    );
    let config = ScoreConfig::default().with_articulation_max_dy(omr_score::Fraction(5.0));
    let tables = SignatureTables::standard();
    Assembler::new(&config, &tables)
        .populate_system(&mut score, system, &glyphs)
        .unwrap();
    assert_eq!(score.entities().len(), 1);
}

#[test]
fn test_fermata_orientation_symmetry() {
    let (mut score, system) = one_staff();
    let mut glyphs = add_quarter(&mut score);
    let above = score
        .glyphs
        .insert(Glyph::new(Shape::Fermata, Rect::new(40.0, 50.0, 20.0, 14.0)));
    let below = score
        .glyphs
        .insert(Glyph::new(Shape::FermataBelow, Rect::new(40.0, 200.0, 20.0, 14.0)));
    glyphs.extend([above, below]);
    run(&mut score, system, &glyphs);

    let hosts: Vec<Option<ChordId>> = score.entities().iter().map(|e| e.chord()).collect();
    assert_eq!(hosts, vec![Some(ChordId(0)), Some(ChordId(0))]);
    assert!(score
        .entities()
        .iter()
        .all(|e| e.kind() == EntityKind::Notation(NotationKind::Fermata)));
    assert!(score.diagnostics.is_empty());
}

#[test]
fn test_upright_fermata_below_its_chord_is_unattached() {
    let (mut score, system) = one_staff();
    let mut glyphs = add_quarter(&mut score);
    glyphs.push(
        score
            .glyphs
            .insert(Glyph::new(Shape::Fermata, Rect::new(40.0, 200.0, 20.0, 14.0))),
    );
    run(&mut score, system, &glyphs);

    assert_eq!(score.entities().len(), 0);
    let messages: Vec<&str> = score
        .diagnostics
        .entries()
        .iter()
        .map(|d| d.message.as_str())
        .collect();
    assert_eq!(messages, vec!["no chord found for FERMATA"]);
}

#[test]
fn test_arpeggiato_spans_chords_of_both_staves() {
    let mut score = Score::new();
    let page = score.add_page(Scale::new(20.0));
    let system = score.add_system(page);
    let part = score.add_part(system);
    score.add_staff(part, 0.0, 100.0, 400.0);
    score.add_staff(part, 0.0, 300.0, 400.0);
    score.add_measure(part, 0.0, 400.0);

    let mut glyphs = add_quarter(&mut score);
    // stem down on the lower staff, within the slot of the upper stem
    let stem = score
        .glyphs
        .insert(Glyph::new(Shape::Stem, Rect::new(64.0, 330.0, 2.0, 70.0)));
    let head = score.glyphs.insert(
        Glyph::new(Shape::NoteheadBlack, Rect::new(64.0, 330.0, 21.0, 20.0)).with_stem(stem),
    );
    let arpeggio = score
        .glyphs
        .insert(Glyph::new(Shape::Arpeggiato, Rect::new(20.0, 60.0, 10.0, 340.0)));
    glyphs.extend([stem, head, arpeggio]);
    run(&mut score, system, &glyphs);

    assert_eq!(score.slots().len(), 1);
    assert_eq!(score.entities().len(), 1);
    let entity = &score.entities()[omr_score::score::EntityId(0)];
    assert_eq!(entity.chord(), Some(ChordId(0)));
    assert_eq!(score.chords()[ChordId(1)].notation_links(), &[entity.id()]);
    assert_eq!(score.chords()[ChordId(1)].stem_dir(), 1);
}

#[test]
fn test_wedge_spanning_two_measures() {
    let (mut score, system) = one_staff();
    let wedge = score
        .glyphs
        .insert(Glyph::new(Shape::Crescendo, Rect::new(150.0, 200.0, 100.0, 20.0)));
    run(&mut score, system, &[wedge]);

    let entities: Vec<_> = score
        .entities()
        .iter()
        .map(|e| (e.kind(), e.measure().0, e.is_start()))
        .collect();
    let kind = EntityKind::Direction(DirectionKind::Wedge);
    assert_eq!(entities, vec![(kind, 0, true), (kind, 1, false)]);
    // no chord around: both ends are kept but flagged
    assert_eq!(
        score
            .diagnostics
            .of_category(DiagnosticCategory::Context)
            .count(),
        2
    );
}

#[test]
fn test_pedal_up_mark_stops() {
    let (mut score, system) = one_staff();
    let mut glyphs = add_quarter(&mut score);
    let pedal = score
        .glyphs
        .insert(Glyph::new(Shape::PedalUpMark, Rect::new(45.0, 220.0, 20.0, 20.0)));
    glyphs.push(pedal);
    run(&mut score, system, &glyphs);

    let entity = &score.entities()[omr_score::score::EntityId(0)];
    assert_eq!(entity.kind(), EntityKind::Direction(DirectionKind::Pedal));
    assert!(!entity.is_start());
    assert_eq!(entity.chord(), Some(ChordId(0)));
}

#[test]
fn test_translation_links_point_to_the_chord_head() {
    let (mut score, system) = one_staff();
    let glyphs = add_quarter(&mut score);
    run(&mut score, system, &glyphs);

    let links = score.translation_links(glyphs[1]);
    assert_eq!(links.len(), 1);
    let (from, to) = links[0];
    assert_eq!((from.x, from.y), (50.5, 130.0));
    assert_eq!((to.x, to.y), (61.0, 130.0));
}
