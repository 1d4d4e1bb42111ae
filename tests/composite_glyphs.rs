//! Integration tests for glyphs that compose or decompose into entities:
//! barlines, beam packs and dynamics

use omr_score::diagnostics::DiagnosticCategory;
use omr_score::geometry::Rect;
use omr_score::glyph::Translation;
use omr_score::score::{BeamItemId, ChordId, MeasureId, StaffId, SystemId};
use omr_score::{Assembler, Glyph, GlyphId, Scale, Score, ScoreConfig, Shape, SignatureTables};
use pretty_assertions::assert_eq;

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

fn insert(score: &mut Score, shape: Shape, x: f64, y: f64, width: f64, height: f64) -> GlyphId {
    score.glyphs.insert(Glyph::new(shape, Rect::new(x, y, width, height)))
}

fn run(score: &mut Score, system: SystemId, glyphs: &[GlyphId]) {
    let config = ScoreConfig::default();
    let tables = SignatureTables::standard();
    Assembler::new(&config, &tables)
        .populate_system(score, system, glyphs)
        .expect("Should assemble");
}

fn barline_shape(score: &Score, measure: MeasureId) -> Option<Shape> {
    let tables = SignatureTables::standard();
    score.measures()[measure]
        .barline()
        .and_then(|b| b.shape(&score.glyphs, &score.staves()[StaffId(0)], &tables))
}

// ── Barlines ──────────────────────────────────────────────────────

#[test]
fn test_thin_then_thick_is_final_barline() {
    let (mut score, system) = one_staff();
    let thick = insert(&mut score, Shape::ThickBarline, 194.0, 100.0, 6.0, 80.0);
    let thin = insert(&mut score, Shape::ThinBarline, 190.0, 100.0, 2.0, 80.0);
    run(&mut score, system, &[thick, thin]);

    assert_eq!(barline_shape(&score, MeasureId(0)), Some(Shape::FinalBarline));
    assert!(score.measures()[MeasureId(1)].barline().is_none());
    assert_eq!(
        score.glyphs.get(thin).map(|g| g.translations().to_vec()),
        Some(vec![Translation::Barline(MeasureId(0))])
    );
    assert!(score.diagnostics.is_empty());
}

#[test]
fn test_opening_bar_does_not_join_the_closing_one() {
    let (mut score, system) = one_staff();
    let glyphs = vec![
        insert(&mut score, Shape::ThinBarline, 197.0, 100.0, 2.0, 80.0),
        insert(&mut score, Shape::ThinBarline, -1.0, 100.0, 2.0, 80.0),
    ];
    run(&mut score, system, &glyphs);

    assert_eq!(barline_shape(&score, MeasureId(0)), Some(Shape::ThinBarline));
    assert_eq!(
        score.measures()[MeasureId(0)]
            .barline()
            .map(|b| b.signature(&score.glyphs, &score.staves()[StaffId(0)]).to_string()),
        Some("N".to_string())
    );
    assert!(!score.glyphs.get(glyphs[1]).unwrap().is_translated());
    assert!(score.diagnostics.is_empty());
}

#[test]
fn test_dot_set_far_from_any_bar_is_ignored() {
    let (mut score, system) = one_staff();
    let glyphs = vec![
        insert(&mut score, Shape::ThinBarline, 197.0, 100.0, 2.0, 80.0),
        insert(&mut score, Shape::DotSet, 97.0, 125.0, 6.0, 6.0),
    ];
    run(&mut score, system, &glyphs);

    let barline = score.measures()[MeasureId(0)].barline().unwrap();
    assert_eq!(barline.glyphs(), &glyphs[..1]);
    assert_eq!(barline.signature(&score.glyphs, &score.staves()[StaffId(0)]), "N");
    assert_eq!(barline_shape(&score, MeasureId(0)), Some(Shape::ThinBarline));
    assert!(score.diagnostics.is_empty());
}

#[test]
fn test_stroke_off_every_measure_edge_is_reported() {
    let (mut score, system) = one_staff();
    let stroke = insert(&mut score, Shape::ThinBarline, 99.0, 100.0, 2.0, 80.0);
    run(&mut score, system, &[stroke]);

    assert!(score.measures().iter().all(|m| m.barline().is_none()));
    let messages: Vec<String> = score
        .diagnostics
        .of_category(DiagnosticCategory::Unattached)
        .map(|d| d.message.clone())
        .collect();
    assert_eq!(messages, vec!["barline at 100.0 is off every measure edge of P#0"]);
}

#[test]
fn test_component_on_a_left_edge_closes_the_preceding_measure() {
    let mut score = Score::new();
    let page = score.add_page(Scale::new(20.0));
    let system = score.add_system(page);
    let part = score.add_part(system);
    score.add_staff(part, 0.0, 100.0, 400.0);
    score.add_measure(part, 0.0, 150.0);
    score.add_measure(part, 200.0, 400.0);
    let thin = insert(&mut score, Shape::ThinBarline, 199.0, 100.0, 2.0, 80.0);
    run(&mut score, system, &[thin]);

    assert_eq!(barline_shape(&score, MeasureId(0)), Some(Shape::ThinBarline));
    assert!(score.measures()[MeasureId(1)].barline().is_none());
}

#[test]
fn test_repeat_dots_collapse_into_one_code() {
    let (mut score, system) = one_staff();
    let glyphs = vec![
        insert(&mut score, Shape::RepeatDot, 180.0, 125.0, 6.0, 6.0),
        insert(&mut score, Shape::RepeatDot, 180.0, 145.0, 6.0, 6.0),
        insert(&mut score, Shape::ThinBarline, 190.0, 100.0, 2.0, 80.0),
        insert(&mut score, Shape::ThickBarline, 194.0, 100.0, 6.0, 80.0),
        // far above the staff: not part of any barline
        insert(&mut score, Shape::RepeatDot, 180.0, 40.0, 6.0, 6.0),
    ];
    run(&mut score, system, &glyphs);

    let barline = score.measures()[MeasureId(0)].barline().unwrap();
    assert_eq!(barline.glyphs().len(), 4);
    assert_eq!(
        barline.signature(&score.glyphs, &score.staves()[StaffId(0)]),
        "ONK"
    );
    assert_eq!(barline_shape(&score, MeasureId(0)), Some(Shape::RightRepeatSign));
    assert!(!score.glyphs.get(glyphs[4]).unwrap().is_translated());
}

#[test]
fn test_unmapped_barline_is_reported_then_forced() {
    let (mut score, system) = one_staff();
    let glyphs = vec![
        insert(&mut score, Shape::ThickBarline, 186.0, 100.0, 6.0, 80.0),
        insert(&mut score, Shape::ThickBarline, 194.0, 100.0, 6.0, 80.0),
    ];
    run(&mut score, system, &glyphs);

    assert_eq!(barline_shape(&score, MeasureId(0)), None);
    let messages: Vec<String> = score
        .diagnostics
        .of_category(DiagnosticCategory::Signature)
        .map(|d| d.message.clone())
        .collect();
    assert_eq!(messages, vec!["no barline shape for signature 'K' in M#0"]);

    score
        .force_barline_shape(MeasureId(0), Shape::ThickBarline)
        .unwrap();
    assert_eq!(barline_shape(&score, MeasureId(0)), Some(Shape::ThickBarline));
    assert!(score
        .force_barline_shape(MeasureId(1), Shape::ThinBarline)
        .is_err());
}

// ── Beams ─────────────────────────────────────────────────────────

#[test]
fn test_beam_pack_of_three_gives_three_items() {
    let (mut score, system) = one_staff();
    let pack = insert(&mut score, Shape::Beam3, 60.0, 40.0, 80.0, 30.0);
    run(&mut score, system, &[pack]);

    let items: Vec<_> = score
        .beam_items()
        .iter()
        .map(|i| (i.glyph(), i.pack_card(), i.pack_index(), i.left().y))
        .collect();
    assert_eq!(
        items,
        vec![
            (pack, 3, 0, 43.0),
            (pack, 3, 1, 55.0),
            (pack, 3, 2, 67.0),
        ]
    );
    assert!(score.beam_items().iter().all(|i| i.left().x == 60.0 && i.right().x == 140.0));
    let translations = score.glyphs.get(pack).unwrap().translations().to_vec();
    assert_eq!(
        translations,
        vec![
            Translation::BeamItem(BeamItemId(0)),
            Translation::BeamItem(BeamItemId(1)),
            Translation::BeamItem(BeamItemId(2)),
        ]
    );
}

#[test]
fn test_adjacent_beam_glyphs_join_and_link_stems() {
    let (mut score, system) = one_staff();
    let mut glyphs = Vec::new();
    for (stem_x, head_x) in [(60.0, 40.0), (121.0, 101.0)] {
        let stem = insert(&mut score, Shape::Stem, stem_x, 60.0, 2.0, 70.0);
        let head = score.glyphs.insert(
            Glyph::new(Shape::NoteheadBlack, Rect::new(head_x, 120.0, 21.0, 20.0)).with_stem(stem),
        );
        glyphs.extend([stem, head]);
    }
    glyphs.push(insert(&mut score, Shape::Beam, 60.0, 56.0, 30.0, 8.0));
    glyphs.push(insert(&mut score, Shape::Beam, 92.0, 56.0, 31.0, 8.0));
    run(&mut score, system, &glyphs);

    assert_eq!(score.slots().len(), 2);
    assert_eq!(score.beams().len(), 1);
    let beam = score.beams().iter().next().unwrap();
    assert_eq!(beam.items(), &[BeamItemId(0), BeamItemId(1)]);
    assert_eq!(beam.chords(), &[ChordId(0), ChordId(1)]);
}

// ── Dynamics ──────────────────────────────────────────────────────

#[test]
fn test_adjacent_forte_letters_merge_into_fortissimo() {
    let (mut score, system) = one_staff();
    let glyphs = vec![
        insert(&mut score, Shape::DynamicsF, 100.0, 200.0, 12.0, 14.0),
        insert(&mut score, Shape::DynamicsF, 114.0, 200.0, 12.0, 14.0),
    ];
    run(&mut score, system, &glyphs);

    let tables = SignatureTables::standard();
    assert_eq!(score.entities().len(), 1);
    let entity = score.entities().iter().next().unwrap();
    assert_eq!(entity.signature(&score.glyphs), "ff");
    assert_eq!(entity.shape(&score.glyphs, &tables), Some(Shape::DynamicsFf));
    assert_eq!(entity.glyphs(), &glyphs[..]);
}

#[test]
fn test_forte_letters_merge_at_the_exact_thresholds() {
    // gap of 1.5 interlines, then ordinate difference of 0.5 interline
    for (x, y) in [(142.0, 200.0), (114.0, 210.0)] {
        let (mut score, system) = one_staff();
        let glyphs = vec![
            insert(&mut score, Shape::DynamicsF, 100.0, 200.0, 12.0, 14.0),
            insert(&mut score, Shape::DynamicsF, x, y, 12.0, 14.0),
        ];
        run(&mut score, system, &glyphs);

        let tables = SignatureTables::standard();
        assert_eq!(score.entities().len(), 1, "at ({}, {})", x, y);
        let entity = score.entities().iter().next().unwrap();
        assert_eq!(entity.shape(&score.glyphs, &tables), Some(Shape::DynamicsFf));
    }
}

#[test]
fn test_distant_forte_letters_stay_apart() {
    for (x, y) in [(150.0, 200.0), (114.0, 215.0)] {
        let (mut score, system) = one_staff();
        let glyphs = vec![
            insert(&mut score, Shape::DynamicsF, 100.0, 200.0, 12.0, 14.0),
            insert(&mut score, Shape::DynamicsF, x, y, 12.0, 14.0),
        ];
        run(&mut score, system, &glyphs);

        let tables = SignatureTables::standard();
        let shapes: Vec<_> = score
            .entities()
            .iter()
            .map(|e| e.shape(&score.glyphs, &tables))
            .collect();
        assert_eq!(shapes, vec![Some(Shape::DynamicsF), Some(Shape::DynamicsF)]);
    }
}

#[test]
fn test_dynamics_signature_follows_abscissa_not_arrival() {
    let (mut score, system) = one_staff();
    let stem = insert(&mut score, Shape::Stem, 60.0, 60.0, 2.0, 70.0);
    let head = score.glyphs.insert(
        Glyph::new(Shape::NoteheadBlack, Rect::new(40.0, 120.0, 21.0, 20.0)).with_stem(stem),
    );
    let f = insert(&mut score, Shape::DynamicsF, 116.0, 200.0, 12.0, 14.0);
    let m = insert(&mut score, Shape::DynamicsCharM, 100.0, 200.0, 14.0, 14.0);
    run(&mut score, system, &[stem, head, f, m]);

    let tables = SignatureTables::standard();
    let entity = score.entities().iter().next().unwrap();
    assert_eq!(entity.signature(&score.glyphs), "mf");
    let shape = entity.shape(&score.glyphs, &tables);
    assert_eq!(shape, Some(Shape::DynamicsMf));
    assert_eq!(shape.and_then(|s| tables.sound_level(s)), Some(89));
    assert_eq!(entity.chord(), Some(ChordId(0)));
    assert!(score.diagnostics.is_empty());
}

#[test]
fn test_unknown_dynamics_signature_is_reported() {
    let (mut score, system) = one_staff();
    let glyphs = vec![
        insert(&mut score, Shape::DynamicsCharZ, 100.0, 200.0, 12.0, 14.0),
        insert(&mut score, Shape::DynamicsCharZ, 114.0, 200.0, 12.0, 14.0),
    ];
    run(&mut score, system, &glyphs);

    let messages: Vec<String> = score
        .diagnostics
        .of_category(DiagnosticCategory::Signature)
        .map(|d| d.message.clone())
        .collect();
    assert_eq!(messages, vec!["no dynamics shape for signature 'zz' of E#0"]);
}
