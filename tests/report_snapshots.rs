//! End to end tests: fixture in, report out

use omr_score::{
    assemble, assemble_with_config, report, Assembler, LoadedScore, PipelineConfig,
    ScoreConfig, SignatureTables,
};
use pretty_assertions::assert_eq;

const ONE_MEASURE_OF_EVERYTHING: &str = r#"
[[pages]]
interline = 20.0

[[pages.systems]]
parts = [{ staves = [{ left = 0.0, top = 100.0, width = 400.0 }], barlines = [0.0, 200.0, 400.0] }]

[[pages.systems.glyphs]]
shape = "G_CLEF"
bounds = [5.0, 90.0, 30.0, 100.0]

[[pages.systems.glyphs]]
name = "s1"
shape = "STEM"
bounds = [60.0, 60.0, 2.0, 70.0]

[[pages.systems.glyphs]]
shape = "NOTEHEAD_BLACK"
bounds = [40.0, 120.0, 21.0, 20.0]
stem = "s1"

[[pages.systems.glyphs]]
shape = "STACCATO"
bounds = [45.0, 155.0, 10.0, 10.0]

[[pages.systems.glyphs]]
shape = "DYNAMICS_CHAR_M"
bounds = [100.0, 200.0, 14.0, 14.0]

[[pages.systems.glyphs]]
shape = "DYNAMICS_F"
bounds = [116.0, 200.0, 12.0, 14.0]

[[pages.systems.glyphs]]
shape = "THIN_BARLINE"
bounds = [199.0, 100.0, 2.0, 80.0]

[[pages.systems.glyphs]]
shape = "TEXT"
bounds = [30.0, 220.0, 40.0, 20.0]
text = "Ah"
"#;

#[test]
fn test_report_of_one_measure() {
    let report = assemble(ONE_MEASURE_OF_EVERYTHING).expect("Should assemble");
    insta::assert_snapshot!(report, @r###"
    system S#0 on Pg#0
      part P#0 number 1
        measure M#0 [0.0, 200.0]
          clef G_CLEF on St#0 at (20.0,140.0)
          slot Sl#0 x 61.0
            chord C#0 St#0 stem up [C5]
              articulation E#0 STACCATO
          dynamics E#1 'mf' DYNAMICS_MF sound 89 on C#0
          barline THIN_BARLINE 'N'
        measure M#1 [200.0, 400.0]
        lyrics line 1 LL#0 under St#0
          LI#0 "Ah" single on C#0
    "###);
}

#[test]
fn test_links_are_appended() {
    let config = PipelineConfig::new().with_links(true);
    let assembled = assemble_with_config(ONE_MEASURE_OF_EVERYTHING, &config).unwrap();
    assert!(assembled.score.diagnostics.is_empty());
    let links: Vec<&str> = assembled
        .report
        .lines()
        .filter(|l| l.starts_with("G#2 "))
        .collect();
    assert_eq!(links, vec!["G#2 (50.5,130.0) -> (61.0,130.0)"]);
}

#[test]
fn test_clear_and_repopulate_gives_the_same_report() {
    let LoadedScore { mut score, systems } =
        LoadedScore::from_str(ONE_MEASURE_OF_EVERYTHING).unwrap();
    let config = ScoreConfig::default();
    let tables = SignatureTables::standard();
    let assembler = Assembler::new(&config, &tables);

    assembler.assemble(&mut score, &systems).unwrap();
    let first = report::render(&score, &tables);

    score.clear_assembly();
    assert!(score.entities().is_empty());
    assert!(score.glyphs.iter().all(|g| !g.is_translated()));

    assembler.assemble(&mut score, &systems).unwrap();
    assert_eq!(report::render(&score, &tables), first);
}

#[test]
fn test_head_policy_moves_the_slot_to_the_heads() {
    let config = PipelineConfig::new()
        .with_score(ScoreConfig::default().with_slot_policy(omr_score::SlotPolicy::Head));
    let assembled = assemble_with_config(ONE_MEASURE_OF_EVERYTHING, &config).unwrap();
    assert!(assembled.report.contains("slot Sl#0 x 50.5\n"));
}
