//! omr-score CLI
//!
//! Usage:
//!   omr-score [OPTIONS] FILE
//!
//! Options:
//!   -c, --config <FILE>  Assembly thresholds (TOML format)
//!   -l, --links          Append glyph to entity links
//!   -v, --verbose        Log assembly decisions to stderr
//!   -h, --help           Print help

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::{Level, Log, Metadata, Record};

use omr_score::{assemble_with_config, FixtureError, PipelineConfig, PipelineError, ScoreConfig};

#[derive(Parser)]
#[command(name = "omr-score")]
#[command(about = "Assemble classified music glyphs into score entities")]
struct Cli {
    /// Page description (TOML format)
    input: PathBuf,

    /// Assembly thresholds (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append glyph to entity links to the report
    #[arg(short, long)]
    links: bool,

    /// Log assembly decisions to stderr (twice for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct StderrLogger {
    level: Level,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn install_logger(verbose: u8) {
    let level = match verbose {
        0 => Level::Error,
        1 => Level::Debug,
        _ => Level::Trace,
    };
    let logger = Box::new(StderrLogger { level });
    if log::set_boxed_logger(logger).is_ok() {
        log::set_max_level(level.to_level_filter());
    }
}

fn main() {
    let cli = Cli::parse();
    install_logger(cli.verbose);

    let score_config = match &cli.config {
        Some(path) => match ScoreConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => ScoreConfig::default(),
    };

    let source = match fs::read_to_string(&cli.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", cli.input.display(), e);
            std::process::exit(1);
        }
    };

    let config = PipelineConfig::new()
        .with_score(score_config)
        .with_links(cli.links);
    match assemble_with_config(&source, &config) {
        Ok(assembled) => {
            print!("{}", assembled.report);
            let diagnostics = assembled.score.diagnostics.entries();
            if !diagnostics.is_empty() {
                println!("diagnostics:");
                for diagnostic in diagnostics {
                    println!("  {}", diagnostic);
                }
            }
        }
        Err(PipelineError::Fixture(e @ FixtureError::ParseError(_))) => {
            let filename = cli.input.display().to_string();
            eprint!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
