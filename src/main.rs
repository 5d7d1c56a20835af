// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use tracing::{info, Level};

use ensemble::config::{validate_config, EnsembleConfig, OctaveSetting, PartConfig};
use ensemble::midi::{self, shared, LogSink, MidiSink, SharedSink};
use ensemble::scores::{self, Score};
use ensemble::sequencer::{Ensemble, Instrument};
use ensemble::timing::Meter;

fn print_usage() {
    println!("ENSEMBLE - multi-part note sequencer");
    println!();
    println!("Usage: ensemble [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --list-midi             List available MIDI destinations (outputs)");
    println!("  --test-note [N]         Play four test tones on MIDI destination N");
    println!("  --play <SCORE>          Play a built-in score (lost-woods)");
    println!("  --config <PATH>         Load ensemble settings from a .toml or .yaml file");
    println!("  --dry-run               Log note events instead of sending MIDI");
    println!("  --log-level <LEVEL>     error, warn, info, debug or trace");
    println!("  --help                  Show this help message");
}

enum Command {
    ListMidi,
    TestNote(Option<usize>),
    Play(Score),
    Help,
}

struct Options {
    command: Option<Command>,
    config: Option<PathBuf>,
    dry_run: bool,
    log_level: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options {
        command: None,
        config: None,
        dry_run: false,
        log_level: None,
    };

    let mut args = args.iter().peekable();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--list-midi" => options.command = Some(Command::ListMidi),
            "--test-note" => {
                let destination = match args.peek() {
                    Some(next) if !next.starts_with("--") => {
                        let n = next
                            .parse()
                            .map_err(|_| anyhow!("Invalid destination number: {}", next))?;
                        args.next();
                        Some(n)
                    }
                    _ => None,
                };
                options.command = Some(Command::TestNote(destination));
            }
            "--play" => {
                let name = args
                    .next()
                    .ok_or_else(|| anyhow!("--play requires a score name"))?;
                let score = Score::parse(name).ok_or_else(|| {
                    let known: Vec<&str> = Score::ALL.iter().map(|s| s.name()).collect();
                    anyhow!("Unknown score '{}' (available: {})", name, known.join(", "))
                })?;
                options.command = Some(Command::Play(score));
            }
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config = Some(PathBuf::from(path));
            }
            "--dry-run" => options.dry_run = true,
            "--log-level" => {
                let level = args
                    .next()
                    .ok_or_else(|| anyhow!("--log-level requires a level"))?;
                options.log_level = Some(level.clone());
            }
            "--help" | "-h" => options.command = Some(Command::Help),
            other => bail!("Unknown option: {}", other),
        }
    }

    Ok(options)
}

fn load_config(options: &Options) -> Result<EnsembleConfig> {
    let mut config = match &options.config {
        Some(path) => EnsembleConfig::load(path)?,
        None => EnsembleConfig::default(),
    };

    if options.dry_run {
        config.output.dry_run = true;
    }
    if let Some(level) = &options.log_level {
        config.log_level = level.clone();
    }

    let errors = validate_config(&config);
    if !errors.is_empty() {
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(config)
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn open_sink(config: &EnsembleConfig, part: &PartConfig) -> Result<SharedSink> {
    if config.output.dry_run {
        return Ok(shared(LogSink::new(part.name.clone())));
    }

    let output = midi::open_output(config.output.destination, config.output.name.as_deref())
        .with_context(|| format!("Failed to open MIDI output for part '{}'", part.name))?;
    // Config channels are 1-16, the wire uses 0-15
    let channel = part.channel_or(&config.output).saturating_sub(1);
    Ok(shared(MidiSink::new(output, channel)))
}

fn build_ensemble(config: &EnsembleConfig) -> Result<Ensemble> {
    let mut ensemble = Ensemble::new();
    for part in &config.parts {
        let instrument = Instrument::new(part.name.clone(), part.home_key()?, open_sink(config, part)?)
            .with_velocity(config.velocity);
        ensemble.push(instrument);
    }
    Ok(ensemble)
}

fn play_score(config: &EnsembleConfig, score: Score) -> Result<()> {
    let meter = Meter::new(config.tempo)?;
    let mut ensemble = build_ensemble(config)?;

    score
        .arrange(&meter, &mut ensemble)
        .with_context(|| format!("Failed to arrange '{}'", score))?;

    info!(
        score = %score,
        tempo = meter.bpm(),
        parts = ensemble.len(),
        length = ?ensemble.duration(),
        "playing"
    );
    ensemble.play()?;

    println!("Finished '{}'", score);
    Ok(())
}

fn play_test_note(config: &EnsembleConfig, destination: Option<usize>) -> Result<()> {
    let mut config = config.clone();
    if let Some(destination) = destination {
        config.output.destination = destination;
        config.output.name = None;
    }

    let part = PartConfig::new("test", "C", OctaveSetting::Index(0));
    let mut instrument = Instrument::new("test", 0, open_sink(&config, &part)?)
        .with_velocity(config.velocity);
    scores::test_tones(&mut instrument)?;

    println!("Playing {} test tones...", instrument.sequence().len());
    instrument.play()?;
    println!("Test complete!");
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("ENSEMBLE - multi-part note sequencer");
        println!("Run with --help for usage information");
        return Ok(());
    }

    let options = parse_args(&args[1..])?;

    let command = match options.command {
        Some(Command::Help) | None => {
            print_usage();
            return Ok(());
        }
        Some(Command::ListMidi) => {
            midi::print_destinations();
            return Ok(());
        }
        Some(ref command) => command,
    };

    let config = load_config(&options)?;
    init_logging(config.level()?);

    match command {
        Command::TestNote(destination) => play_test_note(&config, *destination),
        Command::Play(score) => play_score(&config, *score),
        Command::ListMidi | Command::Help => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_test_note_without_destination() {
        let options = parse_args(&args(&["--test-note"])).unwrap();
        assert!(matches!(options.command, Some(Command::TestNote(None))));

        // A following flag is not taken as the destination
        let options = parse_args(&args(&["--test-note", "--dry-run"])).unwrap();
        assert!(matches!(options.command, Some(Command::TestNote(None))));
        assert!(options.dry_run);
    }

    #[test]
    fn test_test_note_with_destination() {
        let options = parse_args(&args(&["--test-note", "3", "--log-level", "debug"])).unwrap();
        assert!(matches!(options.command, Some(Command::TestNote(Some(3)))));
        assert_eq!(options.log_level.as_deref(), Some("debug"));

        assert!(parse_args(&args(&["--test-note", "two"])).is_err());
    }

    #[test]
    fn test_play_and_config() {
        let options =
            parse_args(&args(&["--config", "band.toml", "--play", "lost-woods"])).unwrap();
        assert!(matches!(options.command, Some(Command::Play(Score::LostWoods))));
        assert_eq!(options.config, Some(PathBuf::from("band.toml")));

        assert!(parse_args(&args(&["--play", "zeldas-lullaby"])).is_err());
        assert!(parse_args(&args(&["--play"])).is_err());
        assert!(parse_args(&args(&["--config"])).is_err());
    }

    #[test]
    fn test_unknown_option() {
        let err = parse_args(&args(&["--loud"])).err().unwrap();
        assert_eq!(err.to_string(), "Unknown option: --loud");
    }
}
