// Chordwalk melody generator: CLI entry point.
//
// Builds a generation request from an optional JSON config plus flags,
// generates one phrase, prints the chord names and a step summary, and
// writes the notes to a MIDI file. With `--json` the whole melody is printed
// as JSON instead and no file is written.
//
// Usage:
//   cargo run -p chordwalk_music -- [output.mid] [--config FILE] [--root NOTE]
//     [--scale SCALE] [--bars N] [--tempo BPM] [--time-sig N/D]
//     [--chords a,b,..] [--patterns a,b,..] [--root-inversion]
//     [--no-end-on-tonic] [--seed N] [--json] [--list]
//
// A bare pitch class for --root (e.g. "D") means octave 4.

use chordwalk_music::harmony::{ChordKind, ScaleKind};
use chordwalk_music::midi::write_midi;
use chordwalk_music::pattern::Pattern;
use chordwalk_music::{GenerationRequest, generate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("chordwalk_music=info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    if has_flag(args, "--list") {
        print_tables();
        return Ok(());
    }

    let output_path = args
        .get(1)
        .filter(|s| !s.starts_with("--"))
        .map(|s| s.as_str())
        .unwrap_or("melody.mid");
    let json = has_flag(args, "--json");

    let request = build_request(args)?;
    let seed: Option<u64> = parse_flag(args, "--seed")?;
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };
    tracing::info!(?seed, "generating melody");

    let melody = generate(&request, &mut rng)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&melody)?);
        return Ok(());
    }

    println!("=== Chordwalk Melody Generator ===");
    println!("Root: {}  Scale: {}", request.root, request.scale);
    println!(
        "Length: {} bars of {}/{} at {} BPM",
        request.num_bars, request.beats_per_bar, request.note_value, request.beats_per_minute
    );
    println!("Chord types: {}", request.chord_types.join(", "));
    println!("Patterns: {}", request.patterns.join(", "));
    if let Some(s) = seed {
        println!("Seed: {}", s);
    }
    println!();

    println!("Chords: {}", melody.chord_label);
    for step in &melody.steps {
        let notes: Vec<String> = step.notes.iter().map(|p| p.name()).collect();
        println!(
            "  beat {:>3}: {:<8} [{}]{}  {}",
            step.start.to_string(),
            step.to_string(),
            notes.join(" "),
            if step.inverted { " (inv)" } else { "" },
            step.pattern.label()
        );
    }
    println!();

    write_midi(&melody.track, Path::new(output_path))?;
    println!(
        "Wrote {} notes to {} ({:.1}s)",
        melody.track.events.len(),
        output_path,
        melody.track.duration_seconds()
    );
    Ok(())
}

/// Start from `--config` (or defaults) and apply command-line overrides.
fn build_request(args: &[String]) -> Result<GenerationRequest, Box<dyn std::error::Error>> {
    let mut request = match flag_value(args, "--config") {
        Some(path) => GenerationRequest::load(Path::new(path))?,
        None => GenerationRequest::default(),
    };

    if let Some(root) = flag_value(args, "--root") {
        request.root = if root.chars().any(|c| c.is_ascii_digit()) {
            root.to_string()
        } else {
            format!("{}4", root)
        };
    }
    if let Some(scale) = flag_value(args, "--scale") {
        request.scale = scale.to_string();
    }
    if let Some(bars) = parse_flag(args, "--bars")? {
        request.num_bars = bars;
    }
    if let Some(tempo) = parse_flag(args, "--tempo")? {
        request.beats_per_minute = tempo;
    }
    if let Some(sig) = flag_value(args, "--time-sig") {
        let (num, den) = sig
            .split_once('/')
            .ok_or_else(|| format!("invalid time signature: {}", sig))?;
        request.beats_per_bar = num.trim().parse()?;
        request.note_value = den.trim().parse()?;
    }
    if let Some(chords) = flag_value(args, "--chords") {
        request.chord_types = split_list(chords);
    }
    if let Some(patterns) = flag_value(args, "--patterns") {
        request.patterns = split_list(patterns);
    }
    if has_flag(args, "--root-inversion") {
        request.root_inversion = true;
    }
    if has_flag(args, "--no-end-on-tonic") {
        request.end_on_tonic = false;
    }
    Ok(request)
}

fn print_tables() {
    println!("Scales:");
    for scale in ScaleKind::ALL {
        println!("  {:<18} {:?}", scale.name(), scale.intervals());
    }
    println!("Chord types:");
    for kind in ChordKind::ALL {
        println!("  {:<18} {:?}", kind.name(), kind.intervals());
    }
    println!("Patterns:");
    for pattern in Pattern::ALL {
        println!("  {:<18} {}", pattern.name(), pattern.label());
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|v| v.as_str())
}

fn parse_flag<T>(args: &[String], flag: &str) -> Result<Option<T>, Box<dyn std::error::Error>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + 'static,
{
    match flag_value(args, flag) {
        Some(v) => Ok(Some(v.parse()?)),
        None => Ok(None),
    }
}
