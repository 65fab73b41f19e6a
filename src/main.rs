use clap::{Parser, ValueEnum};
use std::fs;
use std::process;

use staff_pitches::config::StaffConfig;
use staff_pitches::{KeySignature, PitchBound, PitchTable};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Yaml,
}

/// Print the pitch table for a key signature and pitch range
#[derive(Parser, Debug)]
#[command(name = "staff-pitches", version)]
struct Args {
    /// Key signature, e.g. "G", "Bb", "F#m", "###"
    #[arg(short, long)]
    key: Option<String>,

    /// Lowest pitch label to include, e.g. "C4"
    #[arg(long)]
    from: Option<String>,

    /// Highest pitch label to include, e.g. "C5"
    #[arg(long)]
    to: Option<String>,

    /// YAML staff configuration (command-line flags override it)
    #[arg(short, long)]
    config: Option<String>,

    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let source = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("Error reading file '{}': {}", path, e);
                    process::exit(1);
                }
            };
            exit_on_error(StaffConfig::from_yaml(&source))
        }
        None => StaffConfig::default(),
    };

    if let Some(key) = &args.key {
        config.signature = Some(exit_on_error(key.parse::<KeySignature>()));
    }
    if let Some(label) = &args.from {
        config.start = Some(exit_on_error(PitchBound::from_label(label)));
    }
    if let Some(label) = &args.to {
        config.end = Some(exit_on_error(PitchBound::from_label(label)));
    }

    let table = exit_on_error(config.build_table());
    log::info!("generated {} pitches", table.len());

    match args.format {
        Format::Text => print_text(&table, &config),
        Format::Yaml => match serde_yaml::to_string(&table) {
            Ok(yaml) => print!("{}", yaml),
            Err(e) => {
                eprintln!("Error serializing table: {}", e);
                process::exit(1);
            }
        },
    }
}

fn exit_on_error<T>(result: Result<T, staff_pitches::PitchError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn print_text(table: &PitchTable, config: &StaffConfig) {
    let prefer_flat = config
        .signature
        .as_ref()
        .is_some_and(|s| s.kind.prefers_flats());

    println!("{:<7} {:<6} {:>5}", "label", "sounds", "midi");
    for pitch in table.iter() {
        println!(
            "{:<7} {:<6} {:>5}",
            pitch.label,
            pitch.pitch_class.name(prefer_flat),
            pitch.absolute_value
        );
    }
}
