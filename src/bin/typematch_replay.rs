//! Typematch Replay Runner
//!
//! Runs a replay script through a fresh matching context and prints the
//! resulting transcript.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use typematch::replay::ReplayScript;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut input_file: Option<PathBuf> = None;
    let mut config_file: Option<PathBuf> = None;
    let mut output_format = OutputFormat::Text;
    let mut multi_target = false;
    let mut show_help = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-f" | "--file" => {
                i += 1;
                if i < args.len() {
                    input_file = Some(PathBuf::from(&args[i]));
                }
            },
            "-c" | "--config" => {
                i += 1;
                if i < args.len() {
                    config_file = Some(PathBuf::from(&args[i]));
                }
            },
            "-m" | "--multi-target" => {
                multi_target = true;
            },
            "-j" | "--json" => {
                output_format = OutputFormat::Json;
            },
            "-t" | "--text" => {
                output_format = OutputFormat::Text;
            },
            "-h" | "--help" => {
                show_help = true;
            },
            _ => {
                // Treat as input file if no flag
                if input_file.is_none() && !args[i].starts_with('-') {
                    input_file = Some(PathBuf::from(&args[i]));
                }
            },
        }
        i += 1;
    }

    if show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    // Read script
    let loaded = match &input_file {
        Some(path) => ReplayScript::load(path),
        None => {
            let mut data = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut data) {
                eprintln!("Error reading stdin: {}", e);
                return ExitCode::FAILURE;
            }
            ReplayScript::from_json(&data)
        },
    };
    let mut script = match loaded {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Error loading script: {}", e);
            return ExitCode::FAILURE;
        },
    };

    if let Some(path) = &config_file {
        if let Err(e) = script.load_config(path) {
            eprintln!("Error loading config '{}': {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    }
    if multi_target {
        script.config.multi_target = true;
    }

    tracing::info!(
        sequences = script.sequences.len(),
        ticks = script.ticks.len(),
        "running replay"
    );
    let transcript = script.run();

    match output_format {
        OutputFormat::Text => print!("{}", transcript.to_text()),
        OutputFormat::Json => match transcript.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing transcript: {}", e);
                return ExitCode::FAILURE;
            },
        },
    }

    ExitCode::SUCCESS
}

#[derive(Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn print_help() {
    println!("Typematch Replay Runner");
    println!();
    println!("Usage: typematch-replay [OPTIONS] [SCRIPT]");
    println!();
    println!("Options:");
    println!("  -f, --file <PATH>    Read the replay script from a file");
    println!("  -c, --config <PATH>  Override the script's config with a config file");
    println!("  -m, --multi-target   Enable multi-target mode");
    println!("  -j, --json           Output the transcript as JSON");
    println!("  -t, --text           Output the transcript as text (default)");
    println!("  -h, --help           Show this help message");
    println!();
    println!("If no script is specified, reads it from stdin.");
    println!();
    println!("Examples:");
    println!("  echo '{{\"sequences\":[{{\"text\":\"go\"}}],\"ticks\":[{{\"text\":\"go\"}}]}}' | typematch-replay");
    println!("  typematch-replay --json session.json > transcript.json");
}
