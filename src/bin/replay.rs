//! Replays recorded server frames through the client session.
//!
//! Reads one JSON frame per line from a file or stdin, applies every frame to
//! a headless session and prints the resulting snapshot. Frames that cannot be
//! decoded are logged and skipped.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin buzzer-replay -- session.jsonl
//! cat session.jsonl | cargo run --bin buzzer-replay -- --json --ticks 10
//! ```

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
};

use clap::Parser;

use buzzer::{ClientConfig, ManualTicker, Session, logger::setup_logger, protocol};

#[derive(Parser, Debug)]
#[command(name = "buzzer-replay")]
#[command(about = "Replay recorded buzzer frames through the client session", long_about = None)]
struct Args {
    /// File with one JSON frame per line, stdin when omitted
    input: Option<PathBuf>,

    /// Print snapshots as JSON instead of a summary line
    #[arg(short, long)]
    json: bool,

    /// Countdown ticks to apply after every frame while a round is running
    #[arg(short, long, default_value_t = 0)]
    ticks: u32,

    /// Client configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn replay(
    args: &Args,
    config: &ClientConfig,
    reader: impl BufRead,
    out: &mut impl Write,
) -> io::Result<()> {
    let mut session = Session::new(config, ManualTicker::default());

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let event = match protocol::decode(&line) {
            Ok(event) => event,
            Err(error) => {
                tracing::warn!(line = index + 1, %error, "skipping frame");
                continue;
            }
        };

        if let Some(signal) = session.apply(event) {
            tracing::info!(?signal, "signal raised");
        }
        if let Some(handle) = session.countdown().active_handle() {
            for _ in 0..args.ticks {
                session.tick(handle);
            }
        }

        let snapshot = session.snapshot();
        if args.json {
            serde_json::to_writer(&mut *out, &snapshot)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{snapshot}")?;
        }
    }

    Ok(())
}

fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match ClientConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Cannot use {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => ClientConfig::default(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = match &args.input {
        Some(path) => match File::open(path) {
            Ok(file) => replay(&args, &config, BufReader::new(file), &mut out),
            Err(e) => {
                tracing::error!("Cannot open {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => replay(&args, &config, io::stdin().lock(), &mut out),
    };

    if let Err(e) = result {
        tracing::error!("Replay failed: {}", e);
        std::process::exit(1);
    }
}
