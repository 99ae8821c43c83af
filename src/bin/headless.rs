//! Headless runner
//!
//! Drives the pipeline without a terminal, feeding a scripted key sequence,
//! and prints a JSON summary of the final state.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use nkeyrollover::core::error::Result;
use nkeyrollover::interfaces::{GameKey, OpenArena, TextCanvas};
use nkeyrollover::scene::SceneBook;
use nkeyrollover::{Game, GameConfig, GameSummary};

/// Headless runner - scripted input, JSON output
#[derive(Parser, Debug)]
#[command(name = "headless")]
#[command(about = "Run the game without a terminal and print a JSON summary")]
struct Args {
    /// Number of frames to run
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 30.0)]
    dt: f32,

    /// One key per frame starting at frame 1; '.' means no key, '|' restart
    #[arg(long, default_value = "")]
    keys: String,

    /// Seed for the simulation RNG, overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// Tuning overrides (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scene definitions (TOML)
    #[arg(long)]
    scenes: Option<PathBuf>,

    /// Include the last frame as text
    #[arg(long)]
    render: bool,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
struct RunResult {
    summary: GameSummary,
    failures: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    screen: Option<Vec<String>>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "nkeyrollover=debug" } else { "nkeyrollover=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.render.restart_hint = "'|'".to_string();
    let book = match &args.scenes {
        Some(path) => SceneBook::load(path)?,
        None => SceneBook::default(),
    };

    let mut game = Game::new(config, book, Box::new(OpenArena::default()));
    let script: Vec<char> = args.keys.chars().collect();
    let mut failures = 0;

    for frame in 1..=args.frames {
        match script.get((frame - 1) as usize) {
            None | Some('.') => {}
            Some('|') => game.push_key(GameKey::Restart, frame as f64 * args.dt as f64),
            Some(c) => game.push_key(GameKey::from_char(*c), frame as f64 * args.dt as f64),
        }
        game.advance(args.dt, frame);
        failures += game.last_report().failures.len();
    }

    let screen = args.render.then(|| {
        let mut canvas = TextCanvas::new(80, 25, game.config().render.clone());
        game.render_queue().replay(&mut canvas);
        canvas.lines()
    });

    let result = RunResult {
        summary: game.summary(),
        failures,
        screen,
    };
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
