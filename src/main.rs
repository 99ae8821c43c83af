//! N Key Rollover - terminal frontend
//!
//! Puts the terminal in raw mode, feeds key presses into the game, runs
//! one pipeline frame per tick and replays the frame's draw list through
//! ratatui. Logs go to a file because the terminal is taken.

use std::fs::File;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect as Area;
use ratatui::style::{Color as TermColor, Style};
use ratatui::widgets::Widget;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use nkeyrollover::core::config::RenderTuning;
use nkeyrollover::core::error::Result;
use nkeyrollover::core::types::{Color, Vec2};
use nkeyrollover::interfaces::{GameKey, OpenArena, RenderQueue, RenderSink};
use nkeyrollover::scene::SceneBook;
use nkeyrollover::{Game, GameConfig};

/// Terminal action game
#[derive(Parser, Debug)]
#[command(name = "nkeyrollover")]
#[command(about = "Fight your way through the scenes with the keyboard")]
struct Args {
    /// Tuning overrides (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scene definitions (TOML); the built-in scenes are used otherwise
    #[arg(long)]
    scenes: Option<PathBuf>,

    /// Seed for the simulation RNG, overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// Frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Where log lines are written
    #[arg(long, default_value = "nkeyrollover.log")]
    log_file: PathBuf,
}

type Term = Terminal<CrosstermBackend<Stdout>>;

fn main() -> Result<()> {
    let args = Args::parse();

    let log = File::create(&args.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nkeyrollover=info")))
        .with_writer(Mutex::new(log))
        .with_ansi(false)
        .init();

    tracing::info!("N Key Rollover starting...");

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path).unwrap_or_else(|e| {
            tracing::warn!("Falling back to default config: {}", e);
            GameConfig::default()
        }),
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let book = match &args.scenes {
        Some(path) => SceneBook::load(path)?,
        None => SceneBook::default(),
    };

    let mut game = Game::new(config, book, Box::new(OpenArena::default()));

    let mut terminal = setup_terminal()?;
    let outcome = run(&mut terminal, &mut game, args.fps.max(1));
    restore_terminal(&mut terminal)?;

    let summary = game.summary();
    tracing::info!(
        "Exited after {} frames: {} ({:?}), score {}",
        summary.frame,
        summary.scene,
        summary.scene_state,
        summary.score
    );
    outcome
}

fn setup_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Fixed-step loop: collect keys until the frame deadline, then advance
fn run(terminal: &mut Term, game: &mut Game, fps: u32) -> Result<()> {
    let step = Duration::from_secs_f64(1.0 / fps as f64);
    let dt = step.as_secs_f32();
    let started = Instant::now();
    let mut frame = 0;

    loop {
        let deadline = Instant::now() + step;
        while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
            if !event::poll(remaining)? {
                break;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
                KeyCode::Char('p') => {
                    game.toggle_pause();
                }
                KeyCode::Enter => game.push_key(GameKey::Restart, started.elapsed().as_secs_f64()),
                KeyCode::Char(c) => game.push_key(GameKey::from_char(c), started.elapsed().as_secs_f64()),
                _ => {}
            }
        }

        if game.advance(dt, frame + 1) {
            frame += 1;
        }

        let view = QueueView {
            queue: game.render_queue(),
            cell: game.config().render.clone(),
            paused: game.is_paused(),
        };
        terminal.draw(|f| f.render_widget(view, f.size()))?;
    }
}

/// The last frame's draw list as a ratatui widget
struct QueueView<'a> {
    queue: &'a RenderQueue,
    cell: RenderTuning,
    paused: bool,
}

impl Widget for QueueView<'_> {
    fn render(self, area: Area, buf: &mut Buffer) {
        let mut sink = BufferSink {
            buf,
            area,
            cell: self.cell,
        };
        self.queue.replay(&mut sink);
        if self.paused {
            sink.draw_text(Vec2::new(0.0, sink.cell.cell_height), "PAUSED", Color::Yellow);
        }
    }
}

struct BufferSink<'a> {
    buf: &'a mut Buffer,
    area: Area,
    cell: RenderTuning,
}

impl BufferSink<'_> {
    fn cell_of(&self, pos: Vec2) -> Option<(u16, u16)> {
        if pos.x < 0.0 || pos.y < 0.0 {
            return None;
        }
        let x = self.area.x + (pos.x / self.cell.cell_width) as u16;
        let y = self.area.y + (pos.y / self.cell.cell_height) as u16;
        (x < self.area.right() && y < self.area.bottom()).then_some((x, y))
    }
}

impl RenderSink for BufferSink<'_> {
    fn put_glyph(&mut self, pos: Vec2, glyph: char, color: Color) {
        if let Some((x, y)) = self.cell_of(pos) {
            self.buf.get_mut(x, y).set_char(glyph).set_fg(term_color(color));
        }
    }

    fn draw_text(&mut self, pos: Vec2, text: &str, color: Color) {
        if let Some((x, y)) = self.cell_of(pos) {
            let width = (self.area.right() - x) as usize;
            self.buf
                .set_stringn(x, y, text, width, Style::default().fg(term_color(color)));
        }
    }
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::White => TermColor::White,
        Color::Grey => TermColor::DarkGray,
        Color::Red => TermColor::Red,
        Color::Green => TermColor::Green,
        Color::Blue => TermColor::Blue,
        Color::Yellow => TermColor::Yellow,
        Color::Magenta => TermColor::Magenta,
        Color::Cyan => TermColor::Cyan,
        Color::Brown => TermColor::Rgb(150, 90, 40),
    }
}
