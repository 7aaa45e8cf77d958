use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_invaders::compute::{init_state, tick};
use space_invaders::config::{GameConfig, LogLevel};
use space_invaders::display::{self, Viewport};
use space_invaders::input::{apply_action, InputAction, InputBinding};
use space_invaders::scheduler::FixedStepScheduler;
use space_invaders::{GameError, Result};

#[derive(Parser)]
#[command(name = "space_invaders")]
#[command(about = "Terminal Space Invaders with power-ups and endless rounds")]
struct Args {
    /// JSON config file; missing keys fall back to defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Logical field width
    #[arg(long)]
    width: Option<f32>,
    /// Logical field height
    #[arg(long)]
    height: Option<f32>,
    /// Fixed RNG seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,
    /// Simulation ticks per second
    #[arg(long)]
    tick_rate: Option<u32>,
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// off, error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<String>,
}

fn build_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(width) = args.width {
        config.field.width = width;
    }
    if let Some(height) = args.height {
        config.field.height = height;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(rate) = args.tick_rate {
        config.tick_rate_hz = rate;
    }
    if let Some(path) = &args.log_file {
        config.log_file = path.clone();
    }
    if let Some(level) = &args.log_level {
        config.log_level = LogLevel::from_str(level)
            .ok_or_else(|| GameError::InvalidConfig(format!("unknown log level {level:?}")))?;
    }
    config.validate()?;
    Ok(config)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Drive the simulation until the player quits.
///
/// Input is drained between ticks, ticks run at the scheduler's cadence, and
/// a frame is drawn only after input or a tick changed something.
fn game_loop<W: Write>(
    out: &mut W,
    config: &GameConfig,
    rx: &mpsc::Receiver<Event>,
    keyboard_enhanced: bool,
) -> Result<()> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut state = init_state(config.field, config.rules);
    let mut binding = InputBinding::new(keyboard_enhanced);
    let mut scheduler = FixedStepScheduler::new(config.tick_period());
    let stop = scheduler.stop_handle();

    // Driver tick counter; keeps running while the world is paused so the
    // hold window still expires.
    let mut now: u64 = 0;
    let mut last = Instant::now();
    let mut dirty = true;
    let (cols, rows) = terminal::size()?;
    let mut view = Viewport::new(cols, rows);

    while scheduler.is_running() {
        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            if let Event::Resize(cols, rows) = ev {
                view = Viewport::new(cols, rows);
                dirty = true;
                continue;
            }
            match binding.handle(&ev, now) {
                Some(InputAction::Quit) => stop.stop(),
                Some(action) => dirty |= apply_action(&mut state, action),
                None => {}
            }
        }
        if !scheduler.is_running() {
            break;
        }

        // ── Run every tick that is due ────────────────────────────────────────
        let frame_start = Instant::now();
        let due = scheduler.advance(frame_start - last);
        last = frame_start;
        for _ in 0..due {
            now += 1;
            binding.sync_movement(&mut state, now);
            let was_over = state.game_over;
            tick(&mut state, &mut rng);
            // A frozen world needs no redraw.
            dirty |= !(state.paused || was_over);
        }

        if dirty {
            display::render(out, &state, view)?;
            dirty = false;
        }

        thread::sleep(scheduler.time_until_next_tick());
    }

    info!(
        "quit in round {} with score {} after {} ticks",
        state.round, state.score, state.tick_count
    );
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let args = Args::parse();
    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("space_invaders: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = simple_logging::log_to_file(&config.log_file, config.log_level.filter()) {
        eprintln!(
            "space_invaders: cannot open log file {}: {e}",
            config.log_file.display()
        );
    }
    info!("starting with {:?}", config);

    if let Err(e) = run(&config) {
        error!("{e}");
        eprintln!("space_invaders: {e}");
        std::process::exit(1);
    }
}

fn run(config: &GameConfig) -> Result<()> {
    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Terminals without the kitty protocol fall back to the hold window.
    let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    info!("keyboard enhancement: {}", keyboard_enhanced);

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(e) => {
                error!("event read failed: {e}");
                break;
            }
        }
    });

    let result = game_loop(&mut out, config, &rx, keyboard_enhanced);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
