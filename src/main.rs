mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use display::Surface;
use space_shooter::compute::{init_world, restart, tick, toggle_pause};
use space_shooter::config::GameConfig;
use space_shooter::entities::{GameStatus, World};
use space_shooter::error::GameError;
use space_shooter::input::{action_for_key, Action, KeyTracker};

/// Logs go to a file so they never tear the game screen.
fn init_logging() -> anyhow::Result<()> {
    let path = std::env::var("SHOOTER_LOG").unwrap_or_else(|_| "space_shooter.log".to_string());
    let file = File::create(&path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → restart requested.
///
/// Input model: a `KeyTracker` records the frame of the last press/repeat
/// event for every action.  Each frame the held actions are folded into an
/// `InputState`, so Space and a direction can be held together.
fn game_loop<W: Write>(
    out: &mut W,
    surface: &mut Surface,
    world: &mut World,
    rx: &mpsc::Receiver<Event>,
) -> Result<bool, GameError> {
    let mut rng = thread_rng();
    let mut keys = KeyTracker::new();
    let frame_budget = Duration::from_secs(1) / world.config.frame_rate;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(true);
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(true);
                            }
                            KeyCode::Char('r') | KeyCode::Char('R')
                                if world.status == GameStatus::GameOver =>
                            {
                                return Ok(false);
                            }
                            _ => {}
                        }
                        match action_for_key(&code) {
                            Some(Action::Pause) => toggle_pause(world),
                            Some(action) => keys.press(action, frame),
                            None => {}
                        }
                    }
                    // Repeat: refresh timestamp so the action stays "held"
                    KeyEventKind::Repeat => {
                        if let Some(action) = action_for_key(&code) {
                            if action != Action::Pause {
                                keys.press(action, frame);
                            }
                        }
                    }
                    KeyEventKind::Release => {
                        if let Some(action) = action_for_key(&code) {
                            keys.release(action);
                        }
                    }
                },
                Event::Resize(cols, rows) => match Surface::with_size(cols, rows) {
                    Ok(resized) => *surface = resized,
                    Err(e) => warn!("Ignoring resize: {}", e),
                },
                _ => {}
            }
        }

        let input = keys.snapshot(frame);
        tick(world, &input, &mut rng);

        display::render(out, surface, world)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            std::thread::sleep(frame_budget - elapsed);
        }
    }
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> Result<(), GameError> {
    let config = GameConfig::load_or_default();
    let mut surface = Surface::acquire()?;
    let mut world = init_world(config)?;

    loop {
        let quit = game_loop(out, &mut surface, &mut world, rx)?;
        if quit {
            info!("Quit with score {}", world.score);
            break;
        }
        restart(&mut world);
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging()?;
    info!("Space shooter v{}", env!("CARGO_PKG_VERSION"));

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

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
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        tracing::error!("Game aborted: {}", e);
    }
    result.map_err(Into::into)
}
