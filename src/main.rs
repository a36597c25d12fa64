mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
    ExecutableCommand,
};
use rand::thread_rng;
use tracing::trace;
use tracing_subscriber::EnvFilter;

use space_station::compute::{new_session, tick};
use space_station::config::GameConfig;
use space_station::entities::{SessionStatus, Steer, TickInput};

const FRAME: Duration = Duration::from_millis(16); // ≈60 ticks/second

/// Wall-clock interval between "an alien may fire" events.
const ALIEN_FIRE_MS: u64 = 700;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames is always
/// refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key; each frame we check which keys are
/// still "fresh" (within `HOLD_WINDOW` frames) and apply all their effects
/// simultaneously, so Space + A/D can be held together.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire naturally after `HOLD_WINDOW` frames
///   of silence.
fn game_loop<W: Write>(
    out: &mut W,
    config: &GameConfig,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let mut rng = thread_rng();
    let mut state = new_session(config, &mut rng)?;
    let (term_w, term_h) = terminal::size()?;

    let start = Instant::now();
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last_alien_fire_ms: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let now_ms = start.elapsed().as_millis() as u64;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c')
                            if modifiers.contains(KeyModifiers::CONTROL) =>
                        {
                            return Ok(());
                        }
                        // Reset is consumed only while the session is over.
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if state.status != SessionStatus::Active =>
                        {
                            state = new_session(config, &mut rng)?;
                            last_alien_fire_ms = now_ms;
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Build this tick's input ───────────────────────────────────────────
        let left = is_held(&key_frame, &KeyCode::Left, frame)
            || is_held(&key_frame, &KeyCode::Char('a'), frame)
            || is_held(&key_frame, &KeyCode::Char('A'), frame);
        let right = is_held(&key_frame, &KeyCode::Right, frame)
            || is_held(&key_frame, &KeyCode::Char('d'), frame)
            || is_held(&key_frame, &KeyCode::Char('D'), frame);
        let steer = if left {
            Steer::Left
        } else if right {
            Steer::Right
        } else {
            Steer::Idle
        };

        // The periodic enemy-fire event, fed into the simulation as a
        // discrete flag rather than handled here.
        let mut alien_fire = false;
        if state.status == SessionStatus::Active
            && now_ms.saturating_sub(last_alien_fire_ms) >= ALIEN_FIRE_MS
        {
            alien_fire = true;
            last_alien_fire_ms = now_ms;
        }

        let input = TickInput {
            steer,
            fire: is_held(&key_frame, &KeyCode::Char(' '), frame),
            alien_fire,
            now_ms,
        };

        state = tick(&state, &input, &mut rng);

        // Audio hook lives here once there is a speaker to talk to; for now
        // the events go to the log.
        for game_event in &state.events {
            trace!(?game_event, "tick event");
        }

        display::render(out, &state, term_w, term_h)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    // The alternate screen owns stdout, so logs go to stderr; redirect to a
    // file when playing (RUST_LOG=debug space_station 2>space_station.log).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back
    // gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(_) => break,
            }
        }
    });

    let result = game_loop(&mut out, &GameConfig::default(), &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
