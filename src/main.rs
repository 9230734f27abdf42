//! Terminal Drill Master runner (default binary).
//!
//! Single-threaded loop: poll crossterm for input until the next frame, feed
//! actions to the session, advance session time by the real elapsed time,
//! then render. Configuration comes from `DRILL_*` environment variables;
//! `DRILL_SEED` pins the first board and `DRILL_LOG` names a file that
//! receives debug logs.

use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing_subscriber::filter::LevelFilter;

use drill_master::core::GameConfig;
use drill_master::engine::Session;
use drill_master::input::{should_quit, InputHandler};
use drill_master::term::{FrameBuffer, GameView, TerminalRenderer};
use drill_master::types::{GameAction, Notification, RED_DRILLER, FRAME_MS};

const TOAST_MS: u64 = 2000;

fn main() -> Result<()> {
    init_logging()?;
    let config = GameConfig::from_env();
    let session = Session::new(config, RED_DRILLER, initial_seed())
        .context("invalid game configuration")?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, session);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Stdout belongs to the board, so logs only go to a file.
fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os("DRILL_LOG") else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.to_string_lossy()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(LevelFilter::DEBUG)
        .init();
    Ok(())
}

fn initial_seed() -> u32 {
    std::env::var("DRILL_SEED")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
                .unwrap_or(1)
        })
}

fn run(term: &mut TerminalRenderer, mut session: Session) -> Result<()> {
    let view = GameView::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut input = InputHandler::new().with_speed(session.state().character().speed);

    let started = Instant::now();
    let frame = Duration::from_millis(FRAME_MS as u64);
    let mut last_frame = Instant::now();
    let mut toast: Option<(Notification, u64)> = None;

    loop {
        let timeout = frame.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release && should_quit(key) => {
                    return Ok(());
                }
                Event::Key(key) => {
                    let now_ms = started.elapsed().as_millis() as u64;
                    if let Some(action) = input.handle_key_event(key, now_ms) {
                        session.apply_action(action);
                        if matches!(action, GameAction::Restart | GameAction::SelectCharacter(_)) {
                            input.set_speed(session.state().character().speed);
                            toast = None;
                        }
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        let elapsed = last_frame.elapsed();
        if elapsed < frame {
            continue;
        }
        last_frame = Instant::now();
        session.advance(elapsed.as_millis() as u32);

        let now_ms = started.elapsed().as_millis() as u64;
        if let Some(latest) = session.drain_notifications().pop() {
            toast = Some((latest, now_ms + TOAST_MS));
        }
        if toast.is_some_and(|(_, until)| now_ms >= until) {
            toast = None;
        }

        let snap = session.snapshot();
        view.render(&snap, toast.as_ref().map(|(note, _)| note), &mut fb);
        term.draw(&fb)?;
    }
}
