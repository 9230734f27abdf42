//! Async session runtime
//!
//! Runs a [`Session`] as a tokio task that owns it outright. Callers talk to
//! it through a [`SessionHandle`]: requests travel over a bounded mpsc queue
//! and are applied one at a time, the latest snapshot is published on a watch
//! channel, and notifications stream out on an unbounded mpsc channel.
//!
//! Time is driven by a frame interval; each frame advances the session by the
//! wall-clock milliseconds since the previous one.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use drill_master_core::{ConfigError, GameSnapshot};
use drill_master_types::{Direction, GameAction, Notification};

use crate::session::{RestartOptions, Session};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("session task has stopped")]
    Closed,
    #[error("restart rejected: {0}")]
    Config(#[from] ConfigError),
}

/// Runtime tuning
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Interval between time advances
    pub frame: Duration,
    /// Capacity of the request queue
    pub max_pending_requests: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frame: Duration::from_millis(drill_master_types::FRAME_MS as u64),
            max_pending_requests: 64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    Move(Direction),
    Destroy { col: u16, row: u16 },
    Action(GameAction),
    Pause,
    Resume,
}

#[derive(Debug)]
enum Command {
    Apply(Request, oneshot::Sender<bool>),
    Restart(RestartOptions, oneshot::Sender<Result<(), ConfigError>>),
    Shutdown,
}

/// Cloneable client side of a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    cmd_tx: mpsc::Sender<Command>,
    snapshot_rx: watch::Receiver<GameSnapshot>,
}

impl SessionHandle {
    /// Latest published snapshot
    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Wait until a newer snapshot is published.
    pub async fn changed(&mut self) -> Result<(), EngineError> {
        self.snapshot_rx
            .changed()
            .await
            .map_err(|_| EngineError::Closed)
    }

    pub async fn apply_move(&self, direction: Direction) -> Result<bool, EngineError> {
        self.request(Request::Move(direction)).await
    }

    pub async fn apply_destroy(&self, col: u16, row: u16) -> Result<bool, EngineError> {
        self.request(Request::Destroy { col, row }).await
    }

    pub async fn apply_action(&self, action: GameAction) -> Result<bool, EngineError> {
        self.request(Request::Action(action)).await
    }

    pub async fn pause(&self) -> Result<bool, EngineError> {
        self.request(Request::Pause).await
    }

    pub async fn resume(&self) -> Result<bool, EngineError> {
        self.request(Request::Resume).await
    }

    pub async fn restart(&self, options: RestartOptions) -> Result<(), EngineError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Restart(options, tx))
            .await
            .map_err(|_| EngineError::Closed)?;
        rx.await.map_err(|_| EngineError::Closed)??;
        Ok(())
    }

    /// Ask the session task to stop. Already-stopped sessions are fine.
    pub async fn shutdown(&self) {
        let _ = self.cmd_tx.send(Command::Shutdown).await;
    }

    async fn request(&self, request: Request) -> Result<bool, EngineError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Apply(request, tx))
            .await
            .map_err(|_| EngineError::Closed)?;
        rx.await.map_err(|_| EngineError::Closed)
    }
}

/// Spawn `session` onto the current tokio runtime.
///
/// The task ends on [`SessionHandle::shutdown`] or once every handle is dropped.
pub fn spawn_session(
    session: Session,
    config: RuntimeConfig,
) -> (
    SessionHandle,
    mpsc::UnboundedReceiver<Notification>,
    JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx) = mpsc::channel(config.max_pending_requests.max(1));
    let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());
    let (note_tx, note_rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(run_session(session, config.frame, cmd_rx, snapshot_tx, note_tx));

    (
        SessionHandle {
            cmd_tx,
            snapshot_rx,
        },
        note_rx,
        task,
    )
}

async fn run_session(
    mut session: Session,
    frame: Duration,
    mut cmd_rx: mpsc::Receiver<Command>,
    snapshot_tx: watch::Sender<GameSnapshot>,
    note_tx: mpsc::UnboundedSender<Notification>,
) {
    let mut ticker = time::interval(frame);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();

    tracing::info!(episode_id = session.episode_id(), "session task started");

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(Command::Apply(request, reply)) => {
                        let changed = apply(&mut session, request);
                        let _ = reply.send(changed);
                    }
                    Some(Command::Restart(options, reply)) => {
                        let result = session.restart(options);
                        if result.is_ok() {
                            last = Instant::now();
                        }
                        let _ = reply.send(result);
                    }
                    Some(Command::Shutdown) | None => break,
                }
            }
            _ = ticker.tick() => {
                let elapsed = last.elapsed().as_millis() as u64;
                if elapsed > 0 {
                    last += Duration::from_millis(elapsed);
                    session.advance(elapsed.min(u32::MAX as u64) as u32);
                }
            }
        }

        for note in session.drain_notifications() {
            let _ = note_tx.send(note);
        }
        snapshot_tx.send_replace(session.snapshot());
    }

    tracing::info!(episode_id = session.episode_id(), "session task stopped");
}

fn apply(session: &mut Session, request: Request) -> bool {
    match request {
        Request::Move(direction) => session.apply_move(direction),
        Request::Destroy { col, row } => session.apply_destroy(col, row),
        Request::Action(action) => session.apply_action(action),
        Request::Pause => session.pause(),
        Request::Resume => session.resume(),
    }
}
