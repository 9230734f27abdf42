//! Session - the state-owning driver for one game
//!
//! A `Session` owns the [`GameState`], the oxygen clock and the deferred
//! gravity queue. Every mutation goes through one entry point per trigger:
//!
//! - input: [`Session::apply_move`], [`Session::apply_destroy`], [`Session::apply_action`]
//! - lifecycle: [`Session::pause`], [`Session::resume`], [`Session::restart`]
//! - time: [`Session::advance`]
//!
//! Each call runs to completion before returning, so observers only ever see
//! whole turns. Time is virtual: the host passes elapsed milliseconds and the
//! session fires clock ticks and due gravity tasks in chronological order.
//! Gravity timers are not pause-aware; a settle scheduled before a pause
//! still lands on time.

use drill_master_core::rng::SimpleRng;
use drill_master_core::{ConfigError, GameClock, GameConfig, GameSnapshot, GameState, TurnOutcome};
use drill_master_types::{Character, Direction, GameAction, GameStatus, Notification};

use crate::scheduler::{GravityTask, Scheduler};

/// Parameters for [`Session::restart`]; unset fields keep the current value.
///
/// Without a seed the next board's seed is derived from the current one, so a
/// sequence of restarts from a known seed is reproducible.
#[derive(Debug, Clone, Default)]
pub struct RestartOptions {
    pub seed: Option<u32>,
    pub character: Option<Character>,
    pub config: Option<GameConfig>,
}

impl RestartOptions {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn with_character(character: Character) -> Self {
        Self {
            character: Some(character),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct Session {
    state: GameState,
    clock: GameClock,
    scheduler: Scheduler,
    now_ms: u64,
    episode_id: u32,
    notifications: Vec<Notification>,
}

impl Session {
    pub fn new(config: GameConfig, character: Character, seed: u32) -> Result<Self, ConfigError> {
        let state = GameState::new(config, character, seed)?;
        Ok(Self::from_state(state))
    }

    /// Drive an already-built state (custom boards, scenarios)
    pub fn from_state(state: GameState) -> Self {
        let clock = GameClock::new(state.config().tick_ms);
        Self {
            state,
            clock,
            scheduler: Scheduler::new(),
            now_ms: 0,
            episode_id: 0,
            notifications: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    /// Session time in milliseconds since the current episode started
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending_settles(&self) -> usize {
        self.scheduler.len()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snap = self.state.snapshot();
        snap.episode_id = self.episode_id;
        snap.pending_settles = self.scheduler.len();
        snap
    }

    /// Take all notifications raised since the last drain, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn apply_move(&mut self, direction: Direction) -> bool {
        let outcome = self.state.apply_move(direction);
        self.absorb(outcome)
    }

    pub fn apply_destroy(&mut self, col: u16, row: u16) -> bool {
        let outcome = self.state.destroy_at(col, row);
        self.absorb(outcome)
    }

    /// Apply an input-level action. Returns true if anything changed.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Move(direction) => self.apply_move(direction),
            GameAction::Pause => self.toggle_pause(),
            GameAction::Restart => self.restart(RestartOptions::default()).is_ok(),
            GameAction::SelectCharacter(index) => match Character::by_index(index as usize) {
                Some(character) => self
                    .restart(RestartOptions::with_character(character))
                    .is_ok(),
                None => false,
            },
        }
    }

    pub fn pause(&mut self) -> bool {
        let changed = self.state.pause();
        if changed {
            tracing::debug!(now_ms = self.now_ms, "paused");
        }
        changed
    }

    pub fn resume(&mut self) -> bool {
        let changed = self.state.resume();
        if changed {
            tracing::debug!(now_ms = self.now_ms, "resumed");
        }
        changed
    }

    /// Playing <-> Paused; no-op in GameOver and LevelComplete.
    pub fn toggle_pause(&mut self) -> bool {
        match self.state.status() {
            GameStatus::Playing => self.pause(),
            GameStatus::Paused => self.resume(),
            GameStatus::GameOver | GameStatus::LevelComplete => false,
        }
    }

    /// Discard the current game and start a fresh one.
    ///
    /// Pending settles and undrained notifications are dropped. On error the
    /// current game is left untouched.
    pub fn restart(&mut self, options: RestartOptions) -> Result<(), ConfigError> {
        let config = options
            .config
            .unwrap_or_else(|| self.state.config().clone());
        let character = options.character.unwrap_or(self.state.character());
        let seed = options
            .seed
            .unwrap_or_else(|| SimpleRng::new(self.state.seed()).next_u32());

        let state = GameState::new(config, character, seed)?;
        let episode_id = self.episode_id.wrapping_add(1);

        self.clock = GameClock::new(state.config().tick_ms);
        self.state = state;
        self.episode_id = episode_id;
        self.now_ms = 0;
        let dropped = self.scheduler.retain_episode(episode_id);
        self.notifications.clear();

        tracing::info!(
            episode_id,
            seed,
            character = character.name,
            dropped_settles = dropped,
            "session restarted"
        );
        Ok(())
    }

    /// Advance session time by `elapsed_ms`.
    ///
    /// Clock ticks and gravity tasks falling inside the window are processed
    /// in time order; a tick and a task due at the same instant resolve tick
    /// first.
    pub fn advance(&mut self, elapsed_ms: u32) {
        let end = self.now_ms + elapsed_ms as u64;

        loop {
            let next_tick = self
                .state
                .is_playing()
                .then(|| self.now_ms + self.clock.until_next_tick() as u64);
            let next_event = match (next_tick, self.scheduler.next_due()) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };

            let Some(at) = next_event.filter(|&at| at <= end) else {
                self.run_clock(end);
                break;
            };

            self.run_clock(at);
            while let Some(task) = self.scheduler.pop_due(self.now_ms) {
                self.fire(task);
            }
        }
    }

    /// Fire every pending settle now, regardless of due time.
    ///
    /// Returns the number of tasks fired.
    pub fn flush_settles(&mut self) -> usize {
        let mut fired = 0;
        while let Some(due) = self.scheduler.next_due() {
            if let Some(task) = self.scheduler.pop_due(due) {
                self.fire(task);
                fired += 1;
            }
        }
        fired
    }

    fn run_clock(&mut self, until_ms: u64) {
        let step = until_ms.saturating_sub(self.now_ms);
        if step > 0 {
            let raised = self.clock.advance(&mut self.state, step as u32);
            self.notifications.extend(raised);
        }
        self.now_ms = until_ms.max(self.now_ms);
    }

    fn fire(&mut self, task: GravityTask) {
        if task.episode != self.episode_id {
            tracing::debug!(task = task.id.raw(), episode = task.episode, "stale settle dropped");
            return;
        }
        let (report, outcome) = self.state.apply_settle();
        tracing::debug!(
            task = task.id.raw(),
            passes = report.passes,
            moves = report.moves,
            "settle fired"
        );
        self.notifications.extend(outcome.notifications);
    }

    fn absorb(&mut self, outcome: TurnOutcome) -> bool {
        if outcome.schedule_gravity {
            let delay = self.state.config().gravity_delay_ms;
            self.scheduler.schedule(self.episode_id, self.now_ms, delay);
        }
        self.notifications.extend(outcome.notifications);
        outcome.applied
    }
}
