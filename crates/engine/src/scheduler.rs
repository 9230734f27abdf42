//! Deferred gravity scheduling
//!
//! Every clearing action schedules one [`GravityTask`] due a fixed delay after
//! the action. Tasks are kept in due order (FIFO for equal due times) and fire
//! one at a time; each fire settles the live board, so overlapping tasks are
//! harmless repeats of an idempotent settle.
//!
//! Tasks are tagged with the episode they were scheduled in. A task whose
//! episode no longer matches the session is discarded instead of fired.

use std::collections::VecDeque;

/// Identity of a scheduled task, unique per scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GravityTask {
    pub id: TaskId,
    pub episode: u32,
    /// Session time (ms) at which the task fires
    pub due_ms: u64,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    queue: VecDeque<GravityTask>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a settle for `episode`, due `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, episode: u32, now_ms: u64, delay_ms: u32) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let task = GravityTask {
            id,
            episode,
            due_ms: now_ms + delay_ms as u64,
        };
        let at = self.queue.partition_point(|t| t.due_ms <= task.due_ms);
        self.queue.insert(at, task);
        id
    }

    /// Due time of the earliest pending task
    pub fn next_due(&self) -> Option<u64> {
        self.queue.front().map(|t| t.due_ms)
    }

    /// Remove and return the earliest task if it is due at `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<GravityTask> {
        if self.next_due()? <= now_ms {
            self.queue.pop_front()
        } else {
            None
        }
    }

    /// Drop every task not belonging to `episode`; returns how many were dropped.
    pub fn retain_episode(&mut self, episode: u32) -> usize {
        let before = self.queue.len();
        self.queue.retain(|t| t.episode == episode);
        before - self.queue.len()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_pop_in_due_order() {
        let mut s = Scheduler::new();
        let a = s.schedule(0, 0, 1000);
        let b = s.schedule(0, 200, 1000);
        let c = s.schedule(0, 200, 500);
        assert_eq!(s.len(), 3);
        assert_eq!(s.next_due(), Some(700));

        assert_eq!(s.pop_due(699), None);
        assert_eq!(s.pop_due(700).map(|t| t.id), Some(c));
        assert_eq!(s.pop_due(5000).map(|t| t.id), Some(a));
        assert_eq!(s.pop_due(5000).map(|t| t.id), Some(b));
        assert!(s.is_empty());
    }

    #[test]
    fn equal_due_times_stay_fifo() {
        let mut s = Scheduler::new();
        let ids: Vec<_> = (0..4).map(|_| s.schedule(0, 10, 10)).collect();
        let popped: Vec<_> = std::iter::from_fn(|| s.pop_due(20).map(|t| t.id)).collect();
        assert_eq!(popped, ids);
    }

    #[test]
    fn retain_episode_drops_stale_tasks() {
        let mut s = Scheduler::new();
        s.schedule(1, 0, 100);
        s.schedule(2, 0, 100);
        s.schedule(1, 50, 100);
        assert_eq!(s.retain_episode(2), 2);
        assert_eq!(s.len(), 1);
        assert_eq!(s.pop_due(100).map(|t| t.episode), Some(2));
    }

    #[test]
    fn ids_are_unique() {
        let mut s = Scheduler::new();
        let a = s.schedule(0, 0, 1);
        let b = s.schedule(0, 0, 1);
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }
}
