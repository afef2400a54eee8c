//! Frame-driven timer queue.
//!
//! Time only moves when the owner calls [`Scheduler::advance`] with the frame
//! delta, the same way the render loop accumulates `dt` into its timers. Due
//! tasks come back ordered by deadline, then by the order they were scheduled.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Entry<T> {
    id: TaskId,
    due: Duration,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    pending: Vec<Entry<T>>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Entry {
            id,
            due: self.now + delay,
            task,
        });
        id
    }

    /// Drops a pending task. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        match self.pending.iter().position(|e| e.id == id) {
            Some(pos) => {
                self.pending.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Moves the clock forward and returns every task that became due.
    pub fn advance(&mut self, dt: Duration) -> Vec<T> {
        self.now += dt;
        let now = self.now;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|e| e.due <= now);
        self.pending = pending;

        // ids grow monotonically, so they break deadline ties in scheduling order
        due.sort_by_key(|e| (e.due, e.id.0));
        due.into_iter().map(|e| e.task).collect()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
