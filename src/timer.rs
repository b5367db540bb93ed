//! Deferred callbacks on a virtual clock.
//!
//! Time only moves when the owner advances it, which keeps callback order
//! deterministic: by due time, then by scheduling order.

use std::fmt;

/// Identifier of a scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

struct Scheduled<C> {
    id: TimerId,
    due_at: u64,
    order: u64,
    callback: C,
}

/// Queue of callbacks of type `C` waiting for the clock.
pub struct Timers<C> {
    now_ms: u64,
    next_id: u64,
    next_order: u64,
    queue: Vec<Scheduled<C>>,
}

impl<C> Default for Timers<C> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            next_id: 1,
            next_order: 0,
            queue: Vec::new(),
        }
    }
}

impl<C> fmt::Debug for Timers<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timers")
            .field("now_ms", &self.now_ms)
            .field("pending", &self.queue.len())
            .finish()
    }
}

impl<C> Timers<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Schedule `callback` to become due `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, callback: C) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let order = self.next_order;
        self.next_order += 1;

        self.queue.push(Scheduled {
            id,
            due_at: self.now_ms.saturating_add(delay_ms),
            order,
            callback,
        });
        id
    }

    /// Drop a pending callback. Returns whether it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|task| task.id != id);
        self.queue.len() != before
    }

    /// Move the clock to `target_ms`. Never moves backwards.
    pub fn set_now(&mut self, target_ms: u64) {
        self.now_ms = self.now_ms.max(target_ms);
    }

    /// Remove and return the earliest callback due at or before `limit_ms`.
    ///
    /// The clock is moved to the callback's due time, so callbacks scheduled
    /// from inside it are relative to when it fired.
    pub fn pop_due(&mut self, limit_ms: u64) -> Option<(TimerId, C)> {
        let index = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due_at <= limit_ms)
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(index, _)| index)?;

        let task = self.queue.remove(index);
        self.now_ms = self.now_ms.max(task.due_at);
        Some((task.id, task.callback))
    }
}
