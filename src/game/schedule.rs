//! Deferred callbacks on a logical clock.
//!
//! The host advances time explicitly; nothing fires on its own. Entries due
//! at the same instant fire in the order they were scheduled.

/// Handle to a scheduled entry, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Pending<T> {
    handle: TimerHandle,
    due_at: u64,
    payload: T,
}

/// A queue of payloads waiting for their due time.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: u64,
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: 0,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    /// Current logical time in milliseconds.
    #[must_use]
    pub const fn now(&self) -> u64 {
        self.now
    }

    /// Queue `payload` to fire `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            handle,
            due_at: self.now.saturating_add(delay_ms),
            payload,
        });
        handle
    }

    /// Drop a pending entry. Returns `false` if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|entry| entry.handle != handle);
        before != self.pending.len()
    }

    /// Number of pending entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Move the clock forward and return the payloads that came due, in
    /// firing order.
    pub fn advance(&mut self, ms: u64) -> Vec<T> {
        self.now = self.now.saturating_add(ms);
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|entry| entry.due_at <= now);
        self.pending = waiting;

        due.sort_by_key(|entry| (entry.due_at, entry.handle.0));
        due.into_iter().map(|entry| entry.payload).collect()
    }
}
