#[cfg(test)]
pub mod timer_test;

use std::{collections::HashMap, fmt::Debug, hash::Hash};

/// Milliseconds on the navigator's monotonic clock. The clock starts at zero
/// when the navigator is created and only moves forward.
pub type Millis = u64;

/// A single scheduled timer
#[derive(Debug, Clone, Copy, PartialEq)]
struct Timer {
    /// Time at which the timer should next fire
    deadline: Millis,
    /// Interval timers are re-armed after firing, timeouts are removed
    period: Option<Millis>,
    /// Insertion order used to break ties between equal deadlines
    sequence: u64,
}

/// A [TimerSet] is one timer domain. Each key may have at most one active
/// timer; scheduling a key that already has a timer replaces it. Nothing in
/// a [TimerSet] ever fires on its own: the owner asks for the next due timer
/// with [TimerSet::pop_due] and handles it.
#[derive(Debug)]
pub struct TimerSet<K> {
    timers: HashMap<K, Timer>,
    sequence: u64,
}

impl<K> Default for TimerSet<K> {
    fn default() -> Self {
        Self {
            timers: HashMap::new(),
            sequence: 0,
        }
    }
}

impl<K> TimerSet<K>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a periodic timer for the given key that first fires one
    /// period from `now`. Any existing timer for the key is cleared first.
    pub fn set_interval(&mut self, key: K, now: Millis, period: Millis) {
        let period = period.max(1);
        self.insert(key, now.saturating_add(period), Some(period));
    }

    /// Schedule a one-shot timer for the given key. Any existing timer for
    /// the key is cleared first.
    pub fn set_timeout(&mut self, key: K, now: Millis, delay: Millis) {
        self.insert(key, now.saturating_add(delay), None);
    }

    fn insert(&mut self, key: K, deadline: Millis, period: Option<Millis>) {
        if self.timers.contains_key(&key) {
            log::trace!("Replacing timer for {key:?}");
        }
        self.sequence += 1;
        let timer = Timer {
            deadline,
            period,
            sequence: self.sequence,
        };
        self.timers.insert(key, timer);
    }

    /// Clear the timer for the given key. Returns true if a timer was active.
    pub fn clear(&mut self, key: &K) -> bool {
        self.timers.remove(key).is_some()
    }

    /// Clear every timer in this domain
    pub fn clear_all(&mut self) {
        self.timers.clear();
    }

    /// Returns true if the given key has an active timer
    pub fn is_active(&self, key: &K) -> bool {
        self.timers.contains_key(key)
    }

    /// Returns the number of active timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Returns the earliest deadline of any active timer
    pub fn next_deadline(&self) -> Option<Millis> {
        self.earliest().map(|(_, timer)| timer.deadline)
    }

    fn earliest(&self) -> Option<(&K, &Timer)> {
        self.timers
            .iter()
            .min_by_key(|(_, timer)| (timer.deadline, timer.sequence))
    }

    /// Remove and return the earliest timer that is due at `now`, along with
    /// the deadline it was scheduled for. Interval timers are re-armed one
    /// period after their deadline.
    pub fn pop_due(&mut self, now: Millis) -> Option<(K, Millis)> {
        let (key, timer) = self.earliest()?;
        if timer.deadline > now {
            return None;
        }
        let key = key.clone();
        let timer = *timer;

        match timer.period {
            Some(period) => {
                self.sequence += 1;
                let next = Timer {
                    deadline: timer.deadline.saturating_add(period),
                    period: Some(period),
                    sequence: self.sequence,
                };
                self.timers.insert(key.clone(), next);
            }
            None => {
                self.timers.remove(&key);
            }
        }

        Some((key, timer.deadline))
    }
}
