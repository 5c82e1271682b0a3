//! Expiration Scheduler Module
//!
//! Batches TTL bookkeeping into fixed-width epochs so that expiring entries
//! costs one bucket push per `set` and one bucket drain per elapsed epoch,
//! independent of how many live entries the cache holds.

use std::collections::HashMap;
use std::time::{Duration, Instant};

// == Public Constants ==
/// Epoch numbers are taken modulo this bound.
///
/// Past this many epochs since inception, numbers cycle. A bucket that was
/// never swept before its number comes round again merges with the new one;
/// each key is still re-validated against its entry, so the only loss is a
/// delayed sweep for that key (the lazy check on `get` still applies).
pub const EPOCH_WRAP: u64 = i64::MAX as u64 - 10;

// == Expiration Scheduler ==
/// Maps epoch numbers to the keys whose expiration falls inside them.
///
/// Epoch 0 is never produced for a timestamp at or after inception and acts
/// as the "nothing completed yet" sentinel.
#[derive(Debug)]
pub struct ExpirationScheduler<K> {
    inception: Instant,
    interval: Duration,
    pending: HashMap<u64, Vec<K>>,
    last_swept: Option<u64>,
    wrap: u64,
}

impl<K> ExpirationScheduler<K> {
    // == Constructor ==
    /// Creates a scheduler whose epochs are `interval` wide, counted from
    /// `inception`.
    pub fn new(inception: Instant, interval: Duration) -> Self {
        Self::with_wrap(inception, interval, EPOCH_WRAP)
    }

    pub(crate) fn with_wrap(inception: Instant, interval: Duration, wrap: u64) -> Self {
        Self {
            inception,
            interval,
            pending: HashMap::new(),
            last_swept: None,
            wrap: wrap.max(2),
        }
    }

    // == Epoch Of ==
    /// Returns the epoch number containing `at`.
    ///
    /// `floor((at - inception) / interval) + 1`, modulo the wrap bound.
    pub fn epoch_of(&self, at: Instant) -> u64 {
        let elapsed = at.saturating_duration_since(self.inception).as_nanos();
        let width = self.interval.as_nanos().max(1);
        ((elapsed / width + 1) % u128::from(self.wrap)) as u64
    }

    // == Schedule ==
    /// Records that `key` should be checked once the epoch of `expire_at`
    /// has fully elapsed.
    pub fn schedule(&mut self, key: K, expire_at: Instant) {
        let epoch = self.epoch_of(expire_at);
        self.pending.entry(epoch).or_default().push(key);
    }

    // == Take Due ==
    /// Drains every bucket from the one after the last swept epoch up to the
    /// most recent fully elapsed epoch, returning their keys in epoch order.
    ///
    /// The keys are candidates only: an entry may have been re-set or removed
    /// since it was scheduled, so the caller must re-check each one.
    pub fn take_due(&mut self, now: Instant) -> Vec<K> {
        let current = self.epoch_of(now);
        if current == 0 {
            return Vec::new();
        }
        let completed = current - 1;
        if self.last_swept == Some(completed) {
            return Vec::new();
        }

        let start = self.last_swept.map_or(0, |epoch| self.next(epoch));
        let span = (completed + self.wrap - start) % self.wrap + 1;

        let mut due = Vec::new();
        if span <= self.pending.len() as u64 {
            let stop = self.next(completed);
            let mut epoch = start;
            while epoch != stop {
                if let Some(keys) = self.pending.remove(&epoch) {
                    due.extend(keys);
                }
                epoch = self.next(epoch);
            }
        } else {
            // Fewer buckets than epochs to walk: visit the buckets instead.
            let mut epochs: Vec<u64> = self
                .pending
                .keys()
                .copied()
                .filter(|&epoch| (epoch + self.wrap - start) % self.wrap < span)
                .collect();
            epochs.sort_by_key(|&epoch| (epoch + self.wrap - start) % self.wrap);
            for epoch in epochs {
                if let Some(keys) = self.pending.remove(&epoch) {
                    due.extend(keys);
                }
            }
        }

        self.last_swept = Some(completed);
        due
    }

    // == Clear ==
    /// Drops every pending bucket and forgets sweep progress.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.last_swept = None;
    }

    /// Number of epochs that currently hold scheduled keys.
    pub fn pending_epochs(&self) -> usize {
        self.pending.len()
    }

    /// The most recent epoch already swept, if any.
    pub fn last_swept(&self) -> Option<u64> {
        self.last_swept
    }

    /// Epoch width, which is also the sweep cadence.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn next(&self, epoch: u64) -> u64 {
        (epoch + 1) % self.wrap
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(100);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_epoch_of_reserves_zero() {
        let start = Instant::now();
        let scheduler: ExpirationScheduler<&str> = ExpirationScheduler::new(start, INTERVAL);

        assert_eq!(scheduler.epoch_of(start), 1);
        assert_eq!(scheduler.epoch_of(start + ms(99)), 1);
        assert_eq!(scheduler.epoch_of(start + ms(100)), 2);
        assert_eq!(scheduler.epoch_of(start + ms(1_050)), 11);
    }

    #[test]
    fn test_epoch_of_wraps() {
        let start = Instant::now();
        let scheduler: ExpirationScheduler<&str> =
            ExpirationScheduler::with_wrap(start, INTERVAL, 5);

        assert_eq!(scheduler.epoch_of(start + ms(350)), 4);
        assert_eq!(scheduler.epoch_of(start + ms(450)), 0);
        assert_eq!(scheduler.epoch_of(start + ms(550)), 1);
    }

    #[test]
    fn test_schedule_groups_by_epoch() {
        let start = Instant::now();
        let mut scheduler = ExpirationScheduler::new(start, INTERVAL);

        scheduler.schedule("a", start + ms(110));
        scheduler.schedule("b", start + ms(190));
        scheduler.schedule("c", start + ms(210));

        assert_eq!(scheduler.pending_epochs(), 2);
    }

    #[test]
    fn test_take_due_nothing_before_first_epoch_completes() {
        let start = Instant::now();
        let mut scheduler = ExpirationScheduler::new(start, INTERVAL);
        scheduler.schedule("a", start + ms(10));

        assert!(scheduler.take_due(start + ms(50)).is_empty());
        assert_eq!(scheduler.pending_epochs(), 1);
    }

    #[test]
    fn test_take_due_only_completed_epochs() {
        let start = Instant::now();
        let mut scheduler = ExpirationScheduler::new(start, INTERVAL);
        scheduler.schedule("a", start + ms(50)); // epoch 1
        scheduler.schedule("b", start + ms(150)); // epoch 2
        scheduler.schedule("c", start + ms(250)); // epoch 3

        // Now in epoch 3, so epochs 1 and 2 are complete
        let due = scheduler.take_due(start + ms(260));
        assert_eq!(due, vec!["a", "b"]);
        assert_eq!(scheduler.last_swept(), Some(2));
        assert_eq!(scheduler.pending_epochs(), 1);

        // Same epoch again: nothing new
        assert!(scheduler.take_due(start + ms(290)).is_empty());

        let due = scheduler.take_due(start + ms(300));
        assert_eq!(due, vec!["c"]);
        assert_eq!(scheduler.pending_epochs(), 0);
    }

    #[test]
    fn test_take_due_keeps_repeated_keys() {
        let start = Instant::now();
        let mut scheduler = ExpirationScheduler::new(start, INTERVAL);
        scheduler.schedule("a", start + ms(50));
        scheduler.schedule("a", start + ms(150));

        let due = scheduler.take_due(start + ms(500));
        assert_eq!(due, vec!["a", "a"]);
    }

    #[test]
    fn test_take_due_long_gap_visits_buckets_in_order() {
        let start = Instant::now();
        let mut scheduler = ExpirationScheduler::new(start, INTERVAL);
        scheduler.schedule("late", start + Duration::from_secs(900));
        scheduler.schedule("early", start + ms(150));
        scheduler.schedule("future", start + Duration::from_secs(5_000));

        let due = scheduler.take_due(start + Duration::from_secs(1_000));
        assert_eq!(due, vec!["early", "late"]);
        assert_eq!(scheduler.last_swept(), Some(10_000));
        assert_eq!(scheduler.pending_epochs(), 1);
    }

    #[test]
    fn test_take_due_across_wraparound() {
        let start = Instant::now();
        let mut scheduler = ExpirationScheduler::with_wrap(start, INTERVAL, 5);

        scheduler.schedule("a", start + ms(380)); // epoch 4
        assert!(scheduler.take_due(start + ms(360)).is_empty());
        assert_eq!(scheduler.last_swept(), Some(3));

        // Epoch number 0 is the sentinel: no completed epoch is reported
        assert!(scheduler.take_due(start + ms(450)).is_empty());

        // Epoch 1 (wrapped) means 4 and 0 are complete
        let due = scheduler.take_due(start + ms(550));
        assert_eq!(due, vec!["a"]);
        assert_eq!(scheduler.last_swept(), Some(0));
    }

    #[test]
    fn test_clear_resets_progress() {
        let start = Instant::now();
        let mut scheduler = ExpirationScheduler::new(start, INTERVAL);
        scheduler.schedule("a", start + ms(50));
        let _ = scheduler.take_due(start + ms(500));
        scheduler.schedule("b", start + ms(550));

        scheduler.clear();

        assert_eq!(scheduler.pending_epochs(), 0);
        assert_eq!(scheduler.last_swept(), None);
    }
}
