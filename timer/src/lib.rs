//! A single 1Hz tick source driving per-machine countdown timers.
//!
//! The standards express timer behavior as "while" counters: decrement
//! once per second, and when a counter reaches zero, do something. This
//! crate models exactly that and nothing more — no timer threads, no
//! real-time wakeups scattered across machines. One [`TickSource`] feeds
//! every [`TimerBank`] in the process, which keeps tests deterministic
//! and avoids thread-per-port costs at scale.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Interval;

/// Where the next 1Hz tick comes from. Production code drives the state
/// machines off [`TickSource::real_time`]; tests drive them off
/// [`TickSource::manual`] so timer-boundary behavior is reproducible.
pub enum TickSource {
    RealTime(Interval),
    Manual(mpsc::Receiver<()>),
}

impl TickSource {
    pub fn real_time() -> Self {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        TickSource::RealTime(interval)
    }

    /// Returns a manual tick source paired with a [`ManualTicker`] handle
    /// tests use to advance it one second at a time.
    pub fn manual() -> (Self, ManualTicker) {
        let (tx, rx) = mpsc::channel(1);
        (TickSource::Manual(rx), ManualTicker(tx))
    }

    /// Waits for the next tick.
    pub async fn tick(&mut self) {
        match self {
            TickSource::RealTime(interval) => {
                interval.tick().await;
            }
            TickSource::Manual(rx) => {
                rx.recv().await;
            }
        }
    }
}

/// Test handle that fires one manual tick.
#[derive(Clone)]
pub struct ManualTicker(mpsc::Sender<()>);

impl ManualTicker {
    /// Advance the paired [`TickSource`] by exactly one second.
    pub async fn fire(&self) {
        // A full channel means the consumer hasn't drained the previous
        // tick yet; block rather than drop it so ticks are never lost.
        let _ = self.0.send(()).await;
    }
}

/// A bank of independent countdown timers for one state machine, keyed by
/// whatever timer-identifier enum the machine defines (e.g. `current_while`,
/// `periodic`, `wait_while`).
///
/// A timer that has never been started, or that has counted down to zero,
/// is "expired". `start` re-arms it; `stop` is idempotent.
pub struct TimerBank<K> {
    remaining: HashMap<K, u32>,
}

impl<K: Eq + Hash + Copy> Default for TimerBank<K> {
    fn default() -> Self {
        TimerBank {
            remaining: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Copy> TimerBank<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `timer` to fire `seconds` ticks from now. `seconds == 0` is
    /// equivalent to `stop` immediately followed by expiry on the next
    /// poll — callers that want an edge-triggered "fire now" should post
    /// the event directly instead of starting a zero-length timer.
    pub fn start(&mut self, timer: K, seconds: u32) {
        self.remaining.insert(timer, seconds);
    }

    /// Cancel `timer`. Calling this on a timer that isn't running is a
    /// no-op, per the "double-stop is idempotent" error-handling rule.
    pub fn stop(&mut self, timer: K) {
        self.remaining.remove(&timer);
    }

    /// `true` if `timer` is not currently counting down (never started,
    /// explicitly stopped, or counted down to zero).
    pub fn expired(&self, timer: K) -> bool {
        !self.remaining.contains_key(&timer)
    }

    /// Seconds remaining, or `None` if the timer isn't running.
    pub fn remaining(&self, timer: K) -> Option<u32> {
        self.remaining.get(&timer).copied()
    }

    /// Decrement every running timer by one second. Returns the timers
    /// that reached zero on this tick, removing them from the bank so a
    /// subsequent `expired` call observes `true`.
    ///
    /// A timer armed for `N` seconds expires on the `N`th call to `tick`:
    /// armed at 1 expires on the very next tick; armed at 0 would never
    /// observe a countdown and should not be used (see `start`).
    pub fn advance(&mut self) -> Vec<K> {
        let mut fired = Vec::new();
        self.remaining.retain(|&timer, secs| {
            *secs = secs.saturating_sub(1);
            if *secs == 0 {
                fired.push(timer);
                false
            } else {
                true
            }
        });
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum T {
        A,
        B,
    }

    #[test]
    fn fresh_timer_is_expired() {
        let bank: TimerBank<T> = TimerBank::new();
        assert!(bank.expired(T::A));
    }

    #[test]
    fn one_does_not_fire_until_the_next_tick() {
        let mut bank = TimerBank::new();
        bank.start(T::A, 1);
        assert!(!bank.expired(T::A));
        assert_eq!(bank.remaining(T::A), Some(1));
        let fired = bank.advance();
        assert_eq!(fired, vec![T::A]);
        assert!(bank.expired(T::A));
    }

    #[test]
    fn three_second_timer_fires_on_third_tick() {
        let mut bank = TimerBank::new();
        bank.start(T::A, 3);
        assert!(bank.advance().is_empty());
        assert!(bank.advance().is_empty());
        assert_eq!(bank.advance(), vec![T::A]);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut bank: TimerBank<T> = TimerBank::new();
        bank.stop(T::A);
        bank.start(T::A, 5);
        bank.stop(T::A);
        bank.stop(T::A);
        assert!(bank.expired(T::A));
    }

    #[test]
    fn independent_timers_do_not_interfere() {
        let mut bank = TimerBank::new();
        bank.start(T::A, 2);
        bank.start(T::B, 1);
        let fired = bank.advance();
        assert_eq!(fired, vec![T::B]);
        assert!(!bank.expired(T::A));
        assert!(bank.expired(T::B));
    }

    #[tokio::test]
    async fn manual_tick_source_advances_on_fire() {
        let (mut source, ticker) = TickSource::manual();
        let handle = tokio::spawn(async move {
            source.tick().await;
            1u8
        });
        ticker.fire().await;
        assert_eq!(handle.await.unwrap(), 1);
    }
}
