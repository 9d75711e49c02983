//! The simulated calendar day and the level countdown.
//!
//! The host ticks the clock once per frame. Rewards from validated orders are
//! added back as seconds. Updates are whole-value replacements, so a plain
//! mutex is enough when the host ticks from another thread ([`SharedClock`]).

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Countdown plus the simulated date used for expiry comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameClock {
    today: NaiveDate,
    remaining: f32,
    paused: bool,
}

impl GameClock {
    /// A running clock on `today` with `seconds` left.
    pub fn new(today: NaiveDate, seconds: f32) -> Self {
        Self {
            today,
            remaining: seconds.max(0.0),
            paused: false,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Seconds left on the countdown.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_out_of_time(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Decrement the countdown by `dt` seconds unless paused. Never goes
    /// below zero. Returns the seconds left.
    pub fn tick(&mut self, dt: f32) -> f32 {
        if !self.paused && dt > 0.0 {
            self.remaining = (self.remaining - dt).max(0.0);
        }
        self.remaining
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Add (or, with a negative value, remove) seconds. Applies while paused.
    pub fn add_time(&mut self, seconds: f32) {
        self.remaining = (self.remaining + seconds).max(0.0);
    }

    /// Move the simulated date forward. Saturates at the end of the calendar.
    pub fn advance_days(&mut self, days: u64) {
        self.today = self
            .today
            .checked_add_days(Days::new(days))
            .unwrap_or(NaiveDate::MAX);
    }

    /// Replace the countdown, e.g. when a new level starts.
    pub fn reset(&mut self, seconds: f32) {
        self.remaining = seconds.max(0.0);
        self.paused = false;
    }
}

/// A [`GameClock`] behind a mutex for hosts that tick from another thread.
#[derive(Debug, Clone)]
pub struct SharedClock {
    inner: Arc<Mutex<GameClock>>,
}

impl SharedClock {
    pub fn new(clock: GameClock) -> Self {
        Self {
            inner: Arc::new(Mutex::new(clock)),
        }
    }

    /// A copy of the clock as it is right now.
    pub fn snapshot(&self) -> GameClock {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Run `f` with exclusive access to the clock.
    pub fn update<T>(&self, f: impl FnOnce(&mut GameClock) -> T) -> T {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn tick(&self, dt: f32) -> f32 {
        self.update(|c| c.tick(dt))
    }

    pub fn today(&self) -> NaiveDate {
        self.update(|c| c.today())
    }
}
