//! Typing speed over a sliding time window
//!
//! Timestamps are supplied by the host as the elapsed time since any fixed
//! origin; nothing here reads a clock.

use std::collections::VecDeque;
use std::time::Duration;

use crate::registry::Event;

/// Characters per word in the conventional WPM definition
const CHARS_PER_WORD: f32 = 5.0;

/// Keystroke rate tracker
#[derive(Debug, Clone)]
pub struct KeystrokeRate {
    window: Duration,
    include_rejected: bool,
    /// Times of counted inputs, oldest first
    stamps: VecDeque<Duration>,
}

impl Default for KeystrokeRate {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl KeystrokeRate {
    pub fn new(window: Duration) -> Self {
        Self {
            window: window.max(Duration::from_millis(1)),
            include_rejected: false,
            stamps: VecDeque::new(),
        }
    }

    /// Count rejected input towards the rate too
    pub fn include_rejected(mut self, include: bool) -> Self {
        self.include_rejected = include;
        self
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Account for one event observed at `now`
    pub fn record(&mut self, event: &Event, now: Duration) {
        let counted = match event {
            Event::InputProcessed { accepted: true, .. } => true,
            Event::InputProcessed { accepted: false, .. } => self.include_rejected,
            _ => false,
        };
        if counted {
            self.stamps.push_back(now);
        }
        self.expire(now);
    }

    /// Keys per minute at `now`
    pub fn keys_per_minute(&mut self, now: Duration) -> f32 {
        self.expire(now);
        self.stamps.len() as f32 * (60.0 / self.window.as_secs_f32())
    }

    /// Words per minute at `now`
    pub fn words_per_minute(&mut self, now: Duration) -> f32 {
        self.keys_per_minute(now) / CHARS_PER_WORD
    }

    pub fn clear(&mut self) {
        self.stamps.clear();
    }

    fn expire(&mut self, now: Duration) {
        while let Some(&oldest) = self.stamps.front() {
            if now.saturating_sub(oldest) > self.window {
                self.stamps.pop_front();
            } else {
                break;
            }
        }
    }
}
