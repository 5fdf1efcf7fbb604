use std::time::Duration;

/// Whole-second countdown fed by arbitrary tick deltas.
#[derive(Clone, Debug)]
pub struct Countdown {
    remaining_secs: u32,
    carry: Duration,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining_secs: seconds,
            carry: Duration::ZERO,
        }
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_secs == 0
    }

    /// Advance by `elapsed`; returns true once the countdown has reached zero.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        self.carry += elapsed;
        let whole = self.carry.as_secs();
        if whole > 0 {
            self.carry -= Duration::from_secs(whole);
            let whole = u32::try_from(whole).unwrap_or(u32::MAX);
            self.remaining_secs = self.remaining_secs.saturating_sub(whole);
        }
        self.is_expired()
    }

    /// "MM:SS"
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }
}
