use crate::config::{BASE_DELAY, CAP_DELAY, CONSTANT_DELAY};
use crate::error::ParseStrategyError;
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Retry-delay policy applied by every client after a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Retry almost immediately, ignoring history.
    Constant,
    /// Exponential backoff, capped.
    Backoff,
    /// Full jitter: uniform in `[0, backoff)`.
    Jitter,
    /// Decorrelated jitter: each delay seeded by the previous one.
    Decorrelated,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Constant,
        Strategy::Backoff,
        Strategy::Jitter,
        Strategy::Decorrelated,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Constant => "constant",
            Strategy::Backoff => "backoff",
            Strategy::Jitter => "jitter",
            Strategy::Decorrelated => "decorrelated",
        }
    }

    /// Delay to sleep before the next attempt.
    ///
    /// `attempt` is the number of rejections seen so far and `previous` the
    /// delay slept after the last one. Only `Jitter` and `Decorrelated`
    /// draw from `rng`.
    pub fn next_delay<R: Rng + ?Sized>(
        &self,
        attempt: u32,
        previous: Duration,
        rng: &mut R,
    ) -> Duration {
        match self {
            Strategy::Constant => CONSTANT_DELAY,
            Strategy::Backoff => backoff(attempt),
            Strategy::Jitter => {
                let ceiling = backoff(attempt);
                if ceiling.is_zero() {
                    return Duration::ZERO;
                }
                Duration::from_nanos(rng.gen_range(0..nanos(ceiling)))
            }
            Strategy::Decorrelated => {
                let upper = previous.max(BASE_DELAY).saturating_mul(3);
                let drawn = Duration::from_nanos(rng.gen_range(nanos(BASE_DELAY)..nanos(upper)));
                drawn.clamp(BASE_DELAY, CAP_DELAY)
            }
        }
    }
}

fn backoff(attempt: u32) -> Duration {
    // Shifts of 32 or more saturate; the cap is reached long before that.
    let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
    BASE_DELAY.saturating_mul(factor).min(CAP_DELAY)
}

fn nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| ParseStrategyError { name: s.to_string() })
    }
}
