use core::time::Duration;

use crate::platform::Delay;

/// Result of a bounded retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Retry {
    /// The attempt with this 1-based number succeeded.
    Succeeded { attempt: u32 },
    /// Every attempt failed.
    Exhausted { attempts: u32 },
}

/// Fixed-pause bounded retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Backoff {
    pub attempts: u32,
    pub pause: Duration,
}

impl Backoff {
    pub const fn new(attempts: u32, pause: Duration) -> Self {
        Self { attempts, pause }
    }

    /// Calls `attempt` with the 1-based attempt number until it returns `true` or the
    /// attempt budget is spent. Every failed attempt is followed by one pause.
    pub fn retry<D, F>(&self, delay: &mut D, mut attempt: F) -> Retry
    where
        D: Delay + ?Sized,
        F: FnMut(u32) -> bool,
    {
        for n in 1..=self.attempts {
            if attempt(n) {
                return Retry::Succeeded { attempt: n };
            }
            delay.delay(self.pause);
        }

        Retry::Exhausted {
            attempts: self.attempts,
        }
    }
}
