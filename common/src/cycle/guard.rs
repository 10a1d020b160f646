use crate::backoff::{Backoff, Retry};
use crate::error::ConnectivityError;
use crate::platform::{Delay, Link, LinkStatus};
use crate::status::{StatusEvent, StatusSink};

/// Where the guard is in its reconnect state machine.
///
/// `GaveUp` only ends the current cycle: the next call to
/// [`ConnectivityGuard::ensure_connected`] starts over from `Disconnected`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GuardState {
    #[default]
    Disconnected,
    Reconnecting {
        attempt: u32,
    },
    Connected,
    GaveUp {
        attempts: u32,
    },
}

/// Makes sure the link is up before a cycle goes on.
#[derive(Clone, Debug)]
pub struct ConnectivityGuard {
    policy: Backoff,
    state: GuardState,
}

impl ConnectivityGuard {
    pub fn new(policy: Backoff) -> Self {
        Self {
            policy,
            state: GuardState::default(),
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Returns immediately if the link is connected. Otherwise triggers one reconnect and
    /// polls the link status up to the policy's attempt cap, signalling `Connecting` and
    /// pausing after every poll that still finds the link down.
    pub fn ensure_connected<L, S, D>(
        &mut self,
        link: &mut L,
        status: &mut S,
        delay: &mut D,
    ) -> Result<(), ConnectivityError>
    where
        L: Link + ?Sized,
        S: StatusSink + ?Sized,
        D: Delay + ?Sized,
    {
        if link.status() == LinkStatus::Connected {
            self.state = GuardState::Connected;
            return Ok(());
        }

        self.state = GuardState::Disconnected;
        log::warn!("Link down, reconnecting");

        if let Err(e) = link.reconnect() {
            log::warn!("Reconnect request failed: {}", e);
        }

        let state = &mut self.state;
        let result = self.policy.retry(delay, |attempt| {
            *state = GuardState::Reconnecting { attempt };
            if link.status() == LinkStatus::Connected {
                return true;
            }
            status.signal(StatusEvent::Connecting);
            false
        });

        match result {
            Retry::Succeeded { attempt } => {
                self.state = GuardState::Connected;
                status.signal(StatusEvent::LinkRestored);
                log::info!("Link back after {} attempt(s)", attempt);
                Ok(())
            }
            Retry::Exhausted { attempts } => {
                self.state = GuardState::GaveUp { attempts };
                log::error!("Link still down after {} attempts, skipping cycle", attempts);
                Err(ConnectivityError::GaveUp { attempts })
            }
        }
    }
}
