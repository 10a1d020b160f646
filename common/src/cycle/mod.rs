//! The three steps of one sampling cycle, in the order they run.

mod acquisition;
mod delivery;
mod guard;

pub use acquisition::acquire;
pub use delivery::{deliver, DeliveryOutcome};
pub use guard::{ConnectivityGuard, GuardState};
