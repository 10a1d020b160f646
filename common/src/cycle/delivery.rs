use crate::error::DeliveryFailure;
use crate::platform::Transport;
use crate::reading::Reading;
use crate::status::{StatusEvent, StatusSink};

/// What became of one delivery attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Success { status: i32, body: String },
    Failure(DeliveryFailure),
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Success { .. })
    }
}

/// Posts `reading` to `endpoint` exactly once.
///
/// The reading is consumed: on failure it is dropped, never retried or queued.
pub fn deliver<T, S>(
    transport: &mut T,
    endpoint: &str,
    reading: Reading,
    status: &mut S,
) -> DeliveryOutcome
where
    T: Transport + ?Sized,
    S: StatusSink + ?Sized,
{
    let payload = match reading.to_payload() {
        Ok(payload) => payload,
        Err(e) => {
            log::error!("Failed to encode reading: {}", e);
            status.signal(StatusEvent::SendFailure);
            return DeliveryOutcome::Failure(DeliveryFailure::Encode(e.to_string()));
        }
    };

    status.signal(StatusEvent::Sending);
    log::info!("-> POST {} {}", endpoint, payload);

    let outcome = match transport.post_json(endpoint, &payload) {
        Ok(response) if response.status > 0 => {
            if (200..300).contains(&response.status) {
                log::info!("<- {} {}", response.status, response.body);
            } else {
                log::warn!("<- {} {}", response.status, response.body);
            }
            DeliveryOutcome::Success {
                status: response.status,
                body: response.body,
            }
        }
        Ok(response) => {
            log::warn!("<- {} (no connection)", response.status);
            DeliveryOutcome::Failure(DeliveryFailure::Status(response.status))
        }
        Err(e) => {
            log::error!("POST to {} failed: {}", endpoint, e);
            DeliveryOutcome::Failure(e.into())
        }
    };

    status.signal(if outcome.is_success() {
        StatusEvent::SendSuccess
    } else {
        StatusEvent::SendFailure
    });

    outcome
}
