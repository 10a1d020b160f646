use thiserror::Error;

/// Failure of a single sensor acquisition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SensorError {
    /// The sensor did not answer within the driver's timing window.
    #[error("sensor timed out")]
    Timeout,
    /// The frame arrived but its checksum did not match.
    #[error("sensor checksum mismatch")]
    Checksum,
    /// The driver reported a value that is not a finite number.
    #[error("sensor returned non-finite values (temperature={temperature}, humidity={humidity})")]
    InvalidValue { temperature: f32, humidity: f32 },
    /// Any other bus or pin level failure.
    #[error("sensor bus error: {0}")]
    Bus(String),
}

/// The link stayed down for the whole reconnect budget of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConnectivityError {
    #[error("link still down after {attempts} reconnect attempts")]
    GaveUp { attempts: u32 },
}

/// Failure reported by the transport client before any status code was seen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("failed to open connection: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("failed to read response: {0}")]
    Io(String),
}

/// Why a delivery attempt did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryFailure {
    /// The transport answered with a non-positive code (connection refused, DNS failure, ...).
    #[error("collector answered with non-positive code {0}")]
    Status(i32),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("failed to encode payload: {0}")]
    Encode(String),
}
