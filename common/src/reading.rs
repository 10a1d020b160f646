use serde::Serialize;

use crate::error::SensorError;

/// One validated temperature/humidity pair.
///
/// Serializes to the collector payload, `{"temp":23.5,"hum":41.2}`. The fields are private so
/// a `Reading` can only come out of [`Reading::new`], which rejects NaN and infinities.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Reading {
    #[serde(rename = "temp")]
    temperature: f32,
    #[serde(rename = "hum")]
    humidity: f32,
}

impl Reading {
    /// Validates a raw sensor pair. No range check is applied, only finiteness.
    pub fn new(temperature: f32, humidity: f32) -> Result<Self, SensorError> {
        if temperature.is_finite() && humidity.is_finite() {
            Ok(Self {
                temperature,
                humidity,
            })
        } else {
            Err(SensorError::InvalidValue {
                temperature,
                humidity,
            })
        }
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn humidity(&self) -> f32 {
        self.humidity
    }

    /// The JSON request body for this reading.
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_has_temp_then_hum() {
        let reading = Reading::new(23.5, 41.2).unwrap();

        assert_eq!(reading.to_payload().unwrap(), r#"{"temp":23.5,"hum":41.2}"#);
    }

    #[test]
    fn nan_is_rejected() {
        assert!(matches!(
            Reading::new(f32::NAN, 41.2),
            Err(SensorError::InvalidValue { .. })
        ));
        assert!(Reading::new(23.5, f32::NAN).is_err());
        assert!(Reading::new(f32::INFINITY, 41.2).is_err());
    }

    #[test]
    fn implausible_values_pass_through() {
        let reading = Reading::new(-40.0, 130.0).unwrap();

        assert_eq!(reading.humidity(), 130.0);
        assert_eq!(reading.to_payload().unwrap(), r#"{"temp":-40.0,"hum":130.0}"#);
    }
}
