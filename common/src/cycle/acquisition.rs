use crate::error::SensorError;
use crate::platform::Sensor;
use crate::reading::Reading;
use crate::status::{StatusEvent, StatusSink};

fn read<S: Sensor + ?Sized>(sensor: &mut S) -> Result<Reading, SensorError> {
    let humidity = sensor.read_humidity()?;
    let temperature = sensor.read_temperature()?;

    Reading::new(temperature, humidity)
}

/// Reads the sensor once.
///
/// An invalid read is logged and signalled as [`StatusEvent::SensorError`], and yields `None`.
pub fn acquire<S, T>(sensor: &mut S, status: &mut T) -> Option<Reading>
where
    S: Sensor + ?Sized,
    T: StatusSink + ?Sized,
{
    match read(sensor) {
        Ok(reading) => {
            log::info!(
                "Temp: {:.2}°C, Humidity: {:.2}%",
                reading.temperature(),
                reading.humidity()
            );
            Some(reading)
        }
        Err(e) => {
            log::warn!("Error reading sensor: {}", e);
            status.signal(StatusEvent::SensorError);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeSensor, RecordingStatus};

    #[test]
    fn valid_read_yields_reading() {
        let mut sensor = FakeSensor::reading(23.5, 41.2);
        let mut status = RecordingStatus::default();

        let reading = acquire(&mut sensor, &mut status).unwrap();

        assert_eq!(reading.temperature(), 23.5);
        assert_eq!(reading.humidity(), 41.2);
        assert!(status.events().is_empty());
    }

    #[test]
    fn nan_temperature_yields_nothing() {
        let mut sensor = FakeSensor::reading(f32::NAN, 41.2);
        let mut status = RecordingStatus::default();

        assert_eq!(acquire(&mut sensor, &mut status), None);
        assert_eq!(status.events(), vec![StatusEvent::SensorError]);
    }

    #[test]
    fn driver_error_short_circuits() {
        let mut sensor = FakeSensor::new(Ok(23.5), Err(SensorError::Checksum));
        let mut status = RecordingStatus::default();

        assert_eq!(acquire(&mut sensor, &mut status), None);
        // Humidity is read first, so temperature is never asked for.
        assert_eq!(sensor.reads(), 1);
        assert_eq!(status.events(), vec![StatusEvent::SensorError]);
    }

    #[test]
    fn bus_error_is_a_sensor_fault() {
        let mut sensor = FakeSensor::new(Ok(23.5), Err(SensorError::Bus("gpio error 259".into())));
        let mut status = RecordingStatus::default();

        assert_eq!(acquire(&mut sensor, &mut status), None);
        assert_eq!(status.events(), vec![StatusEvent::SensorError]);
    }

    #[test]
    fn out_of_range_humidity_is_not_checked() {
        let mut sensor = FakeSensor::reading(21.0, 104.5);
        let mut status = RecordingStatus::default();

        assert!(acquire(&mut sensor, &mut status).is_some());
    }
}
