use telemetry_agent_common::error::SensorError;
use telemetry_agent_common::platform::Sensor;

/// Bit-banged DHT22 (AM2302) on a raw GPIO number.
pub struct DHT22 {
    pin: i32,
}

#[derive(Debug)]
pub enum DHT22Error {
    ChecksumError,
    TimeoutError,
    /// A GPIO call returned this `esp_err_t`.
    GpioError(esp_idf_svc::sys::esp_err_t),
}

impl From<DHT22Error> for SensorError {
    fn from(e: DHT22Error) -> Self {
        match e {
            DHT22Error::ChecksumError => SensorError::Checksum,
            DHT22Error::TimeoutError => SensorError::Timeout,
            DHT22Error::GpioError(code) => SensorError::Bus(format!("gpio error {code}")),
        }
    }
}

impl DHT22 {
    const MAX_DHT_DATA: usize = 5;

    pub fn new(pin: i32) -> Self {
        Self { pin }
    }

    /// Microseconds the line stays at `state`, or `None` after `max_wait`.
    fn signal_level(&self, max_wait: u32, state: i32) -> Option<u32> {
        use esp_idf_svc::sys::*;

        let mut u_sec = 0;
        unsafe {
            while gpio_get_level(self.pin) == state {
                u_sec += 1;
                if u_sec > max_wait {
                    return None;
                }
                ets_delay_us(1);
            }
        }

        Some(u_sec)
    }

    /// One bus transaction. Returns `(temperature, humidity)`.
    pub fn read(&self) -> Result<(f32, f32), DHT22Error> {
        use esp_idf_svc::sys::*;

        let mut dht_data = [0u8; Self::MAX_DHT_DATA];

        let check = |code: esp_err_t| {
            if code == ESP_OK {
                Ok(())
            } else {
                Err(DHT22Error::GpioError(code))
            }
        };

        unsafe {
            check(gpio_set_direction(self.pin, GPIO_MODE_DEF_OUTPUT))?;

            // pull down for 3 ms to wake the sensor
            check(gpio_set_level(self.pin, 0))?;
            ets_delay_us(3000);

            // pull up for 25 us to ask for data
            check(gpio_set_level(self.pin, 1))?;
            ets_delay_us(25);

            check(gpio_set_direction(self.pin, GPIO_MODE_DEF_INPUT))?;
        }

        // DHT answers with 80 us low, then 80 us high
        self.signal_level(85, 0).ok_or(DHT22Error::TimeoutError)?;
        self.signal_level(85, 1).ok_or(DHT22Error::TimeoutError)?;

        for bit in 0..40 {
            // every bit starts with a >50 us low
            self.signal_level(56, 0).ok_or(DHT22Error::TimeoutError)?;

            // a high longer than ~28 us is a one
            let u_sec = self.signal_level(75, 1).ok_or(DHT22Error::TimeoutError)?;
            if u_sec > 40 {
                dht_data[bit / 8] |= 1 << (7 - bit % 8);
            }
        }

        let checksum = dht_data[..4]
            .iter()
            .fold(0u8, |sum, byte| sum.wrapping_add(*byte));
        if checksum != dht_data[4] {
            return Err(DHT22Error::ChecksumError);
        }

        let humidity = u16::from_be_bytes([dht_data[0], dht_data[1]]) as f32 / 10.0;

        let mut temperature = u16::from_be_bytes([dht_data[2] & 0x7F, dht_data[3]]) as f32 / 10.0;
        if dht_data[2] & 0x80 != 0 {
            temperature = -temperature;
        }

        Ok((temperature, humidity))
    }
}

/// [`Sensor`] over a DHT22.
///
/// One transaction delivers both values: humidity triggers the read, temperature hands out
/// the value of that same read.
pub struct Dht22Sensor {
    dht: DHT22,
    last: Result<f32, SensorError>,
}

impl Dht22Sensor {
    pub fn new(pin: i32) -> Self {
        Self {
            dht: DHT22::new(pin),
            last: Err(SensorError::Timeout),
        }
    }
}

impl Sensor for Dht22Sensor {
    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        match self.dht.read() {
            Ok((temperature, humidity)) => {
                self.last = Ok(temperature);
                Ok(humidity)
            }
            Err(e) => {
                let e = SensorError::from(e);
                self.last = Err(e.clone());
                Err(e)
            }
        }
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.last.clone()
    }
}
