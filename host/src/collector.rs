use serde_json::{json, Value};
use telemetry_agent_common::error::TransportError;
use telemetry_agent_common::platform::{Response, Transport};

/// Range the collector reports as "ok" for temperature, in °C.
const TEMP_IDEAL: (f64, f64) = (27.0, 35.0);
/// Range the collector reports as "ok" for humidity, in %.
const HUM_IDEAL: (f64, f64) = (40.0, 60.0);

/// A stand-in for the collector's `/update` endpoint.
///
/// Answers like the real service does and fails the connection now and then, so the agent's
/// failure path gets exercised too.
pub struct DummyCollector {
    rng: fastrand::Rng,
    /// Probability that a request does not reach the collector at all.
    unreachable: f32,
    received: usize,
}

impl DummyCollector {
    pub fn new(seed: u64, unreachable: f32) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            unreachable,
            received: 0,
        }
    }

    /// Number of readings accepted so far.
    pub fn received(&self) -> usize {
        self.received
    }

    fn handle(&mut self, body: &str) -> Response {
        let data: Value = match serde_json::from_str(body) {
            Ok(data) => data,
            Err(_) => return reply(400, json!({ "detail": "Invalid JSON" })),
        };

        for field in ["temp", "hum"] {
            if data.get(field).is_none() {
                return reply(
                    400,
                    json!({ "detail": format!("Missing required field: {field}") }),
                );
            }
        }

        let (Some(temp), Some(hum)) = (data["temp"].as_f64(), data["hum"].as_f64()) else {
            return reply(500, json!({ "detail": "temp and hum must be numbers" }));
        };

        self.received += 1;
        log::info!(
            "Collector received at {}: Temp={:.1}°C, Hum={:.1}%",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            temp,
            hum
        );

        reply(
            200,
            json!({
                "status": "OK",
                "message": "Data received",
                "tortoise_status": {
                    "temp_status": classify(temp, TEMP_IDEAL),
                    "hum_status": classify(hum, HUM_IDEAL),
                },
            }),
        )
    }
}

fn classify(value: f64, (min, max): (f64, f64)) -> &'static str {
    if (min..=max).contains(&value) {
        "ok"
    } else {
        "warning"
    }
}

fn reply(status: i32, body: Value) -> Response {
    Response {
        status,
        body: body.to_string(),
    }
}

impl Transport for DummyCollector {
    fn post_json(&mut self, url: &str, body: &str) -> Result<Response, TransportError> {
        if self.rng.f32() < self.unreachable {
            return Err(TransportError::Connect(format!("{url}: connection refused")));
        }

        Ok(self.handle(body))
    }
}
