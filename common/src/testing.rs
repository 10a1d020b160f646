//! Fakes for the collaborators. Every fake is a cheap handle over shared state, so a test
//! can hand one clone to the code under test and inspect the other.

use core::cell::{Cell, RefCell};
use core::time::Duration;
use std::collections::VecDeque;
use std::net::{IpAddr, Ipv4Addr};
use std::rc::Rc;

use crate::error::{SensorError, TransportError};
use crate::platform::{
    Clock, Delay, Indicator, Level, Link, LinkStatus, Response, Sensor, Transport,
};
use crate::status::{StatusEvent, StatusSink};

/// Time only moves when somebody waits.
#[derive(Clone, Default)]
pub struct ManualClock(Rc<Cell<Duration>>);

impl ManualClock {
    pub fn set(&self, now: Duration) {
        self.0.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.0.get()
    }
}

impl Delay for ManualClock {
    fn delay(&mut self, duration: Duration) {
        self.advance(duration);
    }
}

#[derive(Clone, Default)]
pub struct RecordingIndicator(Rc<RefCell<Vec<Level>>>);

impl RecordingIndicator {
    pub fn levels(&self) -> Vec<Level> {
        self.0.borrow().clone()
    }
}

impl Indicator for RecordingIndicator {
    fn set_level(&mut self, level: Level) {
        self.0.borrow_mut().push(level);
    }
}

#[derive(Clone, Default)]
pub struct RecordingStatus(Rc<RefCell<Vec<StatusEvent>>>);

impl RecordingStatus {
    pub fn events(&self) -> Vec<StatusEvent> {
        self.0.borrow().clone()
    }

    pub fn count(&self, event: StatusEvent) -> usize {
        self.0.borrow().iter().filter(|e| **e == event).count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl StatusSink for RecordingStatus {
    fn signal(&mut self, event: StatusEvent) {
        self.0.borrow_mut().push(event);
    }
}

#[derive(Default)]
struct LinkState {
    connected: bool,
    /// Status polls needed after a (re)connect before the link reports `Connected`.
    comes_up_after: Option<u32>,
    pending: Option<u32>,
    status_polls: u32,
    connects: u32,
    reconnects: u32,
}

#[derive(Clone, Default)]
pub struct FakeLink(Rc<RefCell<LinkState>>);

impl FakeLink {
    pub fn connected() -> Self {
        let link = Self::default();
        link.0.borrow_mut().connected = true;
        link
    }

    /// A link that never comes up.
    pub fn down() -> Self {
        Self::default()
    }

    /// A link that reports `Connected` on the `polls`-th status poll after a reconnect.
    pub fn recovering_after(polls: u32) -> Self {
        let link = Self::default();
        link.0.borrow_mut().comes_up_after = Some(polls);
        link
    }

    pub fn drop_link(&self) {
        self.0.borrow_mut().connected = false;
    }

    pub fn status_polls(&self) -> u32 {
        self.0.borrow().status_polls
    }

    pub fn connects(&self) -> u32 {
        self.0.borrow().connects
    }

    pub fn reconnects(&self) -> u32 {
        self.0.borrow().reconnects
    }

    fn arm(&self) {
        let mut state = self.0.borrow_mut();
        state.pending = state.comes_up_after.map(|_| 0);
    }
}

impl Link for FakeLink {
    type Error = &'static str;

    fn connect(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().connects += 1;
        self.arm();
        Ok(())
    }

    fn status(&self) -> LinkStatus {
        let mut state = self.0.borrow_mut();
        state.status_polls += 1;

        if !state.connected {
            if let (Some(polls), Some(needed)) = (state.pending, state.comes_up_after) {
                let polls = polls + 1;
                state.pending = Some(polls);
                if polls >= needed {
                    state.connected = true;
                    state.pending = None;
                }
            }
        }

        if state.connected {
            LinkStatus::Connected
        } else {
            LinkStatus::Disconnected
        }
    }

    fn reconnect(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().reconnects += 1;
        self.arm();
        Ok(())
    }

    fn local_address(&self) -> Option<IpAddr> {
        self.0
            .borrow()
            .connected
            .then_some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 42)))
    }
}

struct SensorState {
    temperature: Result<f32, SensorError>,
    humidity: Result<f32, SensorError>,
    reads: u32,
}

#[derive(Clone)]
pub struct FakeSensor(Rc<RefCell<SensorState>>);

impl FakeSensor {
    pub fn new(temperature: Result<f32, SensorError>, humidity: Result<f32, SensorError>) -> Self {
        Self(Rc::new(RefCell::new(SensorState {
            temperature,
            humidity,
            reads: 0,
        })))
    }

    pub fn reading(temperature: f32, humidity: f32) -> Self {
        Self::new(Ok(temperature), Ok(humidity))
    }

    pub fn set(&self, temperature: Result<f32, SensorError>, humidity: Result<f32, SensorError>) {
        let mut state = self.0.borrow_mut();
        state.temperature = temperature;
        state.humidity = humidity;
    }

    /// Number of individual value reads.
    pub fn reads(&self) -> u32 {
        self.0.borrow().reads
    }
}

impl Sensor for FakeSensor {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        let mut state = self.0.borrow_mut();
        state.reads += 1;
        state.temperature.clone()
    }

    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        let mut state = self.0.borrow_mut();
        state.reads += 1;
        state.humidity.clone()
    }
}

#[derive(Default)]
struct TransportState {
    script: VecDeque<Result<Response, TransportError>>,
    requests: Vec<(String, String)>,
}

/// Answers from a script, then with `200 OK` once the script runs dry.
#[derive(Clone, Default)]
pub struct FakeTransport(Rc<RefCell<TransportState>>);

impl FakeTransport {
    pub fn answering(status: i32) -> Self {
        let transport = Self::default();
        transport.push(Ok(Response {
            status,
            body: r#"{"status":"OK"}"#.into(),
        }));
        transport
    }

    pub fn failing(error: TransportError) -> Self {
        let transport = Self::default();
        transport.push(Err(error));
        transport
    }

    pub fn push(&self, answer: Result<Response, TransportError>) {
        self.0.borrow_mut().script.push_back(answer);
    }

    /// Every `(url, body)` posted so far.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.0.borrow().requests.clone()
    }
}

impl Transport for FakeTransport {
    fn post_json(&mut self, url: &str, body: &str) -> Result<Response, TransportError> {
        let mut state = self.0.borrow_mut();
        state.requests.push((url.to_owned(), body.to_owned()));
        state.script.pop_front().unwrap_or_else(|| {
            Ok(Response {
                status: 200,
                body: String::new(),
            })
        })
    }
}
