use std::io::{self, ErrorKind};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use evdev::{AbsoluteAxisType, Device, InputEvent, InputEventKind, Key};
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StylusEvent {
    /// Raw pressure reading.
    Pressure { value: i32 },
    /// Barrel button; `pressed` is false on release.
    Button { pressed: bool },
}

fn translate(event: &InputEvent) -> Option<StylusEvent> {
    match event.kind() {
        InputEventKind::AbsAxis(AbsoluteAxisType::ABS_PRESSURE) => {
            Some(StylusEvent::Pressure { value: event.value() })
        }
        InputEventKind::Key(Key::BTN_STYLUS) => Some(StylusEvent::Button {
            pressed: event.value() != 0,
        }),
        _ => None,
    }
}

/// Sends the stylus events in `events`. Returns false once the receiver
/// is gone.
fn forward_events(
    events: impl IntoIterator<Item = InputEvent>,
    sender: &Sender<StylusEvent>,
) -> bool {
    events
        .into_iter()
        .filter_map(|event| translate(&event))
        .all(|stylus_event| sender.send(stylus_event).is_ok())
}

/// Pulls batches from `fetch` until the receiver hangs up (`Ok`) or the
/// device fails (`Err`). Interrupted and would-block reads are retried.
fn pump<F, I>(mut fetch: F, sender: &Sender<StylusEvent>) -> io::Result<()>
where
    F: FnMut() -> io::Result<I>,
    I: IntoIterator<Item = InputEvent>,
{
    loop {
        match fetch() {
            Ok(events) => {
                if !forward_events(events, sender) {
                    return Ok(());
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                thread::sleep(Duration::from_millis(10))
            }
            Err(e) => return Err(e),
        }
    }
}

/// Opens the device and forwards pressure and button events from a reader
/// thread. The thread exits when the receiver is dropped or the device
/// fails (e.g. the tablet is unplugged), dropping the sender with it.
pub fn read_input(device_path: &str, sender: Sender<StylusEvent>) -> anyhow::Result<()> {
    let mut device =
        Device::open(device_path).with_context(|| format!("opening stylus device {device_path}"))?;
    debug!(device = device_path, name = ?device.name(), "stylus opened");

    let path = device_path.to_owned();
    thread::Builder::new()
        .name("stylus".into())
        .spawn(move || {
            let fetch = || device.fetch_events().map(|events| events.collect::<Vec<_>>());
            match pump(fetch, &sender) {
                Ok(()) => debug!(device = %path, "stylus receiver closed"),
                Err(e) => error!(device = %path, "stylus reader stopped: {e}"),
            }
        })
        .context("spawning stylus thread")?;
    Ok(())
}

/// Tracks pen contact from pressure readings and turns two button presses in
/// quick succession into a tool toggle.
#[derive(Debug, Clone)]
pub struct StylusState {
    pressure_max: f32,
    threshold: f32,
    double_click: Duration,
    pressure: f32,
    button_down: bool,
    last_press: Option<Duration>,
}

impl StylusState {
    pub fn new(pressure_max: f32, threshold: f32) -> Self {
        Self {
            pressure_max,
            threshold,
            double_click: Duration::from_millis(300),
            pressure: 0.0,
            button_down: false,
            last_press: None,
        }
    }

    /// Applies an event seen at time `now` (any monotonic clock). Returns
    /// true when the event completes a double click.
    pub fn apply(&mut self, event: StylusEvent, now: Duration) -> bool {
        match event {
            StylusEvent::Pressure { value } => {
                self.pressure = value as f32 / self.pressure_max;
                false
            }
            StylusEvent::Button { pressed: true } if !self.button_down => {
                self.button_down = true;
                let double = self
                    .last_press
                    .map(|t| now.saturating_sub(t) < self.double_click)
                    .unwrap_or(false);
                self.last_press = if double { None } else { Some(now) };
                double
            }
            StylusEvent::Button { pressed } => {
                self.button_down = pressed;
                false
            }
        }
    }

    pub fn is_touching(&self) -> bool {
        self.pressure > self.threshold
    }

    pub fn pressure(&self) -> f32 {
        self.pressure
    }
}
