use serde::{Deserialize, Serialize};

use super::input::ControlState;

/// Trait for pilot input sources.
///
/// Implement this to drive the assembly from a script, a recording or
/// an autopilot. Polled once per frame.
pub trait ControlSource {
    /// Pilot axes at simulation time `time`.
    fn control(&mut self, time: f64) -> ControlState;

    /// Reset internal state.
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Holds the same axes forever.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldControl(pub ControlState);

impl ControlSource for HoldControl {
    fn control(&mut self, _time: f64) -> ControlState {
        self.0
    }

    fn name(&self) -> &str {
        "Hold"
    }
}

/// One timed window of a schedule, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlWindow {
    pub start: f64,
    pub end: f64,
    #[serde(flatten)]
    pub state: ControlState,
}

/// Scripted axes: neutral outside all windows, the last matching window wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlSchedule {
    windows: Vec<ControlWindow>,
}

impl ControlSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(mut self, start: f64, end: f64, state: ControlState) -> Self {
        self.windows.push(ControlWindow { start, end, state });
        self
    }

    /// Time the last window closes.
    pub fn end_time(&self) -> f64 {
        self.windows.iter().map(|w| w.end).fold(0.0_f64, f64::max)
    }
}

impl ControlSource for ControlSchedule {
    fn control(&mut self, time: f64) -> ControlState {
        self.windows
            .iter()
            .rev()
            .find(|w| time >= w.start && time < w.end)
            .map(|w| w.state)
            .unwrap_or_default()
    }

    fn name(&self) -> &str {
        "Schedule"
    }
}
