use std::io::{self, Write};

use serde::Serialize;

use crate::gnc::RcsStatus;
use crate::sim::{Run, SimConfig};

/// Summary statistics computed from a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub scenario: String,
    pub steps: usize,
    pub duration_s: f64,
    pub total_impulse: f64,  // force·s
    pub fuel_used: f64,      // units
    pub peak_thrust: f64,
    pub peak_torque: f64,
    pub peak_fuel_flow: f64,
    pub time_firing_s: f64,
    pub time_deprived_s: f64,
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub time: f64,
    pub kind: String,
    pub status: RcsStatus,
}

impl RunSummary {
    /// Compute summary from run telemetry.
    pub fn from_run(scenario: &str, run: &Run, config: &SimConfig) -> Self {
        let dt = config.dt;
        let t = &run.telemetry;
        let peak = |f: fn(&crate::sim::Telemetry) -> f64| t.iter().map(f).fold(0.0_f64, f64::max);
        let time_in = |s: RcsStatus| t.iter().filter(|x| x.status == s).count() as f64 * dt;

        RunSummary {
            scenario: scenario.to_string(),
            steps: t.len(),
            duration_s: t.len() as f64 * dt,
            total_impulse: t.iter().map(|x| x.thrust * dt).sum(),
            fuel_used: t.last().map(|x| x.fuel_used).unwrap_or(0.0),
            peak_thrust: peak(|x| x.thrust),
            peak_torque: peak(|x| x.torque),
            peak_fuel_flow: peak(|x| x.fuel_flow),
            time_firing_s: time_in(RcsStatus::Firing),
            time_deprived_s: time_in(RcsStatus::FuelDeprived),
            events: run
                .events
                .iter()
                .map(|e| EventRecord { time: e.time, kind: format!("{:?}", e.kind), status: e.status })
                .collect(),
        }
    }
}

/// Write run summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &RunSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)
}

/// Write run summary JSON to a file.
pub fn write_summary_file(path: &str, summary: &RunSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{EventKind, SimEvent, Telemetry};

    fn simple_run() -> Run {
        let row = |time: f64, status, thrust: f64, fuel_used: f64| Telemetry {
            time,
            status,
            thrust,
            torque: thrust * 0.5,
            force: thrust,
            fuel_flow: 0.0,
            fuel_used,
            fuel_remaining: None,
            active: 0,
            throttles: vec![],
        };
        Run {
            telemetry: vec![
                row(0.0, RcsStatus::Idle, 0.0, 0.0),
                row(0.1, RcsStatus::Firing, 2.0, 0.1),
                row(0.2, RcsStatus::Firing, 4.0, 0.3),
                row(0.3, RcsStatus::FuelDeprived, 0.0, 0.3),
            ],
            events: vec![SimEvent { time: 0.1, kind: EventKind::Ignition, status: RcsStatus::Firing }],
        }
    }

    #[test]
    fn summary_integrates_impulse() {
        let config = SimConfig { dt: 0.1, ..SimConfig::default() };
        let s = RunSummary::from_run("t", &simple_run(), &config);
        assert!((s.total_impulse - 0.6).abs() < 1e-12);
        assert_eq!(s.peak_thrust, 4.0);
        assert_eq!(s.peak_torque, 2.0);
        assert!((s.time_firing_s - 0.2).abs() < 1e-12);
        assert!((s.time_deprived_s - 0.1).abs() < 1e-12);
        assert_eq!(s.fuel_used, 0.3);
    }

    #[test]
    fn json_output_is_valid() {
        let config = SimConfig { dt: 0.1, ..SimConfig::default() };
        let summary = RunSummary::from_run("Test", &simple_run(), &config);

        let mut buf = Vec::new();
        write_summary(&mut buf, &summary).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["scenario"], "Test");
        assert_eq!(value["events"][0]["kind"], "Ignition");
        assert_eq!(value["events"][0]["status"], "Firing");
    }
}
