use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fuel::FuelPool;
use crate::fx::ThrusterEffectSink;
use crate::gnc::{sample, ControlSource, DesiredInputs, Gates, RcsAllocator, RcsStatus, StepInputs};
use crate::physics::atmosphere;
use super::event::{EventDetector, SimEvent, StatusChangeDetector};

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub dt: f64,                // fixed physics step, s
    pub max_time: f64,          // s
    pub steps_per_frame: usize, // physics steps per control sample
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.02,           // 50 Hz
            max_time: 10.0,
            steps_per_frame: 1,
        }
    }
}

/// Where the vessel sits for the run. No dynamics are integrated, so the
/// frame stays fixed and thruster geometry stays valid in world space.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselFrame {
    pub center_of_mass: Vector3<f64>, // m
    pub velocity: Vector3<f64>,       // m/s
    pub euler_deg: [f64; 3],          // roll, pitch, yaw of the reference frame
    pub altitude: f64,                // m, for ambient pressure
}

impl Default for VesselFrame {
    fn default() -> Self {
        Self {
            center_of_mass: Vector3::zeros(),
            velocity: Vector3::zeros(),
            euler_deg: [0.0; 3],
            altitude: 100_000.0,
        }
    }
}

impl VesselFrame {
    pub fn attitude(&self) -> UnitQuaternion<f64> {
        let [r, p, y] = self.euler_deg;
        UnitQuaternion::from_euler_angles(r.to_radians(), p.to_radians(), y.to_radians())
    }
}

// ---------------------------------------------------------------------------
// Telemetry
// ---------------------------------------------------------------------------

/// One recorded step.
#[derive(Debug, Clone, PartialEq)]
pub struct Telemetry {
    pub time: f64,
    pub status: RcsStatus,
    pub thrust: f64,
    pub torque: f64,
    pub force: f64,
    pub fuel_flow: f64,
    pub fuel_used: f64,              // cumulative units
    pub fuel_remaining: Option<f64>, // units, when the pool keeps count
    pub active: usize,               // lit nozzles
    pub throttles: Vec<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct Run {
    pub telemetry: Vec<Telemetry>,
    pub events: Vec<SimEvent>,
}

// ---------------------------------------------------------------------------
// Fixed-step driver
// ---------------------------------------------------------------------------

/// Drives an assembly through a run.
///
/// The control source is reset first. Controls are sampled once per frame;
/// the allocator steps every tick.
#[allow(clippy::too_many_arguments)]
pub fn run_with(
    rcs: &mut RcsAllocator,
    vessel: &VesselFrame,
    gates: &Gates,
    control: &mut dyn ControlSource,
    pool: &mut dyn FuelPool,
    fx: &mut dyn ThrusterEffectSink,
    detectors: &mut [Box<dyn EventDetector>],
    config: &SimConfig,
) -> Run {
    let steps = if config.dt > 0.0 { (config.max_time / config.dt).round() as usize } else { 0 };
    let per_frame = config.steps_per_frame.max(1);
    let attitude = vessel.attitude();
    let pressure = atmosphere::pressure_atm(vessel.altitude);
    control.reset();

    debug!(
        assembly = rcs.name(),
        control = control.name(),
        steps,
        per_frame,
        pressure_atm = pressure,
        "Starting RCS run"
    );

    let mut run = Run {
        telemetry: Vec::with_capacity(steps.min(200_000)),
        events: vec![],
    };
    let mut desired = DesiredInputs { torque: Vector3::zeros(), force: Vector3::zeros() };
    let mut fuel_used = 0.0;

    for k in 0..steps {
        let time = k as f64 * config.dt;
        if k % per_frame == 0 {
            desired = sample(&control.control(time), &attitude);
        }

        let inputs = StepInputs {
            desired_torque: desired.torque,
            desired_force: desired.force,
            center_of_mass: vessel.center_of_mass,
            com_velocity: vessel.velocity,
            dt: config.dt,
            static_pressure: pressure,
            gates: *gates,
        };
        let result = rcs.step(&inputs, pool, fx);
        fuel_used += result.fuel_drawn;

        let record = Telemetry {
            time,
            status: result.status,
            thrust: result.current_thrust,
            torque: result.current_torque,
            force: result.current_force,
            fuel_flow: result.current_fuel_flow,
            fuel_used,
            fuel_remaining: pool.level(rcs.resource()),
            active: result.active_count(),
            throttles: result.throttles,
        };

        if let Some(prev) = run.telemetry.last() {
            for det in detectors.iter_mut() {
                if let Some(kind) = det.check(prev, &record) {
                    debug!(time, ?kind, status = %record.status, "RCS event");
                    run.events.push(SimEvent { time, kind, status: record.status });
                }
            }
        }
        run.telemetry.push(record);
    }

    run
}

/// Run with the default status-change detector.
pub fn run(
    rcs: &mut RcsAllocator,
    vessel: &VesselFrame,
    gates: &Gates,
    control: &mut dyn ControlSource,
    pool: &mut dyn FuelPool,
    fx: &mut dyn ThrusterEffectSink,
    config: &SimConfig,
) -> Run {
    let mut detectors: Vec<Box<dyn EventDetector>> = vec![Box::new(StatusChangeDetector)];
    run_with(rcs, vessel, gates, control, pool, fx, &mut detectors, config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
