use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::ConfigError;
use crate::fuel::{FuelPool, ResourceId};
use crate::fx::{ThrusterEffectSink, MIN_VISIBLE_POWER};
use crate::physics::{IspCurve, G0};
use crate::vehicle::Thruster;
use super::status::{RcsStatus, Suppression};

/// Below this fraction of the requested propellant a nozzle is starved.
pub const DEPRIVATION_RATIO: f64 = 0.10;

// ---------------------------------------------------------------------------
// Step inputs
// ---------------------------------------------------------------------------

/// Conditions that may forbid thrust for a step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gates {
    pub enabled: bool,
    pub controllable: bool,
    pub action_group_active: bool,
    pub high_rate_time_warp: bool,
    pub requires_fuel: bool,
    pub unlimited_fuel: bool,
}

impl Default for Gates {
    fn default() -> Self {
        Self {
            enabled: true,
            controllable: true,
            action_group_active: true,
            high_rate_time_warp: false,
            requires_fuel: true,
            unlimited_fuel: false,
        }
    }
}

/// Everything the allocator reads for one fixed step. World frame.
#[derive(Debug, Clone, PartialEq)]
pub struct StepInputs {
    pub desired_torque: Vector3<f64>,
    pub desired_force: Vector3<f64>,
    pub center_of_mass: Vector3<f64>,
    pub com_velocity: Vector3<f64>,
    pub dt: f64,              // s
    pub static_pressure: f64, // atm, for the Isp curve
    pub gates: Gates,
}

impl StepInputs {
    /// Inputs at rest at the origin in vacuum, all gates open, 50 Hz.
    pub fn new(desired_torque: Vector3<f64>, desired_force: Vector3<f64>) -> Self {
        Self {
            desired_torque,
            desired_force,
            center_of_mass: Vector3::zeros(),
            com_velocity: Vector3::zeros(),
            dt: 0.02,
            static_pressure: 0.0,
            gates: Gates::default(),
        }
    }

    /// First gate that forbids thrust, if any.
    pub fn suppression(&self) -> Option<Suppression> {
        let g = &self.gates;
        if !g.enabled {
            Some(Suppression::Disabled)
        } else if g.high_rate_time_warp {
            Some(Suppression::TimeWarp)
        } else if !g.controllable {
            Some(Suppression::NotControllable)
        } else if !g.action_group_active {
            Some(Suppression::ActionGroupOff)
        } else if self.desired_torque == Vector3::zeros() && self.desired_force == Vector3::zeros() {
            Some(Suppression::NoInput)
        } else if !(self.dt.is_finite() && self.dt > 0.0) {
            Some(Suppression::BadTimestep)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Step result
// ---------------------------------------------------------------------------

/// Output of one allocation step. Scalars are magnitudes and never negative.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub status: RcsStatus,
    pub throttles: Vec<f64>,
    /// Force each nozzle applies to the vehicle at its position.
    pub forces: Vec<Vector3<f64>>,
    pub applied_force: Vector3<f64>,
    pub applied_torque: Vector3<f64>,
    pub current_thrust: f64,
    pub current_torque: f64,
    pub current_force: f64,
    pub current_fuel_flow: f64, // units/s
    pub fuel_drawn: f64,        // units this step
    pub specific_impulse: f64,  // s
}

impl StepResult {
    fn idle(status: RcsStatus, count: usize, specific_impulse: f64) -> Self {
        Self {
            status,
            throttles: vec![0.0; count],
            forces: vec![Vector3::zeros(); count],
            applied_force: Vector3::zeros(),
            applied_torque: Vector3::zeros(),
            current_thrust: 0.0,
            current_torque: 0.0,
            current_force: 0.0,
            current_fuel_flow: 0.0,
            fuel_drawn: 0.0,
            specific_impulse,
        }
    }

    pub fn active_count(&self) -> usize {
        self.throttles.iter().filter(|&&t| t > 0.0).count()
    }
}

// ---------------------------------------------------------------------------
// Allocator
// ---------------------------------------------------------------------------

/// Per-step thrust allocator for one RCS assembly.
///
/// Each nozzle takes the component of the requested force along its exhaust
/// direction, where the rotational request contributes
/// `desired_torque x unit(lever_arm)`. Both the request and the exhaust
/// direction are "reversed" relative to the force on the vehicle, so the
/// signs cancel. The decomposition is approximate; it keeps one throttle per
/// nozzle instead of solving an optimisation.
#[derive(Debug, Clone)]
pub struct RcsAllocator {
    name: String,
    resource: ResourceId,
    resource_unit_mass: f64,
    isp_curve: IspCurve,
    thrusters: Vec<Thruster>,
    for_show_only: bool,
    requires_fuel: bool,
    specific_impulse: f64,
    last: StepResult,
}

impl RcsAllocator {
    pub fn new(
        name: impl Into<String>,
        resource: ResourceId,
        resource_unit_mass: f64,
        isp_curve: IspCurve,
        thrusters: Vec<Thruster>,
        for_show_only: bool,
    ) -> Result<Self, ConfigError> {
        if thrusters.is_empty() {
            return Err(ConfigError::NoThrusters);
        }
        if !resource_unit_mass.is_finite() || resource_unit_mass <= 0.0 {
            return Err(ConfigError::parameter("resource_unit_mass", resource_unit_mass));
        }
        if resource.as_str().is_empty() {
            return Err(ConfigError::parameter("resource", "\"\""));
        }

        let name = name.into();
        let specific_impulse = isp_curve.vacuum_isp();
        debug!(
            %name,
            %resource,
            thrusters = thrusters.len(),
            vacuum_isp = specific_impulse,
            "RCS assembly configured"
        );
        let last = StepResult::idle(RcsStatus::Disabled, thrusters.len(), specific_impulse);

        Ok(Self {
            name,
            resource,
            resource_unit_mass,
            isp_curve,
            thrusters,
            for_show_only,
            requires_fuel: true,
            specific_impulse,
            last,
        })
    }

    /// Whether this assembly burns propellant at all. Combined with the
    /// step's own `requires_fuel` gate; both must be set to draw fuel.
    pub fn with_requires_fuel(mut self, requires_fuel: bool) -> Self {
        self.requires_fuel = requires_fuel;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource(&self) -> &ResourceId {
        &self.resource
    }

    pub fn resource_unit_mass(&self) -> f64 {
        self.resource_unit_mass
    }

    pub fn thrusters(&self) -> &[Thruster] {
        &self.thrusters
    }

    pub fn isp_curve(&self) -> &IspCurve {
        &self.isp_curve
    }

    pub fn for_show_only(&self) -> bool {
        self.for_show_only
    }

    pub fn requires_fuel(&self) -> bool {
        self.requires_fuel
    }

    /// Isp used on the most recent step.
    pub fn specific_impulse(&self) -> f64 {
        self.specific_impulse
    }

    pub fn status(&self) -> RcsStatus {
        self.last.status
    }

    /// Result of the most recent step.
    pub fn last(&self) -> &StepResult {
        &self.last
    }

    /// Sum of every nozzle's full-throttle force.
    pub fn total_max_force(&self) -> f64 {
        self.thrusters.iter().map(|t| t.max_force()).sum()
    }

    /// Runs one fixed step: gate check, per-nozzle allocation, fuel draw.
    pub fn step(
        &mut self,
        inputs: &StepInputs,
        pool: &mut dyn FuelPool,
        fx: &mut dyn ThrusterEffectSink,
    ) -> StepResult {
        self.specific_impulse = self.isp_curve.evaluate(inputs.static_pressure);

        let result = match inputs.suppression() {
            Some(reason) => self.suppress(reason, fx),
            None => self.allocate(inputs, pool, fx),
        };

        trace!(
            name = %self.name,
            status = %result.status,
            thrust = result.current_thrust,
            torque = result.current_torque,
            fuel_flow = result.current_fuel_flow,
            "RCS step"
        );
        self.last = result.clone();
        result
    }

    fn suppress(&mut self, reason: Suppression, fx: &mut dyn ThrusterEffectSink) -> StepResult {
        trace!(name = %self.name, ?reason, "RCS suppressed");
        for (i, thruster) in self.thrusters.iter_mut().enumerate() {
            thruster.set_throttle(0.0);
            fx.set_inactive(i);
        }
        StepResult::idle(reason.status(), self.thrusters.len(), self.specific_impulse)
    }

    fn allocate(
        &mut self,
        inputs: &StepInputs,
        pool: &mut dyn FuelPool,
        fx: &mut dyn ThrusterEffectSink,
    ) -> StepResult {
        let dt = inputs.dt;
        let isp_speed = self.specific_impulse * G0; // effective exhaust velocity
        let consumes_fuel = !self.for_show_only
            && self.requires_fuel
            && inputs.gates.requires_fuel
            && !inputs.gates.unlimited_fuel;

        // Pivot on the CoM predicted one step ahead to cut predictor lag.
        let effective_com = inputs.center_of_mass + inputs.com_velocity * dt;

        let mut out = StepResult::idle(RcsStatus::Idle, 0, self.specific_impulse);
        out.throttles.reserve(self.thrusters.len());
        out.forces.reserve(self.thrusters.len());

        for (i, thruster) in self.thrusters.iter_mut().enumerate() {
            let lever_arm = thruster.position() - effective_com;
            let requested = match lever_arm.try_normalize(f64::EPSILON) {
                Some(arm) => inputs.desired_force + inputs.desired_torque.cross(&arm),
                // nozzle sits on the pivot: no rotational authority
                None => inputs.desired_force,
            };

            let alignment = thruster.direction().dot(&requested);
            let mut throttle = if alignment.is_finite() { alignment.clamp(0.0, 1.0) } else { 0.0 };
            let mut scalar_force = throttle * thruster.max_force();

            if consumes_fuel && throttle > 0.0 {
                // F = ve * mdot  ->  mdot = F / ve
                let fuel_mass = scalar_force / isp_speed * dt;
                let fuel_units = fuel_mass / self.resource_unit_mass;
                let granted = draw(pool, &self.resource, fuel_units);
                out.fuel_drawn += granted;
                out.current_fuel_flow += granted / dt;

                if granted / fuel_units < DEPRIVATION_RATIO {
                    throttle = 0.0;
                    scalar_force = 0.0;
                    out.status = RcsStatus::FuelDeprived;
                }
            }

            let mut force = Vector3::zeros();
            if throttle == 0.0 {
                fx.set_inactive(i);
            } else {
                fx.set_active(i, throttle.clamp(MIN_VISIBLE_POWER, 1.0));
                out.status = out.status.on_fire();

                if !self.for_show_only {
                    force = -thruster.direction() * scalar_force;
                    out.applied_force += force;
                    out.applied_torque += force.cross(&lever_arm);
                    out.current_thrust += scalar_force;
                }
            }

            thruster.set_throttle(throttle);
            out.throttles.push(throttle);
            out.forces.push(force);
        }

        out.current_torque = out.applied_torque.norm();
        out.current_force = out.applied_force.norm();
        out
    }
}

/// Requests propellant, holding the pool to its contract.
fn draw(pool: &mut dyn FuelPool, resource: &ResourceId, amount: f64) -> f64 {
    let granted = pool.request(resource, amount);
    if granted.is_nan() || granted < 0.0 || granted > amount {
        warn!(%resource, requested = amount, granted, "fuel pool grant out of range, clamping");
        if granted.is_nan() {
            return 0.0;
        }
        return granted.clamp(0.0, amount);
    }
    granted
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
