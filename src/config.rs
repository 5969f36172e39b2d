use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::fuel::{FuelTanks, ResourceId};
use crate::gnc::{ControlSchedule, ControlState, Gates, RcsAllocator};
use crate::sim::{SimConfig, VesselFrame};
use crate::vehicle::{presets, RcsBuilder};

// ---------------------------------------------------------------------------
// Assembly document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrusterConfig {
    pub position: Vector3<f64>,
    pub direction: Vector3<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_force: Option<f64>,
}

/// Serialized RCS assembly definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RcsConfig {
    pub name: String,
    #[serde(default = "default_resource")]
    pub resource: ResourceId,
    #[serde(default = "default_unit_mass")]
    pub resource_unit_mass: f64,
    /// `[pressure_atm, isp_s]` pairs.
    pub isp_curve: Vec<[f64; 2]>,
    #[serde(default = "default_power")]
    pub thruster_power: f64,
    pub thrusters: Vec<ThrusterConfig>,
    #[serde(default = "default_true")]
    pub requires_fuel: bool,
    #[serde(default)]
    pub for_show_only: bool,
}

fn default_resource() -> ResourceId {
    ResourceId::new("MonoPropellant")
}

fn default_unit_mass() -> f64 {
    0.004
}

fn default_power() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl RcsConfig {
    pub fn builder(&self) -> RcsBuilder {
        let mut b = RcsBuilder::new(self.name.clone())
            .resource(self.resource.clone())
            .resource_unit_mass(self.resource_unit_mass)
            .isp_keys(self.isp_curve.iter().map(|&[p, isp]| (p, isp)).collect())
            .thruster_power(self.thruster_power)
            .requires_fuel(self.requires_fuel)
            .for_show_only(self.for_show_only);
        for t in &self.thrusters {
            b = match t.max_force {
                Some(f) => b.thruster_with_force(t.position, t.direction, f),
                None => b.thruster(t.position, t.direction),
            };
        }
        b
    }

    pub fn build(&self) -> Result<RcsAllocator, ConfigError> {
        self.builder().build()
    }
}

// ---------------------------------------------------------------------------
// Scenario document
// ---------------------------------------------------------------------------

/// Everything needed to replay a run from a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub assembly: RcsConfig,
    #[serde(default)]
    pub vessel: VesselFrame,
    #[serde(default)]
    pub tanks: FuelTanks,
    #[serde(default)]
    pub gates: Gates,
    #[serde(default)]
    pub schedule: ControlSchedule,
    #[serde(default)]
    pub sim: SimConfig,
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks run timing. Assembly geometry is checked when it is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sim.dt.is_finite() || self.sim.dt <= 0.0 {
            return Err(ConfigError::parameter("sim.dt", self.sim.dt));
        }
        if !self.sim.max_time.is_finite() || self.sim.max_time < 0.0 {
            return Err(ConfigError::parameter("sim.max_time", self.sim.max_time));
        }
        if self.sim.steps_per_frame == 0 {
            return Err(ConfigError::parameter("sim.steps_per_frame", 0));
        }
        if self.schedule.end_time() > self.sim.max_time {
            warn!(
                scenario = %self.name,
                schedule_end = self.schedule.end_time(),
                max_time = self.sim.max_time,
                "control schedule outlasts the run and will be cut short"
            );
        }
        Ok(())
    }

    /// Built-in demo: a ring of four RCS blocks, a translate burst, a roll
    /// burst and a combined manoeuvre, with enough propellant to starve
    /// the last one.
    pub fn preset() -> Self {
        let thrusters = presets::ring_nozzles(1.25)
            .into_iter()
            .map(|(position, direction)| ThrusterConfig { position, direction, max_force: None })
            .collect();

        Scenario {
            name: "Block ring checkout".into(),
            assembly: RcsConfig {
                name: "RV-105 ring".into(),
                resource: default_resource(),
                resource_unit_mass: default_unit_mass(),
                isp_curve: vec![[0.0, 240.0], [1.0, 100.0], [4.0, 0.001]],
                thruster_power: 1.0,
                thrusters,
                requires_fuel: true,
                for_show_only: false,
            },
            vessel: VesselFrame::default(),
            tanks: FuelTanks::new().with("MonoPropellant", 2.5),
            gates: Gates::default(),
            schedule: ControlSchedule::new()
                .window(1.0, 3.0, ControlState { z: 1.0, ..Default::default() })
                .window(4.0, 6.0, ControlState { roll: 1.0, ..Default::default() })
                .window(7.0, 12.0, ControlState { pitch: 0.5, x: 1.0, ..Default::default() }),
            sim: SimConfig { dt: 0.02, max_time: 14.0, steps_per_frame: 2 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"{
        "name": "single nozzle",
        "assembly": {
            "name": "test",
            "isp_curve": [[0.0, 240.0]],
            "thrusters": [
                { "position": [1.0, 0.0, 0.0], "direction": [0.0, 1.0, 0.0] },
                { "position": [-1.0, 0.0, 0.0], "direction": [0.0, 1.0, 0.0], "max_force": 0.5 }
            ]
        },
        "tanks": { "MonoPropellant": 2.0 },
        "gates": { "unlimited_fuel": true },
        "schedule": [ { "start": 0.0, "end": 1.0, "z": 1.0 } ],
        "sim": { "max_time": 2.0 }
    }"#;

    #[test]
    fn scenario_parses_with_defaults() {
        let s = Scenario::from_json_str(SCENARIO).unwrap();
        assert_eq!(s.assembly.resource.as_str(), "MonoPropellant");
        assert!(s.gates.unlimited_fuel);
        assert!(s.gates.enabled);
        assert_eq!(s.sim.dt, 0.02);
        assert_eq!(s.sim.max_time, 2.0);

        let rcs = s.assembly.build().unwrap();
        assert_eq!(rcs.thrusters().len(), 2);
        assert_eq!(rcs.thrusters()[1].max_force(), 0.5);
    }

    #[test]
    fn bad_timing_is_rejected() {
        let json = SCENARIO.replace(r#""max_time": 2.0"#, r#""dt": 0.0"#);
        assert!(matches!(
            Scenario::from_json_str(&json),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(Scenario::from_json_str("{"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn preset_round_trips_and_builds() {
        let preset = Scenario::preset();
        let json = serde_json::to_string(&preset).unwrap();
        let back = Scenario::from_json_str(&json).unwrap();
        assert_eq!(back.assembly, preset.assembly);
        assert_eq!(back.assembly.build().unwrap().thrusters().len(), 16);
    }

    #[test]
    fn preset_matches_block_ring_geometry() {
        let from_doc = Scenario::preset().assembly.build().unwrap();
        let ring = presets::block_ring(1.25).unwrap();
        assert_eq!(from_doc.thrusters(), ring.thrusters());
    }

    #[test]
    fn requires_fuel_defaults_on_and_can_be_cleared() {
        let s = Scenario::from_json_str(SCENARIO).unwrap();
        assert!(s.assembly.requires_fuel);
        assert!(s.assembly.build().unwrap().requires_fuel());

        let json = SCENARIO.replace(r#""name": "test","#, r#""name": "test", "requires_fuel": false,"#);
        let s = Scenario::from_json_str(&json).unwrap();
        assert!(!s.assembly.build().unwrap().requires_fuel());
    }
}
