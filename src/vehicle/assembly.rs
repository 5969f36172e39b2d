use nalgebra::Vector3;

use crate::error::ConfigError;
use crate::fuel::ResourceId;
use crate::gnc::RcsAllocator;
use crate::physics::IspCurve;
use super::thruster::Thruster;

// ---------------------------------------------------------------------------
// Assembly builder
// ---------------------------------------------------------------------------

struct NozzleDef {
    position: Vector3<f64>,
    direction: Vector3<f64>,
    max_force: Option<f64>, // falls back to the shared thruster power
}

/// Builds a validated [`RcsAllocator`].
///
/// Units only need to agree with each other: kN with tonnes per unit, or N
/// with kg per unit.
pub struct RcsBuilder {
    name: String,
    resource: ResourceId,
    resource_unit_mass: f64,
    isp_keys: Vec<(f64, f64)>,
    thruster_power: f64,
    nozzles: Vec<NozzleDef>,
    requires_fuel: bool,
    for_show_only: bool,
}

impl RcsBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource: ResourceId::new("MonoPropellant"),
            resource_unit_mass: 0.004,
            isp_keys: vec![(0.0, 240.0), (1.0, 100.0), (4.0, 0.001)],
            thruster_power: 1.0,
            nozzles: vec![],
            requires_fuel: true,
            for_show_only: false,
        }
    }

    pub fn resource(mut self, v: impl Into<ResourceId>) -> Self { self.resource = v.into(); self }
    pub fn resource_unit_mass(mut self, v: f64) -> Self { self.resource_unit_mass = v; self }
    pub fn isp_keys(mut self, v: Vec<(f64, f64)>) -> Self { self.isp_keys = v; self }
    pub fn isp_curve(mut self, v: &IspCurve) -> Self { self.isp_keys = v.keys().to_vec(); self }
    pub fn constant_isp(mut self, v: f64) -> Self { self.isp_keys = vec![(0.0, v)]; self }
    pub fn thruster_power(mut self, v: f64) -> Self { self.thruster_power = v; self }
    pub fn requires_fuel(mut self, v: bool) -> Self { self.requires_fuel = v; self }
    pub fn for_show_only(mut self, v: bool) -> Self { self.for_show_only = v; self }

    /// Adds a nozzle at the shared thruster power.
    pub fn thruster(mut self, position: Vector3<f64>, direction: Vector3<f64>) -> Self {
        self.nozzles.push(NozzleDef { position, direction, max_force: None });
        self
    }

    pub fn thruster_with_force(
        mut self,
        position: Vector3<f64>,
        direction: Vector3<f64>,
        max_force: f64,
    ) -> Self {
        self.nozzles.push(NozzleDef { position, direction, max_force: Some(max_force) });
        self
    }

    /// Four nozzles on a block at `position`, exhausting along `±a` and `±b`.
    pub fn block(self, position: Vector3<f64>, a: Vector3<f64>, b: Vector3<f64>) -> Self {
        block_nozzles(position, a, b)
            .into_iter()
            .fold(self, |builder, (position, direction)| builder.thruster(position, direction))
    }

    pub fn build(self) -> Result<RcsAllocator, ConfigError> {
        let isp_curve = IspCurve::new(self.isp_keys)?;
        let power = self.thruster_power;

        let thrusters = self
            .nozzles
            .into_iter()
            .enumerate()
            .map(|(i, n)| {
                Thruster::new(n.position, n.direction, n.max_force.unwrap_or(power))
                    .map_err(|e| Thruster::with_index(e, i))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RcsAllocator::new(
            self.name,
            self.resource,
            self.resource_unit_mass,
            isp_curve,
            thrusters,
            self.for_show_only,
        )?
        .with_requires_fuel(self.requires_fuel))
    }
}

fn block_nozzles(
    position: Vector3<f64>,
    a: Vector3<f64>,
    b: Vector3<f64>,
) -> [(Vector3<f64>, Vector3<f64>); 4] {
    [(position, a), (position, -a), (position, b), (position, -b)]
}

// ---------------------------------------------------------------------------
// Preset assemblies
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// `(position, direction)` of every nozzle in a ring of four blocks at
    /// 90° around the long (+y) axis, `radius` out from the CoM.
    pub fn ring_nozzles(radius: f64) -> Vec<(Vector3<f64>, Vector3<f64>)> {
        [
            (Vector3::new(radius, 0.0, 0.0), Vector3::z()),
            (Vector3::new(-radius, 0.0, 0.0), Vector3::z()),
            (Vector3::new(0.0, 0.0, radius), Vector3::x()),
            (Vector3::new(0.0, 0.0, -radius), Vector3::x()),
        ]
        .into_iter()
        .flat_map(|(position, side)| block_nozzles(position, Vector3::y(), side))
        .collect()
    }

    /// A single 4-nozzle block on the +x side of the CoM, exhausting along
    /// ±y and ±z.
    pub fn quad_block() -> Result<RcsAllocator, ConfigError> {
        RcsBuilder::new("RV-105 block")
            .block(Vector3::x(), Vector3::y(), Vector3::z())
            .build()
    }

    /// Twelve nozzles in opposed pairs on the faces of a cube of half-width
    /// `half_width`. Each axis has a torque-free translation pair in both
    /// senses and a force-free couple in both senses.
    pub fn cube_cluster(half_width: f64) -> Result<RcsAllocator, ConfigError> {
        let faces = [
            (Vector3::x(), Vector3::y()),
            (Vector3::y(), Vector3::z()),
            (Vector3::z(), Vector3::x()),
        ];
        faces
            .into_iter()
            .flat_map(|(normal, exhaust)| {
                [
                    (normal * half_width, exhaust),
                    (normal * half_width, -exhaust),
                    (-normal * half_width, exhaust),
                    (-normal * half_width, -exhaust),
                ]
            })
            .fold(RcsBuilder::new("Cube cluster"), |b, (position, direction)| {
                b.thruster(position, direction)
            })
            .build()
    }

    /// Four 4-nozzle blocks at 90° around the long (+y) axis. Full 6-axis
    /// authority.
    pub fn block_ring(radius: f64) -> Result<RcsAllocator, ConfigError> {
        ring_nozzles(radius)
            .into_iter()
            .fold(RcsBuilder::new("RV-105 ring"), |b, (position, direction)| {
                b.thruster(position, direction)
            })
            .build()
    }

    /// Four single nozzles around the long axis, all exhausting along +y.
    /// Translation only along that axis.
    pub fn aft_quad(radius: f64, power: f64) -> Result<RcsAllocator, ConfigError> {
        RcsBuilder::new("Aft quad")
            .thruster_power(power)
            .thruster(Vector3::new(radius, 0.0, 0.0), Vector3::y())
            .thruster(Vector3::new(-radius, 0.0, 0.0), Vector3::y())
            .thruster(Vector3::new(0.0, 0.0, radius), Vector3::y())
            .thruster(Vector3::new(0.0, 0.0, -radius), Vector3::y())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuel::UnlimitedFuel;
    use crate::fx::NullFx;
    use crate::gnc::StepInputs;

    #[test]
    fn per_nozzle_force_overrides_shared_power() {
        let rcs = RcsBuilder::new("t")
            .thruster_power(2.0)
            .thruster(Vector3::x(), Vector3::y())
            .thruster_with_force(-Vector3::x(), Vector3::y(), 0.5)
            .build()
            .unwrap();
        assert_eq!(rcs.thrusters()[0].max_force(), 2.0);
        assert_eq!(rcs.thrusters()[1].max_force(), 0.5);
        assert_eq!(rcs.total_max_force(), 2.5);
    }

    #[test]
    fn bad_nozzle_reports_its_index() {
        let err = RcsBuilder::new("t")
            .thruster(Vector3::x(), Vector3::y())
            .thruster(Vector3::x(), Vector3::zeros())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThruster { index: 1, .. }));
    }

    #[test]
    fn empty_assembly_is_rejected() {
        assert!(matches!(RcsBuilder::new("t").build(), Err(ConfigError::NoThrusters)));
    }

    #[test]
    fn bad_isp_curve_is_rejected() {
        let err = RcsBuilder::new("t")
            .constant_isp(-1.0)
            .thruster(Vector3::x(), Vector3::y())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidIspCurve(_)));
    }

    #[test]
    fn presets_build() {
        assert_eq!(presets::block_ring(1.25).unwrap().thrusters().len(), 16);
        assert_eq!(presets::aft_quad(1.0, 1.0).unwrap().thrusters().len(), 4);
        assert_eq!(presets::quad_block().unwrap().thrusters().len(), 4);
        assert_eq!(presets::cube_cluster(1.0).unwrap().thrusters().len(), 12);
    }

    #[test]
    fn isp_curve_and_fuel_flag_carry_through() {
        let curve = IspCurve::new(vec![(1.0, 100.0), (0.0, 300.0)]).unwrap();
        let rcs = RcsBuilder::new("t")
            .isp_curve(&curve)
            .requires_fuel(false)
            .thruster(Vector3::x(), Vector3::y())
            .build()
            .unwrap();
        assert_eq!(rcs.isp_curve(), &curve);
        assert!(!rcs.requires_fuel());
        assert!(RcsBuilder::new("t").thruster(Vector3::x(), Vector3::y()).build().unwrap().requires_fuel());
    }

    #[test]
    fn cube_cluster_translates_without_torque() {
        let mut rcs = presets::cube_cluster(0.5).unwrap();
        for axis in [Vector3::x(), Vector3::y(), Vector3::z()] {
            for sense in [1.0, -1.0] {
                let inputs = StepInputs::new(Vector3::zeros(), axis * sense);
                let r = rcs.step(&inputs, &mut UnlimitedFuel, &mut NullFx);
                assert!((r.current_thrust - 2.0).abs() < 1e-12);
                assert!(r.current_torque < 1e-12, "torque {}", r.current_torque);
                assert!((r.applied_force + axis * sense * 2.0).norm() < 1e-12);
            }
        }
    }

    #[test]
    fn cube_cluster_rotates_without_net_force() {
        let mut rcs = presets::cube_cluster(0.5).unwrap();
        for axis in [Vector3::x(), Vector3::y(), Vector3::z()] {
            for sense in [1.0, -1.0] {
                let inputs = StepInputs::new(axis * sense, Vector3::zeros());
                let r = rcs.step(&inputs, &mut UnlimitedFuel, &mut NullFx);
                assert_eq!(r.active_count(), 2);
                assert!(r.current_force < 1e-12, "force {}", r.current_force);
                assert!((r.current_torque - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn quad_block_sits_off_axis() {
        let mut rcs = presets::quad_block().unwrap();
        let inputs = StepInputs::new(Vector3::zeros(), Vector3::z());
        let r = rcs.step(&inputs, &mut UnlimitedFuel, &mut NullFx);
        assert_eq!(r.throttles, vec![0.0, 0.0, 1.0, 0.0]);
        // off-centre thrust also rolls the vessel
        assert!(r.current_torque > 0.0);
    }
}
