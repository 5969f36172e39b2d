use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pilot control state -> world-frame requests
// ---------------------------------------------------------------------------

/// Raw pilot axes, each in [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlState {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
    pub x: f64, // translate right
    pub y: f64, // translate forward (along the reference "up" axis)
    pub z: f64, // translate down
}

impl ControlState {
    pub fn clamped(self) -> Self {
        let c = |v: f64| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        Self {
            pitch: c(self.pitch),
            yaw: c(self.yaw),
            roll: c(self.roll),
            x: c(self.x),
            y: c(self.y),
            z: c(self.z),
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }
}

/// Torque and force requests in the world frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesiredInputs {
    pub torque: Vector3<f64>,
    pub force: Vector3<f64>,
}

/// Rotates the pilot axes by the vessel's reference attitude.
///
/// The reference frame has +y along the vessel's long axis, so pitch, roll
/// and yaw map to body x, y, z, and the translation axes are swizzled the
/// same way (`x, z, y`).
pub fn sample(ctrl: &ControlState, attitude: &UnitQuaternion<f64>) -> DesiredInputs {
    let c = ctrl.clamped();
    DesiredInputs {
        torque: attitude * Vector3::new(c.pitch, c.roll, c.yaw),
        force: attitude * Vector3::new(c.x, c.z, c.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn identity_attitude_swizzles_axes() {
        let ctrl = ControlState { pitch: 0.1, yaw: 0.2, roll: 0.3, x: 0.4, y: 0.5, z: 0.6 };
        let d = sample(&ctrl, &UnitQuaternion::identity());
        assert_eq!(d.torque, Vector3::new(0.1, 0.3, 0.2));
        assert_eq!(d.force, Vector3::new(0.4, 0.6, 0.5));
    }

    #[test]
    fn attitude_rotates_requests() {
        let q = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2);
        let ctrl = ControlState { x: 1.0, ..Default::default() };
        let d = sample(&ctrl, &q);
        assert!((d.force - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn out_of_range_axes_are_clamped() {
        let ctrl = ControlState { pitch: 4.0, x: f64::NAN, ..Default::default() };
        let d = sample(&ctrl, &UnitQuaternion::identity());
        assert_eq!(d.torque.x, 1.0);
        assert_eq!(d.force.x, 0.0);
    }

    #[test]
    fn neutral_state_samples_to_zero() {
        let d = sample(&ControlState::default(), &UnitQuaternion::identity());
        assert_eq!(d.torque, Vector3::zeros());
        assert_eq!(d.force, Vector3::zeros());
        assert!(ControlState::default().is_neutral());
    }
}
