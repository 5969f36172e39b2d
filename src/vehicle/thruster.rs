use nalgebra::Vector3;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Single RCS nozzle
// ---------------------------------------------------------------------------

/// One nozzle of an RCS assembly.
///
/// `direction` is the exhaust direction; the force on the vehicle points the
/// other way. Geometry is fixed once built, only `throttle` changes per step.
#[derive(Debug, Clone, PartialEq)]
pub struct Thruster {
    position: Vector3<f64>,  // m, force application point
    direction: Vector3<f64>, // unit, exhaust direction
    max_force: f64,          // kN at full throttle
    throttle: f64,           // [0, 1], last step
}

impl Thruster {
    /// Validates and builds a nozzle. `direction` need not be unit length.
    pub fn new(
        position: Vector3<f64>,
        direction: Vector3<f64>,
        max_force: f64,
    ) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidThruster { index: 0, reason };

        if position.iter().any(|c| !c.is_finite()) {
            return Err(invalid(format!("non-finite position {position:?}")));
        }
        if direction.iter().any(|c| !c.is_finite()) {
            return Err(invalid(format!("non-finite direction {direction:?}")));
        }
        let direction = direction
            .try_normalize(f64::EPSILON)
            .ok_or_else(|| invalid("zero-length thrust direction".into()))?;
        if !max_force.is_finite() || max_force <= 0.0 {
            return Err(invalid(format!("max force must be positive, got {max_force}")));
        }

        Ok(Self { position, direction, max_force, throttle: 0.0 })
    }

    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    pub fn direction(&self) -> Vector3<f64> {
        self.direction
    }

    pub fn max_force(&self) -> f64 {
        self.max_force
    }

    /// Throttle commanded on the most recent step.
    pub fn throttle(&self) -> f64 {
        self.throttle
    }

    pub(crate) fn set_throttle(&mut self, throttle: f64) {
        self.throttle = throttle;
    }

    pub(crate) fn with_index(err: ConfigError, index: usize) -> ConfigError {
        match err {
            ConfigError::InvalidThruster { reason, .. } => {
                ConfigError::InvalidThruster { index, reason }
            }
            other => other,
        }
    }
}
