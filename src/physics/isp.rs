use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Specific impulse as a function of ambient pressure
// ---------------------------------------------------------------------------

/// Piecewise-linear Isp curve keyed on static pressure in atmospheres.
///
/// Outside the keyed range the nearest end value is held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct IspCurve {
    keys: Vec<(f64, f64)>, // (pressure atm, isp s), ascending pressure
}

impl IspCurve {
    pub fn new(mut keys: Vec<(f64, f64)>) -> Result<Self, ConfigError> {
        if keys.is_empty() {
            return Err(ConfigError::InvalidIspCurve("no keys".into()));
        }
        for &(p, isp) in &keys {
            if !p.is_finite() || p < 0.0 {
                return Err(ConfigError::InvalidIspCurve(format!("bad pressure key {p}")));
            }
            if !isp.is_finite() || isp <= 0.0 {
                return Err(ConfigError::InvalidIspCurve(format!(
                    "Isp must be positive, got {isp} at {p} atm"
                )));
            }
        }
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        if keys.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(ConfigError::InvalidIspCurve("duplicate pressure key".into()));
        }
        Ok(Self { keys })
    }

    /// Flat curve: the same Isp at every pressure.
    pub fn constant(isp: f64) -> Result<Self, ConfigError> {
        Self::new(vec![(0.0, isp)])
    }

    /// Isp in seconds at `pressure_atm`.
    pub fn evaluate(&self, pressure_atm: f64) -> f64 {
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];
        if !(pressure_atm > first.0) {
            // also catches NaN
            return first.1;
        }
        if pressure_atm >= last.0 {
            return last.1;
        }
        let hi = self.keys.partition_point(|k| k.0 <= pressure_atm);
        let (p0, i0) = self.keys[hi - 1];
        let (p1, i1) = self.keys[hi];
        let frac = (pressure_atm - p0) / (p1 - p0);
        i0 + frac * (i1 - i0)
    }

    pub fn vacuum_isp(&self) -> f64 {
        self.evaluate(0.0)
    }

    pub fn keys(&self) -> &[(f64, f64)] {
        &self.keys
    }
}

impl TryFrom<Vec<[f64; 2]>> for IspCurve {
    type Error = ConfigError;

    fn try_from(raw: Vec<[f64; 2]>) -> Result<Self, Self::Error> {
        IspCurve::new(raw.into_iter().map(|[p, isp]| (p, isp)).collect())
    }
}

impl From<IspCurve> for Vec<[f64; 2]> {
    fn from(curve: IspCurve) -> Self {
        curve.keys.into_iter().map(|(p, isp)| [p, isp]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monoprop() -> IspCurve {
        IspCurve::new(vec![(1.0, 100.0), (0.0, 240.0), (4.0, 0.001)]).unwrap()
    }

    #[test]
    fn keys_are_sorted() {
        let c = monoprop();
        assert_eq!(c.keys()[0].0, 0.0);
        assert_eq!(c.vacuum_isp(), 240.0);
    }

    #[test]
    fn interpolates_between_keys() {
        let c = monoprop();
        assert!((c.evaluate(0.5) - 170.0).abs() < 1e-9);
    }

    #[test]
    fn holds_end_values() {
        let c = monoprop();
        assert_eq!(c.evaluate(-1.0), 240.0);
        assert_eq!(c.evaluate(10.0), 0.001);
        assert_eq!(c.evaluate(f64::NAN), 240.0);
    }

    #[test]
    fn rejects_non_positive_isp() {
        assert!(IspCurve::new(vec![(0.0, 0.0)]).is_err());
        assert!(IspCurve::new(vec![]).is_err());
        assert!(IspCurve::new(vec![(0.0, 200.0), (0.0, 100.0)]).is_err());
    }

    #[test]
    fn deserializes_from_pairs() {
        let c: IspCurve = serde_json::from_str("[[0.0, 240.0], [1.0, 100.0]]").unwrap();
        assert!((c.evaluate(1.0) - 100.0).abs() < 1e-12);
        assert!(serde_json::from_str::<IspCurve>("[[0.0, -5.0]]").is_err());
    }
}
