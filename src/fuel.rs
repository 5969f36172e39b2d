use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Propellant resources
// ---------------------------------------------------------------------------

/// Name of a propellant resource, e.g. `"MonoPropellant"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Source of propellant queried by the allocator.
///
/// A request reserves up to `amount` units and returns what was actually
/// granted, `0 <= granted <= amount`. Requests never block.
pub trait FuelPool {
    fn request(&mut self, resource: &ResourceId, amount: f64) -> f64;

    /// Units left of `resource`, when the pool keeps count.
    fn level(&self, _resource: &ResourceId) -> Option<f64> {
        None
    }
}

/// Grants every request in full.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlimitedFuel;

impl FuelPool for UnlimitedFuel {
    fn request(&mut self, _resource: &ResourceId, amount: f64) -> f64 {
        amount.max(0.0)
    }
}

/// Finite tanks keyed by resource, drained by each request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FuelTanks {
    amounts: HashMap<ResourceId, f64>,
}

impl FuelTanks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, resource: impl Into<ResourceId>, amount: f64) -> Self {
        self.fill(resource.into(), amount);
        self
    }

    /// Sets the tank contents for `resource`, replacing what was there.
    pub fn fill(&mut self, resource: ResourceId, amount: f64) {
        self.amounts.insert(resource, amount.max(0.0));
    }

    pub fn remaining(&self, resource: &ResourceId) -> f64 {
        self.amounts.get(resource).copied().unwrap_or(0.0)
    }
}

impl FuelPool for FuelTanks {
    fn request(&mut self, resource: &ResourceId, amount: f64) -> f64 {
        let Some(left) = self.amounts.get_mut(resource) else {
            return 0.0;
        };
        let granted = amount.max(0.0).min(*left);
        *left -= granted;
        granted
    }

    fn level(&self, resource: &ResourceId) -> Option<f64> {
        Some(self.remaining(resource))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tanks_drain_and_run_dry() {
        let mono = ResourceId::new("MonoPropellant");
        let mut tanks = FuelTanks::new().with("MonoPropellant", 1.0);
        assert_eq!(tanks.request(&mono, 0.75), 0.75);
        assert!((tanks.request(&mono, 0.75) - 0.25).abs() < 1e-12);
        assert_eq!(tanks.request(&mono, 0.75), 0.0);
        assert_eq!(tanks.remaining(&mono), 0.0);
    }

    #[test]
    fn unknown_resource_grants_nothing() {
        let mut tanks = FuelTanks::new().with("LiquidFuel", 10.0);
        assert_eq!(tanks.request(&"Xenon".into(), 1.0), 0.0);
    }

    #[test]
    fn unlimited_grants_in_full() {
        let mut pool = UnlimitedFuel;
        assert_eq!(pool.request(&"Any".into(), 3.5), 3.5);
        assert_eq!(pool.level(&"Any".into()), None);
    }

    #[test]
    fn tanks_report_level() {
        let mut tanks = FuelTanks::new().with("MonoPropellant", 2.0);
        let mono = ResourceId::new("MonoPropellant");
        tanks.request(&mono, 0.5);
        assert_eq!(tanks.level(&mono), Some(1.5));
        assert_eq!(tanks.level(&"Xenon".into()), Some(0.0));
    }

    #[test]
    fn tanks_deserialize_from_map() {
        let tanks: FuelTanks = serde_json::from_str(r#"{"MonoPropellant": 7.5}"#).unwrap();
        assert_eq!(tanks.remaining(&"MonoPropellant".into()), 7.5);
    }
}
