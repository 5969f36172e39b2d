use crate::gnc::RcsStatus;
use super::runner::Telemetry;

// ---------------------------------------------------------------------------
// Run events
// ---------------------------------------------------------------------------

/// Kinds of run events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Ignition,
    Cutoff,
    FuelDeprived,
    Resupplied,
    Disabled,
    Enabled,
    Custom(String),
}

/// A discrete event that occurred during a run.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub status: RcsStatus,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive telemetry samples and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &Telemetry, current: &Telemetry) -> Option<EventKind>;
}

/// Reports status transitions.
pub struct StatusChangeDetector;

impl EventDetector for StatusChangeDetector {
    fn check(&mut self, prev: &Telemetry, current: &Telemetry) -> Option<EventKind> {
        use RcsStatus::*;
        match (prev.status, current.status) {
            (a, b) if a == b => None,
            (_, Disabled) => Some(EventKind::Disabled),
            (Disabled, _) => Some(EventKind::Enabled),
            (_, FuelDeprived) => Some(EventKind::FuelDeprived),
            (FuelDeprived, Firing) => Some(EventKind::Resupplied),
            (_, Firing) => Some(EventKind::Ignition),
            (_, Idle) => Some(EventKind::Cutoff),
        }
    }
}

/// Fires once when cumulative fuel use crosses `budget` units.
pub struct FuelBudgetDetector {
    pub budget: f64,
    fired: bool,
}

impl FuelBudgetDetector {
    pub fn new(budget: f64) -> Self {
        Self { budget, fired: false }
    }
}

impl EventDetector for FuelBudgetDetector {
    fn check(&mut self, prev: &Telemetry, current: &Telemetry) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        if prev.fuel_used < self.budget && current.fuel_used >= self.budget {
            self.fired = true;
            Some(EventKind::Custom(format!("Fuel budget {:.3} U spent", self.budget)))
        } else {
            None
        }
    }
}

/// Fires once when the remaining propellant drops to `level` units.
/// Silent when the pool does not keep count.
pub struct FuelLevelDetector {
    pub level: f64,
    fired: bool,
}

impl FuelLevelDetector {
    pub fn new(level: f64) -> Self {
        Self { level, fired: false }
    }
}

impl EventDetector for FuelLevelDetector {
    fn check(&mut self, prev: &Telemetry, current: &Telemetry) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        match (prev.fuel_remaining, current.fuel_remaining) {
            (Some(before), Some(after)) if before > self.level && after <= self.level => {
                self.fired = true;
                Some(EventKind::Custom(format!("Fuel level {:.3} U reached", self.level)))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(status: RcsStatus, fuel_used: f64) -> Telemetry {
        Telemetry {
            time: 0.0,
            status,
            thrust: 0.0,
            torque: 0.0,
            force: 0.0,
            fuel_flow: 0.0,
            fuel_used,
            fuel_remaining: None,
            active: 0,
            throttles: vec![],
        }
    }

    fn with_level(status: RcsStatus, left: f64) -> Telemetry {
        Telemetry { fuel_remaining: Some(left), ..sample(status, 0.0) }
    }

    #[test]
    fn status_transitions() {
        use RcsStatus::*;
        let mut det = StatusChangeDetector;
        let cases = [
            (Idle, Firing, Some(EventKind::Ignition)),
            (Firing, Idle, Some(EventKind::Cutoff)),
            (Firing, FuelDeprived, Some(EventKind::FuelDeprived)),
            (FuelDeprived, Firing, Some(EventKind::Resupplied)),
            (Firing, Disabled, Some(EventKind::Disabled)),
            (Disabled, Idle, Some(EventKind::Enabled)),
            (Firing, Firing, None),
        ];
        for (a, b, want) in cases {
            assert_eq!(det.check(&sample(a, 0.0), &sample(b, 0.0)), want, "{a} -> {b}");
        }
    }

    #[test]
    fn budget_fires_once() {
        let mut det = FuelBudgetDetector::new(1.0);
        let prev = sample(RcsStatus::Firing, 0.9);
        let curr = sample(RcsStatus::Firing, 1.1);
        assert!(det.check(&prev, &curr).is_some());
        // Should not fire again
        assert!(det.check(&prev, &curr).is_none());
    }

    #[test]
    fn level_fires_once_on_crossing() {
        let mut det = FuelLevelDetector::new(0.5);
        let above = with_level(RcsStatus::Firing, 0.6);
        let below = with_level(RcsStatus::Firing, 0.4);
        assert!(det.check(&above, &above).is_none());
        assert!(matches!(det.check(&above, &below), Some(EventKind::Custom(_))));
        assert!(det.check(&above, &below).is_none());
    }

    #[test]
    fn level_ignores_uncounted_pools() {
        let mut det = FuelLevelDetector::new(0.5);
        let above = with_level(RcsStatus::Firing, 0.6);
        assert!(det.check(&above, &sample(RcsStatus::Firing, 0.0)).is_none());
    }
}
