use std::fmt;

use serde::{Deserialize, Serialize};

/// Assembly state derived from a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RcsStatus {
    #[default]
    Disabled,
    Idle,
    Firing,
    FuelDeprived,
}

impl RcsStatus {
    /// A nozzle lit this step. Only an idle assembly becomes `Firing`;
    /// deprivation is kept for the rest of the step.
    pub fn on_fire(self) -> Self {
        match self {
            RcsStatus::Idle => RcsStatus::Firing,
            other => other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RcsStatus::Disabled => "Disabled",
            RcsStatus::Idle => "Idle",
            RcsStatus::Firing => "Firing",
            RcsStatus::FuelDeprived => "Fuel deprived",
        }
    }
}

impl fmt::Display for RcsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why thrust was suppressed for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    Disabled,
    TimeWarp,
    NotControllable,
    ActionGroupOff,
    NoInput,
    BadTimestep,
}

impl Suppression {
    pub fn status(self) -> RcsStatus {
        match self {
            Suppression::Disabled => RcsStatus::Disabled,
            _ => RcsStatus::Idle,
        }
    }
}
