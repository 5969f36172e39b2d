pub mod config;
pub mod error;
pub mod fuel;
pub mod fx;
mod gnc_mod;
pub mod io;
pub mod physics;
pub mod sim;
pub mod vehicle;

// The gnc module: expose gnc_mod as `gnc` publicly
pub mod gnc {
    pub use crate::gnc_mod::*;
}

pub mod types {
    pub use crate::error::ConfigError;
    pub use crate::fuel::{FuelPool, FuelTanks, ResourceId, UnlimitedFuel};
    pub use crate::fx::{FxBank, NullFx, ThrusterEffectSink};
    pub use crate::gnc::{Gates, RcsAllocator, RcsStatus, StepInputs, StepResult};
    pub use crate::physics::{IspCurve, G0};
    pub use crate::vehicle::{RcsBuilder, Thruster};
}
