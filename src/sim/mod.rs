pub mod event;
pub mod runner;

pub use event::{EventDetector, EventKind, FuelBudgetDetector, FuelLevelDetector, SimEvent, StatusChangeDetector};
pub use runner::{run, run_with, Run, SimConfig, Telemetry, VesselFrame};
