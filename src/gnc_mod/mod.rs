pub mod allocator;
pub mod controller;
pub mod input;
pub mod status;

pub use allocator::{Gates, RcsAllocator, StepInputs, StepResult, DEPRIVATION_RATIO};
pub use controller::{ControlSchedule, ControlSource, ControlWindow, HoldControl};
pub use input::{sample, ControlState, DesiredInputs};
pub use status::{RcsStatus, Suppression};
