pub mod assembly;
pub mod thruster;

pub use assembly::{presets, RcsBuilder};
pub use thruster::Thruster;
