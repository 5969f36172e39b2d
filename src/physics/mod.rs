pub mod atmosphere;
pub mod isp;

pub use isp::IspCurve;

pub const G0: f64 = 9.80665; // standard gravity, m/s^2
