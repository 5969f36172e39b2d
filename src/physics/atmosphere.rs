use crate::types::G0;

// ---------------------------------------------------------------------------
// ISA 1976 static pressure (sea level to 86 km)
// ---------------------------------------------------------------------------

const R_AIR: f64 = 287.052_87; // specific gas constant for dry air, J/(kg·K)

/// Sea-level standard pressure, Pa. One "atmosphere" for Isp curves.
pub const P0: f64 = 101_325.0;

/// One ISA layer: base altitude (m), base temperature (K),
/// lapse rate (K/m, 0 = isothermal), base pressure (Pa).
struct Layer {
    h_base: f64,
    t_base: f64,
    lapse: f64,
    p_base: f64,
}

const LAYERS: [Layer; 7] = [
    Layer { h_base: 0.0, t_base: 288.15, lapse: -0.0065, p_base: P0 },
    Layer { h_base: 11_000.0, t_base: 216.65, lapse: 0.0, p_base: 22_632.1 },
    Layer { h_base: 20_000.0, t_base: 216.65, lapse: 0.001, p_base: 5_474.89 },
    Layer { h_base: 32_000.0, t_base: 228.65, lapse: 0.0028, p_base: 868.019 },
    Layer { h_base: 47_000.0, t_base: 270.65, lapse: 0.0, p_base: 110.906 },
    Layer { h_base: 51_000.0, t_base: 270.65, lapse: -0.0028, p_base: 66.9389 },
    Layer { h_base: 71_000.0, t_base: 214.65, lapse: -0.002, p_base: 3.956_42 },
];

const TOP_OF_TABLE: f64 = 86_000.0;

/// Static pressure (Pa) at a geometric altitude.
///
/// Negative altitudes clamp to sea level. Above 86 km the pressure decays
/// exponentially towards vacuum.
pub fn pressure(altitude_m: f64) -> f64 {
    let h = altitude_m.max(0.0);
    if h >= TOP_OF_TABLE {
        return (0.3734 * (-0.000_15 * (h - TOP_OF_TABLE)).exp()).max(0.0);
    }

    let layer = LAYERS
        .iter()
        .rev()
        .find(|l| h >= l.h_base)
        .unwrap_or(&LAYERS[0]);

    let dh = h - layer.h_base;
    if layer.lapse == 0.0 {
        layer.p_base * ((-G0 / (R_AIR * layer.t_base)) * dh).exp()
    } else {
        let t = layer.t_base + layer.lapse * dh;
        layer.p_base * (t / layer.t_base).powf(-G0 / (layer.lapse * R_AIR))
    }
}

/// Static pressure in standard atmospheres, the unit Isp curves are keyed on.
pub fn pressure_atm(altitude_m: f64) -> f64 {
    pressure(altitude_m) / P0
}
