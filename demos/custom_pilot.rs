use rcs_sim::fuel::FuelTanks;
use rcs_sim::fx::FxBank;
use rcs_sim::gnc::{ControlSource, ControlState, Gates};
use rcs_sim::sim::{self, SimConfig, VesselFrame};
use rcs_sim::vehicle::presets;

/// Pulses roll left and right with a fixed period, the way a pilot taps
/// the keys to null out a slow spin.
struct PulsePilot {
    period: f64,
    duty: f64,
}

impl ControlSource for PulsePilot {
    fn control(&mut self, time: f64) -> ControlState {
        let phase = (time / self.period).fract();
        let roll = if phase < self.duty {
            1.0
        } else if (0.5..0.5 + self.duty).contains(&phase) {
            -1.0
        } else {
            0.0
        };
        ControlState { roll, ..Default::default() }
    }

    fn name(&self) -> &str {
        "PulsePilot"
    }
}

fn main() {
    let mut rcs = presets::block_ring(1.25).expect("preset assembly is valid");
    let mut tanks = FuelTanks::new().with("MonoPropellant", 1.0);
    let mut fx = FxBank::new(rcs.thrusters().len());
    let mut pilot = PulsePilot { period: 2.0, duty: 0.2 };
    let config = SimConfig { dt: 0.02, max_time: 20.0, steps_per_frame: 2 };

    println!("Flying {} with {}...", rcs.name(), pilot.name());
    let run = sim::run(
        &mut rcs,
        &VesselFrame::default(),
        &Gates::default(),
        &mut pilot,
        &mut tanks,
        &mut fx,
        &config,
    );

    for e in &run.events {
        println!("t={:>6.2}s  {:?}", e.time, e.kind);
    }
    println!("Fuel left: {:.3} U", tanks.remaining(rcs.resource()));
    println!("Final status: {}", rcs.status());
}
