use rcs_sim::config::Scenario;
use rcs_sim::fx::NullFx;
use rcs_sim::io::csv;
use rcs_sim::io::json::{self, RunSummary};
use rcs_sim::sim;

fn main() {
    let scenario = Scenario::preset();
    let mut rcs = scenario.assembly.build().expect("preset assembly is valid");
    let mut tanks = scenario.tanks.clone();
    let mut schedule = scenario.schedule.clone();

    println!("Replaying {} ...", scenario.name);
    let run = sim::run(
        &mut rcs,
        &scenario.vessel,
        &scenario.gates,
        &mut schedule,
        &mut tanks,
        &mut NullFx,
        &scenario.sim,
    );

    let summary = RunSummary::from_run(&scenario.name, &run, &scenario.sim);
    println!("Total impulse: {:.2} kN·s", summary.total_impulse);
    println!("Fuel used: {:.3} U", summary.fuel_used);
    println!("Time deprived: {:.2} s", summary.time_deprived_s);

    csv::write_telemetry_file("scenario_telemetry.csv", &run.telemetry)
        .expect("Failed to write CSV");
    json::write_summary_file("scenario_summary.json", &summary)
        .expect("Failed to write JSON");

    println!("Exported: scenario_telemetry.csv, scenario_summary.json");
}
