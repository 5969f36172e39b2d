use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use rcs_sim::config::Scenario;
use rcs_sim::fx::FxBank;
use rcs_sim::io::{csv, json};
use rcs_sim::physics::atmosphere;
use rcs_sim::sim::{self, FuelBudgetDetector, FuelLevelDetector, StatusChangeDetector};

#[derive(Parser, Debug)]
#[command(version, about = "Replay an RCS scenario and report thrust and fuel use")]
struct Args {
    /// Scenario JSON file; the built-in block ring checkout when omitted
    #[arg(short, long)]
    scenario: Option<String>,
    /// Write per-step telemetry as CSV
    #[arg(long)]
    csv: Option<String>,
    /// Write the run summary as JSON
    #[arg(long)]
    json: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let scenario = match &args.scenario {
        Some(path) => Scenario::from_file(path).with_context(|| format!("loading {path}"))?,
        None => Scenario::preset(),
    };
    info!(name = %scenario.name, "Scenario loaded");

    let mut rcs = scenario.assembly.build().context("building RCS assembly")?;
    let mut tanks = scenario.tanks.clone();
    let mut schedule = scenario.schedule.clone();
    let mut fx = FxBank::new(rcs.thrusters().len());
    let start_fuel = tanks.remaining(rcs.resource());

    let mut detectors: Vec<Box<dyn sim::EventDetector>> = vec![Box::new(StatusChangeDetector)];
    if start_fuel > 0.0 {
        detectors.push(Box::new(FuelBudgetDetector::new(start_fuel * 0.5)));
        detectors.push(Box::new(FuelLevelDetector::new(start_fuel * 0.1)));
    }

    let run = sim::run_with(
        &mut rcs,
        &scenario.vessel,
        &scenario.gates,
        &mut schedule,
        &mut tanks,
        &mut fx,
        &mut detectors,
        &scenario.sim,
    );
    let summary = json::RunSummary::from_run(&scenario.name, &run, &scenario.sim);

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  RCS SCENARIO — {}", scenario.name);
    println!("====================================================================");
    println!();
    println!("  Assembly");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Name:          {:>12}    Nozzles:      {:>8}",
        rcs.name(),
        rcs.thrusters().len()
    );
    println!(
        "  Resource:      {:>12}    Unit mass:    {:>8.4}",
        rcs.resource().as_str(),
        rcs.resource_unit_mass()
    );
    let pressure = atmosphere::pressure_atm(scenario.vessel.altitude);
    println!(
        "  Isp (vac):     {:>8.1} s      Isp (here):   {:>8.1} s  ({:.2e} atm)",
        rcs.isp_curve().vacuum_isp(),
        rcs.isp_curve().evaluate(pressure),
        pressure
    );
    println!(
        "  Fuel loaded:   {:>8.3} U      Fuel left:    {:>8.3} U",
        start_fuel,
        tanks.remaining(rcs.resource())
    );
    println!();

    println!("  Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    if run.events.is_empty() {
        println!("  (none)");
    }
    for e in &run.events {
        println!("  t={:>7.2}s   {:<32}  status: {}", e.time, format!("{:?}", e.kind), e.status);
    }
    println!();

    println!("  Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Total impulse: {:>10.3} kN·s", summary.total_impulse);
    println!("  Fuel used:     {:>10.3} U", summary.fuel_used);
    println!("  Peak thrust:   {:>10.3} kN", summary.peak_thrust);
    println!("  Peak torque:   {:>10.3} kN·m", summary.peak_torque);
    println!("  Peak flow:     {:>10.3} U/s", summary.peak_fuel_flow);
    println!(
        "  Firing:        {:>10.2} s     Deprived:  {:>8.2} s",
        summary.time_firing_s, summary.time_deprived_s
    );
    println!();

    // -----------------------------------------------------------------------
    // Telemetry table (sampled)
    // -----------------------------------------------------------------------
    println!("  Telemetry");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>14}  {:>9}  {:>9}  {:>9}  {:>8}",
        "t (s)", "status", "thrust", "torque", "flow", "active"
    );
    println!("  {}", "─".repeat(64));

    let sample_interval = (run.telemetry.len() / 30).max(1);
    for (i, t) in run.telemetry.iter().enumerate() {
        if i % sample_interval != 0 && i != run.telemetry.len() - 1 {
            continue;
        }
        println!(
            "  {:>7.2}  {:>14}  {:>9.3}  {:>9.3}  {:>9.4}  {:>8}",
            t.time, t.status.label(), t.thrust, t.torque, t.fuel_flow, t.active
        );
    }
    println!();
    println!(
        "  Simulation: {} steps, dt={} s, {} steps/frame",
        run.telemetry.len(),
        scenario.sim.dt,
        scenario.sim.steps_per_frame
    );
    println!("====================================================================");
    println!();

    if let Some(path) = &args.csv {
        csv::write_telemetry_file(path, &run.telemetry).with_context(|| format!("writing {path}"))?;
        info!(%path, "Telemetry written");
    }
    if let Some(path) = &args.json {
        json::write_summary_file(path, &summary).with_context(|| format!("writing {path}"))?;
        info!(%path, "Summary written");
    }

    Ok(())
}
