use std::io::{self, Write};

use crate::sim::Telemetry;

/// Write run telemetry to CSV format.
///
/// Columns: time, status, thrust, torque, force, fuel_flow, fuel_used,
///          fuel_left (empty for uncounted pools), active,
///          then one throttle column per nozzle (thr_0, thr_1, ...)
pub fn write_telemetry<W: Write>(writer: &mut W, telemetry: &[Telemetry]) -> io::Result<()> {
    let nozzles = telemetry.first().map(|t| t.throttles.len()).unwrap_or(0);

    write!(writer, "time,status,thrust,torque,force,fuel_flow,fuel_used,fuel_left,active")?;
    for i in 0..nozzles {
        write!(writer, ",thr_{i}")?;
    }
    writeln!(writer)?;

    for t in telemetry {
        write!(
            writer,
            "{:.4},{},{:.4},{:.4},{:.4},{:.6},{:.6}",
            t.time, t.status, t.thrust, t.torque, t.force, t.fuel_flow, t.fuel_used,
        )?;
        match t.fuel_remaining {
            Some(left) => write!(writer, ",{:.6}", left)?,
            None => write!(writer, ",")?,
        }
        write!(writer, ",{}", t.active)?;
        for thr in &t.throttles {
            write!(writer, ",{:.4}", thr)?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Write telemetry to a CSV file at the given path.
pub fn write_telemetry_file(path: &str, telemetry: &[Telemetry]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_telemetry(&mut file, telemetry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gnc::RcsStatus;

    #[test]
    fn csv_output_has_header_and_rows() {
        let telemetry = vec![
            Telemetry {
                time: 0.0,
                status: RcsStatus::Idle,
                thrust: 0.0,
                torque: 0.0,
                force: 0.0,
                fuel_flow: 0.0,
                fuel_used: 0.0,
                fuel_remaining: None,
                active: 0,
                throttles: vec![0.0, 0.0],
            },
            Telemetry {
                time: 0.02,
                status: RcsStatus::FuelDeprived,
                thrust: 1.0,
                torque: 0.5,
                force: 1.0,
                fuel_flow: 0.1,
                fuel_used: 0.002,
                fuel_remaining: Some(0.998),
                active: 1,
                throttles: vec![1.0, 0.0],
            },
        ];

        let mut buf = Vec::new();
        write_telemetry(&mut buf, &telemetry).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("time,"));
        assert!(lines[0].ends_with("thr_0,thr_1"));
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].contains(",0.000000,,0,"));
        assert!(lines[2].starts_with("0.0200,Fuel deprived,"));
        assert!(lines[2].contains(",0.002000,0.998000,1,"));
        assert!(lines[2].ends_with(",1.0000,0.0000"));
    }
}
