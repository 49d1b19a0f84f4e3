use std::io::{self, Write};
use std::path::Path;

use crate::physics::Constants;
use crate::sim::Trace;

/// Write trace data to CSV format.
///
/// Columns: time_s, pos_m, vel_ms, vel_kmh
pub fn write_trace<W: Write>(writer: &mut W, trace: &Trace, consts: &Constants) -> io::Result<()> {
    writeln!(writer, "time_s,pos_m,vel_ms,vel_kmh")?;

    for s in trace {
        writeln!(
            writer,
            "{:.6},{:.4},{:.6},{:.4}",
            s.time,
            s.state.pos,
            s.state.vel,
            consts.to_display(s.state.vel),
        )?;
    }

    Ok(())
}

/// Write trace to a CSV file at the given path.
pub fn write_trace_file(path: &Path, trace: &Trace, consts: &Constants) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trace(&mut file, trace, consts)
}
