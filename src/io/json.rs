use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dynamics::terminal_speed;
use crate::error::SimResult;
use crate::physics::Constants;
use crate::sim::event::{detect_events, EventDetector, EventKind, SpeedDetector};
use crate::sim::Trace;
use crate::vehicle::VehicleParams;

// ---------------------------------------------------------------------------
// Raw samples document
// ---------------------------------------------------------------------------

/// Parallel time / velocity arrays, the wire form of a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Samples {
    pub time_s: Vec<f64>,
    pub velocity_ms: Vec<f64>,
}

/// Project a trace onto time (s) and velocity (m/s), preserving order.
pub fn render_samples(trace: &Trace) -> Samples {
    Samples {
        time_s: trace.times().collect(),
        velocity_ms: trace.velocities().collect(),
    }
}

/// Write the samples document as compact JSON.
pub fn write_samples<W: Write>(writer: &mut W, samples: &Samples) -> SimResult<()> {
    serde_json::to_writer(&mut *writer, samples)?;
    writeln!(writer)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Run summary
// ---------------------------------------------------------------------------

/// Time at which a display-unit speed was first reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Crossing {
    pub speed_kmh: f64,
    pub time_s: Option<f64>,
}

/// Summary statistics computed from an acceleration trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccelSummary {
    pub top_speed_kmh: f64,
    pub final_time_s: f64,
    pub final_speed_ms: f64,
    pub final_speed_kmh: f64,
    pub distance_m: f64,
    pub samples: usize,
    pub crossings: Vec<Crossing>,
}

impl AccelSummary {
    /// Compute summary from trace data.
    ///
    /// `thresholds_kmh` are display-unit speeds (e.g. 100 for 0-100 km/h);
    /// a threshold never crossed upward yields `time_s: None`.
    pub fn from_trace(
        trace: &Trace,
        vehicle: &VehicleParams,
        consts: &Constants,
        thresholds_kmh: &[f64],
    ) -> Self {
        let mut detectors: Vec<Box<dyn EventDetector>> = thresholds_kmh
            .iter()
            .map(|&kmh| Box::new(SpeedDetector::new(consts.from_display(kmh))) as Box<dyn EventDetector>)
            .collect();
        let events = detect_events(trace, &mut detectors);

        let crossings = thresholds_kmh
            .iter()
            .map(|&kmh| {
                let target = consts.from_display(kmh);
                let time_s = events.iter().find_map(|ev| match ev.kind {
                    EventKind::SpeedReached { speed_ms } if speed_ms == target => Some(ev.time),
                    _ => None,
                });
                Crossing { speed_kmh: kmh, time_s }
            })
            .collect();

        let (final_time_s, final_speed_ms) = trace
            .last()
            .map_or((0.0, 0.0), |s| (s.time, s.state.vel));
        let distance_m = match (trace.first(), trace.last()) {
            (Some(a), Some(b)) => b.state.pos - a.state.pos,
            _ => 0.0,
        };

        AccelSummary {
            top_speed_kmh: terminal_speed(vehicle, consts),
            final_time_s,
            final_speed_ms,
            final_speed_kmh: consts.to_display(final_speed_ms),
            distance_m,
            samples: trace.len(),
            crossings,
        }
    }
}

#[derive(Serialize)]
struct SummaryDocument<'a> {
    vehicle: &'a VehicleParams,
    performance: &'a AccelSummary,
}

/// Write the run summary as pretty JSON.
pub fn write_summary<W: Write>(
    writer: &mut W,
    vehicle: &VehicleParams,
    summary: &AccelSummary,
) -> SimResult<()> {
    let doc = SummaryDocument { vehicle, performance: summary };
    serde_json::to_writer_pretty(&mut *writer, &doc)?;
    writeln!(writer)?;
    Ok(())
}

/// Write run summary JSON to a file.
pub fn write_summary_file(
    path: &Path,
    vehicle: &VehicleParams,
    summary: &AccelSummary,
) -> SimResult<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, vehicle, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::State;
    use crate::sim::Sample;
    use crate::vehicle::presets;

    fn simple_trace() -> Trace {
        Trace::from_samples(vec![
            Sample { time: 0.0, state: State::new(0.0, 10.0) },
            Sample { time: 1.0, state: State::new(20.0, 30.0) },
            Sample { time: 2.0, state: State::new(55.0, 40.0) },
        ])
        .unwrap()
    }

    #[test]
    fn samples_are_parallel_and_ordered() {
        let s = render_samples(&simple_trace());
        assert_eq!(s.time_s, vec![0.0, 1.0, 2.0]);
        assert_eq!(s.velocity_ms, vec![10.0, 30.0, 40.0]);
    }

    #[test]
    fn samples_json_field_names() {
        let mut buf = Vec::new();
        write_samples(&mut buf, &render_samples(&simple_trace())).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["time_s"][2], 2.0);
        assert_eq!(v["velocity_ms"][1], 30.0);
    }

    #[test]
    fn summary_crossings_interpolated() {
        let c = Constants::default();
        // 72 km/h = 20 m/s, halfway through the first interval
        let s = AccelSummary::from_trace(&simple_trace(), &presets::reference(), &c, &[72.0, 500.0]);
        assert_eq!(s.crossings.len(), 2);
        assert!((s.crossings[0].time_s.unwrap() - 0.5).abs() < 1e-9);
        assert_eq!(s.crossings[1].time_s, None);
        assert!((s.distance_m - 55.0).abs() < 1e-12);
        assert!((s.final_speed_kmh - 144.0).abs() < 1e-9);
        assert_eq!(s.samples, 3);
    }

    #[test]
    fn summary_of_empty_trace() {
        let c = Constants::default();
        let s = AccelSummary::from_trace(&Trace::default(), &presets::reference(), &c, &[100.0]);
        assert_eq!(s.samples, 0);
        assert_eq!(s.crossings[0].time_s, None);
    }

    #[test]
    fn summary_json_output_is_valid() {
        let v = presets::reference();
        let summary = AccelSummary::from_trace(&simple_trace(), &v, &Constants::default(), &[100.0]);
        let mut buf = Vec::new();
        write_summary(&mut buf, &v, &summary).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["vehicle"]["power_kw"], 100.0);
        assert!(json["performance"]["top_speed_kmh"].as_f64().unwrap() > 243.0);
    }
}
