use crate::dynamics::state::State;
use crate::sim::trace::{Sample, Trace};

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Speed crossed a threshold going up, m/s.
    SpeedReached { speed_ms: f64 },
}

/// A discrete event located between two trace samples.
#[derive(Debug, Clone, PartialEq)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub state: State,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive samples and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<SimEvent>;
}

/// Linear interpolation of the sample pair at parameter `frac` in [0, 1].
fn lerp(prev: &Sample, current: &Sample, frac: f64) -> (f64, State) {
    let time = prev.time + frac * (current.time - prev.time);
    let state = State::new(
        prev.state.pos + frac * (current.state.pos - prev.state.pos),
        prev.state.vel + frac * (current.state.vel - prev.state.vel),
    );
    (time, state)
}

/// Detects the first upward crossing of a speed threshold.
pub struct SpeedDetector {
    pub speed_ms: f64,
    fired: bool,
}

impl SpeedDetector {
    pub fn new(speed_ms: f64) -> Self {
        Self { speed_ms, fired: false }
    }
}

impl EventDetector for SpeedDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<SimEvent> {
        if self.fired {
            return None;
        }
        let (v0, v1) = (prev.state.vel, current.state.vel);
        if v0 < self.speed_ms && v1 >= self.speed_ms {
            self.fired = true;
            let (time, state) = lerp(prev, current, (self.speed_ms - v0) / (v1 - v0));
            Some(SimEvent {
                time,
                kind: EventKind::SpeedReached { speed_ms: self.speed_ms },
                state,
            })
        } else {
            None
        }
    }
}

/// Run every detector over consecutive sample pairs, events in time order.
pub fn detect_events(trace: &Trace, detectors: &mut [Box<dyn EventDetector>]) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for pair in trace.samples().windows(2) {
        for det in detectors.iter_mut() {
            if let Some(ev) = det.check(&pair[0], &pair[1]) {
                events.push(ev);
            }
        }
    }
    events.sort_by(|a, b| a.time.total_cmp(&b.time));
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_sample(time: f64, pos: f64, vel: f64) -> Sample {
        Sample { time, state: State::new(pos, vel) }
    }

    #[test]
    fn speed_crossing_interpolated() {
        let mut det = SpeedDetector::new(20.0);
        let prev = make_sample(1.0, 10.0, 15.0);
        let curr = make_sample(2.0, 30.0, 25.0);
        let ev = det.check(&prev, &curr).unwrap();
        assert!((ev.time - 1.5).abs() < 1e-12);
        assert!((ev.state.vel - 20.0).abs() < 1e-12);
        assert!((ev.state.pos - 20.0).abs() < 1e-12);
        // Should not fire again
        assert!(det.check(&prev, &curr).is_none());
    }

    #[test]
    fn speed_already_above_threshold_never_fires() {
        let mut det = SpeedDetector::new(5.0);
        assert!(det.check(&make_sample(0.0, 0.0, 10.0), &make_sample(1.0, 10.0, 12.0)).is_none());
    }

    #[test]
    fn detect_events_sorted() {
        let trace = Trace::from_samples(vec![
            make_sample(0.0, 0.0, 10.0),
            make_sample(1.0, 15.0, 20.0),
            make_sample(2.0, 40.0, 30.0),
        ])
        .unwrap();
        let mut dets: Vec<Box<dyn EventDetector>> =
            vec![Box::new(SpeedDetector::new(25.0)), Box::new(SpeedDetector::new(15.0))];
        let events = detect_events(&trace, &mut dets);
        assert_eq!(events.len(), 2);
        assert!((events[0].time - 0.5).abs() < 1e-12);
        assert!((events[1].time - 1.5).abs() < 1e-12);
    }
}
