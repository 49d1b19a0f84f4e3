use serde::Serialize;

use crate::dynamics::state::State;
use crate::error::{SimError, SimResult};

/// One solver output point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub time: f64, // s
    pub state: State,
}

/// Time-ordered simulation output with strictly increasing time.
///
/// Built by the runner; immutable once handed to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trace {
    samples: Vec<Sample>,
}

impl Trace {
    pub(crate) fn with_capacity(cap: usize) -> Self {
        Self { samples: Vec::with_capacity(cap) }
    }

    pub(crate) fn push(&mut self, sample: Sample) {
        debug_assert!(self.samples.last().map_or(true, |s| sample.time > s.time));
        self.samples.push(sample);
    }

    /// Build a trace from existing samples, checking time ordering.
    pub fn from_samples(samples: Vec<Sample>) -> SimResult<Self> {
        for (i, pair) in samples.windows(2).enumerate() {
            if !(pair[1].time > pair[0].time) {
                return Err(SimError::NonMonotonicTrace { index: i + 1, time: pair[1].time });
            }
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.time)
    }

    pub fn velocities(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.state.vel)
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
