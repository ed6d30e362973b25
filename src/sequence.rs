// Motion Lock - Fixed-capacity gesture buffer
//
// Samples are stored in a `heapless::Vec`, so the capacity is fixed at
// compile time and nothing allocates after boot.

use heapless::Vec;

use crate::config::MAX_GESTURE_SAMPLES;
use crate::events::Sample;

/// Result of a single `push`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Stored,
    /// Capacity reached; the sample was dropped. Not an error.
    Full,
}

/// Ordered store of at most `N` samples.
#[derive(Debug, Clone, Default)]
pub struct Sequence<const N: usize = MAX_GESTURE_SAMPLES> {
    samples: Vec<Sample, N>,
}

impl<const N: usize> Sequence<N> {
    pub const CAPACITY: usize = N;

    pub const fn new() -> Self {
        Self { samples: Vec::new() }
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Append `sample` if there is room. Once full, further pushes are
    /// dropped and existing samples stay untouched.
    pub fn push(&mut self, sample: Sample) -> PushOutcome {
        match self.samples.push(sample) {
            Ok(()) => PushOutcome::Stored,
            Err(_) => PushOutcome::Full,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.is_full()
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Sample> {
        self.samples.iter()
    }
}

impl<const N: usize> FromIterator<Sample> for Sequence<N> {
    /// Collects up to `N` samples; the rest are dropped like `push` would.
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        let mut seq = Self::new();
        for sample in iter {
            if seq.push(sample) == PushOutcome::Full {
                break;
            }
        }
        seq
    }
}
