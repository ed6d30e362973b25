// Motion Lock - Scheduler glue
//
// The lock loop is the only writer of lock state. The one cell it shares
// with the input side is the `TriggerFlag`; everything else leaves the loop
// as `Transition` values through the status sink.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;

use crate::config::{LockConfig, MAX_GESTURE_SAMPLES};
use crate::events::{LockState, Sample, Transition};
use crate::lock::LockMachine;

// ---------------------------------------------------------------------------
// Boundary roles
// ---------------------------------------------------------------------------

/// Pull-based motion sampler.
pub trait SampleSource {
    fn read_sample(&mut self) -> Sample;
}

/// Receives one notification per state transition.
pub trait StatusSink {
    fn notify(&mut self, transition: &Transition);
}

impl StatusSink for Sender<Transition> {
    fn notify(&mut self, transition: &Transition) {
        if self.send(*transition).is_err() {
            log::warn!("Status channel closed - dropping {:?}", transition);
        }
    }
}

impl StatusSink for Vec<Transition> {
    fn notify(&mut self, transition: &Transition) {
        self.push(*transition);
    }
}

// ---------------------------------------------------------------------------
// Trigger mailbox
// ---------------------------------------------------------------------------

/// Single-slot pending-trigger flag. Several `set` calls before a `take`
/// collapse into one trigger.
#[derive(Debug, Default)]
pub struct TriggerFlag(AtomicBool);

impl TriggerFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Read and clear in one atomic step.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// ---------------------------------------------------------------------------
// Lock loop
// ---------------------------------------------------------------------------
pub struct LockLoop<const N: usize = MAX_GESTURE_SAMPLES> {
    machine: LockMachine<N>,
}

impl<const N: usize> LockLoop<N> {
    pub fn new(config: LockConfig) -> anyhow::Result<Self> {
        Ok(Self {
            machine: LockMachine::new(config)?,
        })
    }

    pub fn machine(&self) -> &LockMachine<N> {
        &self.machine
    }

    pub fn state(&self) -> LockState {
        self.machine.state()
    }

    /// One scheduler iteration: consume a pending trigger, then offer one
    /// tick. Returns the number of transitions forwarded to `sink`.
    pub fn poll<S, K>(&mut self, trigger: &TriggerFlag, source: &mut S, sink: &mut K) -> usize
    where
        S: SampleSource + ?Sized,
        K: StatusSink + ?Sized,
    {
        let mut forwarded = 0;

        if trigger.take() {
            if let Some(transition) = self.machine.on_trigger() {
                sink.notify(&transition);
                forwarded += 1;
            }
        }

        if let Some(transition) = self.machine.on_tick(|| source.read_sample()) {
            sink.notify(&transition);
            forwarded += 1;
        }

        forwarded
    }
}
