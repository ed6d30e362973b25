// Motion Lock - Lock State Machine
//
// Owns the reference gesture, the current attempt and the attempt counter.
// Two inputs advance it: `on_trigger` (button edge) and `on_tick` (one
// sampling opportunity). Each call returns the transition it caused, if any;
// callers forward that to the status sink exactly once.

use crate::config::{LockConfig, MAX_GESTURE_SAMPLES};
use crate::events::{LockState, Sample, Transition, TransitionDetail};
use crate::sequence::{PushOutcome, Sequence};
use crate::similarity;

pub struct LockMachine<const N: usize = MAX_GESTURE_SAMPLES> {
    state: LockState,
    reference: Sequence<N>,
    attempt: Sequence<N>,
    attempts_remaining: u8,
    config: LockConfig,
    // Set once the active buffer reports full, so the log line fires once per phase.
    full_reported: bool,
}

impl<const N: usize> LockMachine<N> {
    /// Start in `Idle` with empty sequences and a full attempt budget.
    pub fn new(config: LockConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            state: LockState::Idle,
            reference: Sequence::new(),
            attempt: Sequence::new(),
            attempts_remaining: config.max_attempts,
            config,
            full_reported: false,
        })
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn attempts_remaining(&self) -> u8 {
        self.attempts_remaining
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    pub fn reference(&self) -> &Sequence<N> {
        &self.reference
    }

    pub fn attempt(&self) -> &Sequence<N> {
        &self.attempt
    }

    /// Apply one trigger edge.
    pub fn on_trigger(&mut self) -> Option<Transition> {
        match self.state {
            LockState::Idle => {
                self.reference.reset();
                self.attempt.reset();
                self.full_reported = false;
                Some(self.enter(LockState::Recording, None))
            }
            LockState::Recording => {
                self.dump_reference();
                let samples = self.reference.len();
                Some(self.enter(
                    LockState::ReadyToUnlock,
                    Some(TransitionDetail::Recorded { samples }),
                ))
            }
            LockState::ReadyToUnlock => {
                self.attempt.reset();
                self.full_reported = false;
                Some(self.enter(LockState::Capturing, None))
            }
            LockState::Capturing => {
                let samples = self.attempt.len();
                Some(self.enter(
                    LockState::Checking,
                    Some(TransitionDetail::Captured { samples }),
                ))
            }
            // Checking advances on its own; Locked is terminal.
            LockState::Checking | LockState::Locked => None,
        }
    }

    /// Apply one sampling opportunity. `read` is only called in states that
    /// store a sample.
    pub fn on_tick<F>(&mut self, read: F) -> Option<Transition>
    where
        F: FnOnce() -> Sample,
    {
        match self.state {
            LockState::Recording => {
                if !self.reference.is_full() {
                    let outcome = self.reference.push(read());
                    self.note_push(outcome);
                } else {
                    self.note_push(PushOutcome::Full);
                }
                None
            }
            LockState::Capturing => {
                if !self.attempt.is_full() {
                    let outcome = self.attempt.push(read());
                    self.note_push(outcome);
                } else {
                    self.note_push(PushOutcome::Full);
                }
                None
            }
            LockState::Checking => Some(self.check()),
            LockState::Idle | LockState::ReadyToUnlock | LockState::Locked => None,
        }
    }

    /// Run the single comparison owed by `Checking`.
    fn check(&mut self) -> Transition {
        let report = similarity::compare(
            self.reference.as_slice(),
            self.attempt.as_slice(),
            &self.config,
        );

        if report.matched {
            self.reference.reset();
            self.attempt.reset();
            return self.enter(LockState::Idle, Some(TransitionDetail::Verdict(report)));
        }

        self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
        let next = if self.attempts_remaining == 0 {
            LockState::Locked
        } else {
            LockState::ReadyToUnlock
        };
        let detail = TransitionDetail::Rejected {
            report,
            attempts_remaining: self.attempts_remaining,
        };
        self.enter(next, Some(detail))
    }

    fn enter(&mut self, next: LockState, detail: Option<TransitionDetail>) -> Transition {
        let mut transition = Transition::new(self.state, next);
        match detail {
            Some(detail) => {
                log::info!("Lock: {} -> {} ({})", self.state.label(), next.label(), detail);
                transition = transition.with_detail(detail);
            }
            None => log::info!("Lock: {} -> {}", self.state.label(), next.label()),
        }
        self.state = next;
        transition
    }

    fn note_push(&mut self, outcome: PushOutcome) {
        if outcome == PushOutcome::Full && !self.full_reported {
            self.full_reported = true;
            log::debug!(
                "Gesture buffer full ({} samples) - ignoring further samples",
                N
            );
        }
    }

    fn dump_reference(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        log::debug!("Recorded gesture ({} samples):", self.reference.len());
        for (i, s) in self.reference.iter().enumerate() {
            log::debug!("  {:3}: X: {}, Y: {}, Z: {}", i, s.x, s.y, s.z);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> LockMachine<3> {
        LockMachine::new(LockConfig::default()).unwrap()
    }

    fn tick_with(m: &mut LockMachine<3>, sample: Sample) -> Option<Transition> {
        m.on_tick(|| sample)
    }

    fn record(m: &mut LockMachine<3>, samples: &[Sample]) {
        m.on_trigger();
        for &s in samples {
            tick_with(m, s);
        }
        m.on_trigger();
    }

    fn replay(m: &mut LockMachine<3>, samples: &[Sample]) -> Option<Transition> {
        m.on_trigger();
        for &s in samples {
            tick_with(m, s);
        }
        m.on_trigger();
        m.on_tick(|| panic!("checking must not sample"))
    }

    const GESTURE: [Sample; 3] = [
        Sample::new(1, 1, 1),
        Sample::new(2, 2, 2),
        Sample::new(3, 3, 3),
    ];

    const WRONG: [Sample; 3] = [
        Sample::new(2000, -2000, 2000),
        Sample::new(2000, -2000, 2000),
        Sample::new(2000, -2000, 2000),
    ];

    #[test]
    fn starts_idle_and_empty() {
        let m = machine();
        assert_eq!(m.state(), LockState::Idle);
        assert!(m.reference().is_empty());
        assert!(m.attempt().is_empty());
        assert_eq!(m.attempts_remaining(), 5);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = LockConfig { max_attempts: 0, ..LockConfig::default() };
        assert!(LockMachine::<3>::new(config).is_err());
    }

    #[test]
    fn ticks_in_non_sampling_states_do_not_read() {
        let mut m = machine();
        assert_eq!(m.on_tick(|| panic!("idle must not sample")), None);
        record(&mut m, &GESTURE);
        assert_eq!(m.state(), LockState::ReadyToUnlock);
        assert_eq!(m.on_tick(|| panic!("ready must not sample")), None);
    }

    #[test]
    fn recording_stops_at_capacity() {
        let mut m = machine();
        m.on_trigger();
        for i in 0..10 {
            tick_with(&mut m, Sample::new(i, i, i));
        }
        assert_eq!(m.reference().len(), 3);
        assert_eq!(m.reference().as_slice()[2], Sample::new(2, 2, 2));
    }

    #[test]
    fn full_buffer_skips_reading() {
        let mut m = machine();
        m.on_trigger();
        for &s in &GESTURE {
            tick_with(&mut m, s);
        }
        assert_eq!(m.on_tick(|| panic!("full buffer must not sample")), None);
    }

    #[test]
    fn matching_replay_unlocks_and_clears() {
        let mut m = machine();
        record(&mut m, &GESTURE);
        let t = replay(&mut m, &GESTURE).expect("checking always transitions");

        assert_eq!(t.from, LockState::Checking);
        assert_eq!(t.to, LockState::Idle);
        assert!(t.is_unlock());
        assert!(matches!(t.detail, Some(TransitionDetail::Verdict(r)) if r.matched));
        assert!(m.reference().is_empty());
        assert!(m.attempt().is_empty());
    }

    #[test]
    fn success_does_not_refund_attempts() {
        let mut m = machine();
        record(&mut m, &GESTURE);
        replay(&mut m, &WRONG);
        replay(&mut m, &GESTURE);
        assert_eq!(m.state(), LockState::Idle);
        assert_eq!(m.attempts_remaining(), 4);
    }

    #[test]
    fn mismatch_consumes_one_attempt_and_retries() {
        let mut m = machine();
        record(&mut m, &GESTURE);
        let t = replay(&mut m, &WRONG).unwrap();

        assert_eq!(t.to, LockState::ReadyToUnlock);
        match t.detail {
            Some(TransitionDetail::Rejected { report, attempts_remaining }) => {
                assert!(!report.matched);
                assert_eq!(attempts_remaining, 4);
            }
            other => panic!("unexpected detail {:?}", other),
        }
        assert_eq!(m.reference().as_slice(), &GESTURE);
    }

    #[test]
    fn retry_overwrites_previous_attempt() {
        let mut m = machine();
        record(&mut m, &GESTURE);
        replay(&mut m, &WRONG);
        let t = replay(&mut m, &GESTURE).unwrap();
        assert!(t.is_unlock());
    }

    #[test]
    fn exhausting_attempts_locks_forever() {
        let mut m = machine();
        record(&mut m, &GESTURE);
        for expected in (0..5).rev() {
            replay(&mut m, &WRONG);
            assert_eq!(m.attempts_remaining(), expected);
        }
        assert_eq!(m.state(), LockState::Locked);

        for _ in 0..20 {
            assert_eq!(m.on_trigger(), None);
            assert_eq!(m.on_tick(|| panic!("locked must not sample")), None);
        }
        assert_eq!(m.state(), LockState::Locked);
        assert_eq!(m.attempts_remaining(), 0);
    }

    #[test]
    fn lockout_transition_reports_zero_attempts() {
        let mut m = machine();
        record(&mut m, &GESTURE);
        for _ in 0..4 {
            let t = replay(&mut m, &WRONG).unwrap();
            assert!(!t.is_lockout());
        }
        let t = replay(&mut m, &WRONG).unwrap();
        assert!(t.is_lockout());
        assert!(matches!(
            t.detail,
            Some(TransitionDetail::Rejected { attempts_remaining: 0, .. })
        ));
    }

    #[test]
    fn trigger_is_ignored_while_checking() {
        let mut m = machine();
        record(&mut m, &GESTURE);
        m.on_trigger();
        m.on_trigger();
        assert_eq!(m.state(), LockState::Checking);
        assert_eq!(m.on_trigger(), None);
        assert_eq!(m.state(), LockState::Checking);
    }

    #[test]
    fn rerecording_from_idle_replaces_reference() {
        let mut m = machine();
        record(&mut m, &GESTURE);
        replay(&mut m, &GESTURE);
        assert_eq!(m.state(), LockState::Idle);

        record(&mut m, &WRONG[..2]);
        assert_eq!(m.reference().as_slice(), &WRONG[..2]);
    }
}
