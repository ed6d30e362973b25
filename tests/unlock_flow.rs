use std::collections::VecDeque;

use motion_lock::{
    LockConfig, LockLoop, LockState, Metric, Sample, SampleSource, Transition, TransitionDetail,
    TriggerFlag,
};

/// Replays a scripted trace; panics if the loop samples more than scripted.
struct Script(VecDeque<Sample>);

impl Script {
    fn new(samples: &[Sample]) -> Self {
        Self(samples.iter().copied().collect())
    }
}

impl SampleSource for Script {
    fn read_sample(&mut self) -> Sample {
        self.0.pop_front().expect("lock loop sampled past the scripted trace")
    }
}

struct Rig {
    lock: LockLoop<3>,
    trigger: TriggerFlag,
    events: Vec<Transition>,
}

impl Rig {
    fn new(config: LockConfig) -> Self {
        Self {
            lock: LockLoop::new(config).unwrap(),
            trigger: TriggerFlag::new(),
            events: Vec::new(),
        }
    }

    /// Press the button; the poll that consumes it also offers one tick.
    fn press(&mut self, source: &mut Script) {
        self.trigger.set();
        self.lock.poll(&self.trigger, source, &mut self.events);
    }

    fn ticks(&mut self, source: &mut Script, n: usize) {
        for _ in 0..n {
            self.lock.poll(&self.trigger, source, &mut self.events);
        }
    }

    fn state(&self) -> LockState {
        self.lock.state()
    }

    /// Record `gesture`, leaving the lock in ReadyToUnlock.
    fn record(&mut self, gesture: &[Sample]) {
        let (first, rest) = gesture.split_first().unwrap();
        let mut trace = Script::new(&[*first]);
        self.press(&mut trace);
        let mut trace = Script::new(rest);
        self.ticks(&mut trace, rest.len());
        self.press(&mut Script::new(&[]));
        assert_eq!(self.state(), LockState::ReadyToUnlock);
    }

    /// Capture `gesture` and run the check.
    fn replay(&mut self, gesture: &[Sample]) {
        let (first, rest) = gesture.split_first().unwrap();
        self.press(&mut Script::new(&[*first]));
        let mut trace = Script::new(rest);
        self.ticks(&mut trace, rest.len());
        // Capturing -> Checking, then the same poll's tick runs the check.
        self.press(&mut Script::new(&[]));
    }
}

const GESTURE: [Sample; 3] = [
    Sample::new(1, 1, 1),
    Sample::new(2, 2, 2),
    Sample::new(3, 3, 3),
];

fn wrong() -> [Sample; 3] {
    [Sample::new(900, -900, 900); 3]
}

fn states(events: &[Transition]) -> Vec<(LockState, LockState)> {
    events.iter().map(|t| (t.from, t.to)).collect()
}

#[test]
fn record_then_matching_replay_returns_to_idle() {
    let mut rig = Rig::new(LockConfig::default());
    rig.record(&GESTURE);
    rig.replay(&GESTURE);

    assert_eq!(rig.state(), LockState::Idle);
    assert_eq!(
        states(&rig.events),
        vec![
            (LockState::Idle, LockState::Recording),
            (LockState::Recording, LockState::ReadyToUnlock),
            (LockState::ReadyToUnlock, LockState::Capturing),
            (LockState::Capturing, LockState::Checking),
            (LockState::Checking, LockState::Idle),
        ]
    );
    let last = rig.events.last().unwrap();
    assert!(last.is_unlock());
    match last.detail {
        Some(TransitionDetail::Verdict(report)) => {
            assert!(report.matched);
            assert_eq!(report.scores, [0.0; 3]);
        }
        other => panic!("unexpected detail {:?}", other),
    }
    assert!(matches!(
        rig.events[1].detail,
        Some(TransitionDetail::Recorded { samples: 3 })
    ));
}

#[test]
fn five_misses_lock_out_and_sixth_trigger_is_ignored() {
    let mut rig = Rig::new(LockConfig::default());
    rig.record(&GESTURE);

    for expected in (0..5u8).rev() {
        rig.replay(&wrong());
        match rig.events.last().unwrap().detail {
            Some(TransitionDetail::Rejected { attempts_remaining, .. }) => {
                assert_eq!(attempts_remaining, expected)
            }
            other => panic!("unexpected detail {:?}", other),
        }
        assert_eq!(rig.lock.machine().attempts_remaining(), expected);
    }
    assert_eq!(rig.state(), LockState::Locked);

    let before = rig.events.len();
    rig.press(&mut Script::new(&[]));
    rig.ticks(&mut Script::new(&[]), 50);
    assert_eq!(rig.state(), LockState::Locked);
    assert_eq!(rig.events.len(), before);
}

#[test]
fn every_transition_is_reported_exactly_once() {
    let mut rig = Rig::new(LockConfig::default());
    rig.record(&GESTURE);
    rig.replay(&wrong());
    rig.replay(&GESTURE);

    for pair in rig.events.windows(2) {
        assert_eq!(pair[0].to, pair[1].from);
        assert_ne!(pair[0].from, pair[0].to);
    }
    assert_eq!(rig.events.len(), 2 + 3 + 3);
    assert_eq!(rig.state(), LockState::Idle);
}

#[test]
fn long_gesture_is_truncated_and_still_matches() {
    let mut rig = Rig::new(LockConfig::default());
    let long: Vec<Sample> = (0..8).map(|i| Sample::new(i, i, i)).collect();

    rig.press(&mut Script::new(&long[..1]));
    rig.ticks(&mut Script::new(&long[1..3]), 2);
    // Buffer is full: further ticks must not pull samples.
    rig.ticks(&mut Script::new(&[]), 10);
    rig.press(&mut Script::new(&[]));
    assert_eq!(rig.lock.machine().reference().len(), 3);

    rig.replay(&long[..3]);
    assert_eq!(rig.state(), LockState::Idle);
}

#[test]
fn correlation_metric_drives_the_same_flow() {
    let config = LockConfig {
        threshold: 1.0,
        ..LockConfig::for_metric(Metric::CrossCorrelation)
    };
    let mut rig = Rig::new(config);
    rig.record(&GESTURE);
    rig.replay(&[Sample::new(-5, -5, -5); 3]);
    assert_eq!(rig.state(), LockState::ReadyToUnlock);

    rig.replay(&GESTURE);
    assert_eq!(rig.state(), LockState::Idle);
}
