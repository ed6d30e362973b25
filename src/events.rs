// Motion Lock - Samples, States & Transition Events

use core::fmt;

use crate::similarity::MatchReport;

// ---------------------------------------------------------------------------
// Sample (raw 3-axis accelerometer reading)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl Sample {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Axis value by index: 0 = x, 1 = y, 2 = z.
    #[inline]
    pub fn axis(&self, axis: usize) -> i16 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }
}

// ---------------------------------------------------------------------------
// Lock state
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum LockState {
    /// Nothing recorded; the next trigger starts a recording.
    #[default]
    Idle = 0,
    /// Reference gesture being recorded.
    Recording = 1,
    /// Reference stored, waiting for the trigger that starts a replay.
    ReadyToUnlock = 2,
    /// Replay gesture being captured.
    Capturing = 3,
    /// One comparison runs on the next tick.
    Checking = 4,
    /// Attempts exhausted. Terminal.
    Locked = 5,
}

impl LockState {
    #[inline]
    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    /// Decode a raw state value. Anything outside the known set falls back
    /// to `Idle`.
    pub fn from_raw(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Recording,
            2 => Self::ReadyToUnlock,
            3 => Self::Capturing,
            4 => Self::Checking,
            5 => Self::Locked,
            other => {
                log::warn!("Unknown lock state {} - falling back to Idle", other);
                Self::Idle
            }
        }
    }

    /// Human-readable label for logs and status output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::ReadyToUnlock => "ready",
            Self::Capturing => "capturing",
            Self::Checking => "checking",
            Self::Locked => "locked",
        }
    }

    /// States in which a tick appends a sample.
    pub fn is_sampling(&self) -> bool {
        matches!(self, Self::Recording | Self::Capturing)
    }
}

// ---------------------------------------------------------------------------
// Transition notifications - one per state change, sent to the status sink
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionDetail {
    /// Recording finished with this many reference samples.
    Recorded { samples: usize },
    /// Replay finished with this many samples.
    Captured { samples: usize },
    /// Replay matched the reference.
    Verdict(MatchReport),
    /// Replay did not match; one attempt consumed.
    Rejected {
        report: MatchReport,
        attempts_remaining: u8,
    },
}

impl fmt::Display for TransitionDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recorded { samples } => write!(f, "recorded {} samples", samples),
            Self::Captured { samples } => write!(f, "captured {} samples", samples),
            Self::Verdict(report) => write!(f, "matched, {}", ScoreLine(report)),
            Self::Rejected {
                report,
                attempts_remaining,
            } => write!(
                f,
                "rejected, {}, {} attempt(s) left",
                ScoreLine(report),
                attempts_remaining
            ),
        }
    }
}

struct ScoreLine<'a>(&'a MatchReport);

impl fmt::Display for ScoreLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.0.scores;
        write!(f, "{:?} x={:.1} y={:.1} z={:.1}", self.0.metric, x, y, z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: LockState,
    pub to: LockState,
    pub detail: Option<TransitionDetail>,
}

impl Transition {
    pub fn new(from: LockState, to: LockState) -> Self {
        Self { from, to, detail: None }
    }

    pub fn with_detail(mut self, detail: TransitionDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    /// True for the Checking → Idle edge.
    pub fn is_unlock(&self) -> bool {
        self.from == LockState::Checking && self.to == LockState::Idle
    }

    /// True for the edge into the terminal `Locked` state.
    pub fn is_lockout(&self) -> bool {
        self.to == LockState::Locked
    }
}
