// Motion Lock - gesture capture and matching core
//
// Hardware-free half of the firmware: the lock state machine, its
// fixed-capacity gesture buffers, the similarity check and the glue the
// firmware's lock loop runs on. Builds and tests on the host.

pub mod config;
pub mod events;
pub mod lock;
pub mod runtime;
pub mod sequence;
pub mod similarity;

pub use config::{LockConfig, Metric};
pub use events::{LockState, Sample, Transition, TransitionDetail};
pub use lock::LockMachine;
pub use runtime::{LockLoop, SampleSource, StatusSink, TriggerFlag};
pub use sequence::{PushOutcome, Sequence};
pub use similarity::MatchReport;
