//! Shift accounting: the state machine, the duration pass and the façade
//! the presentation layer talks to.

pub mod accumulator;
pub mod backup;
pub mod clock;
pub mod desk;
pub mod ledger;
pub mod log;
pub mod prompts;

pub use accumulator::{DurationReport, OpenShiftPolicy, Window};
pub use clock::{Clock, FixedClock, SystemClock};
pub use desk::{DeskSettings, History, PromptAction, Reply, Request, ServiceDesk};
pub use ledger::ShiftLedger;
pub use prompts::{Origin, PromptId};
