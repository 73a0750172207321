pub mod event;
pub mod status;
pub mod subject;

pub use event::{Event, RawRow};
pub use status::Status;
pub use subject::Subject;
