pub mod error;
pub mod events;
pub mod machine;

pub use error::{ListKind, RotateError};
pub use events::{ConnectionSignal, ListEntry, ServerEvent};
pub use machine::{ConnectionState, Phase, RotationReport, Session, SessionOutcome};
