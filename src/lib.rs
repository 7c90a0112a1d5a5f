pub mod audio;
pub mod config;
pub mod logging;
pub mod rotation;
pub mod service;
pub mod session;
pub mod system;

pub use audio::{DeviceRecord, DeviceRegistry, StreamMigrator, StreamRecord};
pub use config::{Config, ConfigLoader};
pub use rotation::{ExclusionSet, NoTargetReason, select_next};
pub use service::{SinkRotator, rotate_with_watchdog};
pub use session::{
    ConnectionSignal, ListEntry, ListKind, RotateError, RotationReport, ServerEvent, Session,
    SessionOutcome,
};
pub use system::{AudioServerInterface, FileSystemInterface, StandardFileSystem};

#[cfg(feature = "pulseaudio")]
pub use system::PulseAudioServer;

#[cfg(any(test, feature = "test-mocks"))]
pub use system::{MockAudioServer, MockFileSystem, ServerCall};

/// Prefix for diagnostics written to stderr
pub const PROGRAM_TAG: &str = "sink-rotator";
