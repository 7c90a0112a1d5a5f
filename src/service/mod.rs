pub mod rotator;

pub use rotator::{SinkRotator, rotate_with_watchdog};
