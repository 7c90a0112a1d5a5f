pub mod device;
pub mod migrator;

pub use device::{DeviceRecord, DeviceRegistry, StreamRecord};
pub use migrator::StreamMigrator;
