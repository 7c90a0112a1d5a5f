use std::fmt;
use tracing::{debug, warn};

/// A sink as reported by the server, tagged with its discovery ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pub name: String,
    pub position: usize,
}

/// An active sink input that may be moved to another sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecord {
    pub index: u32,
    pub name: Option<String>,
}

/// Sinks in the order the server listed them.
///
/// Append-only for the duration of one enumeration pass. The ordinal of each
/// record is its insertion index and carries no other meaning.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Vec<DeviceRecord>,
}

impl fmt::Display for DeviceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.position, self.name)
    }
}

impl fmt::Display for StreamRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", self.index, name),
            None => write!(f, "{}", self.index),
        }
    }
}

impl StreamRecord {
    pub fn new(index: u32) -> Self {
        Self { index, name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sink. Returns `false` if the name was already listed in this pass.
    pub fn push(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.position_of(&name).is_some() {
            warn!("Sink '{}' reported twice, ignoring duplicate", name);
            return false;
        }

        let record = DeviceRecord {
            position: self.devices.len(),
            name,
        };
        debug!("Discovered sink {}", record);
        self.devices.push(record);
        true
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.devices.iter().position(|d| d.name == name)
    }

    pub fn get(&self, position: usize) -> Option<&DeviceRecord> {
        self.devices.get(position)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.devices.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.devices.iter().map(|d| d.name.as_str()).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for DeviceRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut registry = DeviceRegistry::new();
        for name in iter {
            registry.push(name);
        }
        registry
    }
}
