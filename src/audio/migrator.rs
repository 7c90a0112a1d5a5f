use std::collections::HashSet;
use tracing::{debug, warn};

use crate::system::AudioServerInterface;

use super::device::StreamRecord;

/// Moves every enumerated sink input to the selected sink, once each.
#[derive(Debug)]
pub struct StreamMigrator {
    target: String,
    relocated: HashSet<u32>,
}

impl StreamMigrator {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            relocated: HashSet::new(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Issue the move for `stream`. Completion is not awaited.
    pub fn relocate<A: AudioServerInterface + ?Sized>(
        &mut self,
        stream: &StreamRecord,
        server: &mut A,
    ) -> bool {
        if !self.relocated.insert(stream.index) {
            warn!("Sink input {} listed twice, not moving it again", stream);
            return false;
        }

        debug!("Moving sink input {} to {}", stream, self.target);
        server.move_sink_input(stream.index, &self.target);
        true
    }

    pub fn relocated_count(&self) -> usize {
        self.relocated.len()
    }
}
