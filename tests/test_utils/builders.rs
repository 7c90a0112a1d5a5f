//! Test utility builders for scripting mock audio servers
//!
//! Individual methods may not be used by all tests, so dead code warnings are suppressed.

#![allow(dead_code)]

use sink_rotator::{ExclusionSet, MockAudioServer, StreamRecord};

/// Builder for creating scripted MockAudioServer instances
pub struct MockServerBuilder {
    sinks: Vec<String>,
    default_sink: Option<String>,
    sink_inputs: Vec<StreamRecord>,
    connection_failure: Option<String>,
    sink_list_failure: Option<String>,
    sink_input_list_failure: Option<String>,
    drain_refused: bool,
    events_per_poll: usize,
}

impl MockServerBuilder {
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            default_sink: None,
            sink_inputs: Vec::new(),
            connection_failure: None,
            sink_list_failure: None,
            sink_input_list_failure: None,
            drain_refused: false,
            events_per_poll: 1,
        }
    }

    pub fn sinks(mut self, names: &[&str]) -> Self {
        self.sinks = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn default_sink(mut self, name: &str) -> Self {
        self.default_sink = Some(name.to_string());
        self
    }

    pub fn streams(mut self, indices: &[u32]) -> Self {
        self.sink_inputs = indices.iter().map(|&i| StreamRecord::new(i)).collect();
        self
    }

    pub fn stream(mut self, stream: StreamRecord) -> Self {
        self.sink_inputs.push(stream);
        self
    }

    pub fn connection_failure(mut self, message: &str) -> Self {
        self.connection_failure = Some(message.to_string());
        self
    }

    pub fn sink_list_failure(mut self, message: &str) -> Self {
        self.sink_list_failure = Some(message.to_string());
        self
    }

    pub fn sink_input_list_failure(mut self, message: &str) -> Self {
        self.sink_input_list_failure = Some(message.to_string());
        self
    }

    pub fn drain_refused(mut self) -> Self {
        self.drain_refused = true;
        self
    }

    pub fn events_per_poll(mut self, count: usize) -> Self {
        self.events_per_poll = count;
        self
    }

    pub fn build(self) -> MockAudioServer {
        let server = MockAudioServer::new();
        for sink in &self.sinks {
            server.add_sink(sink);
        }
        server.set_mock_default_sink(self.default_sink.as_deref());
        for stream in self.sink_inputs {
            server.add_sink_input(stream);
        }
        server.set_connection_failure(self.connection_failure.as_deref());
        server.set_sink_list_failure(self.sink_list_failure.as_deref());
        server.set_sink_input_list_failure(self.sink_input_list_failure.as_deref());
        server.set_drain_refused(self.drain_refused);
        server.set_events_per_poll(self.events_per_poll);
        server
    }
}

impl Default for MockServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an exclusion set from string slices
pub fn excluded(names: &[&str]) -> ExclusionSet {
    names.iter().copied().collect()
}
