use anyhow::Result;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::audio::StreamRecord;
use crate::session::{ConnectionSignal, ListEntry, ServerEvent};
use crate::system::traits::{AudioServerInterface, FileSystemInterface};

/// A request the session made against the audio server, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerCall {
    Connect,
    RequestServerInfo,
    RequestSinkList,
    RequestSinkInputList,
    SetDefaultSink(String),
    MoveSinkInput(u32, String),
    Drain,
    Disconnect,
}

/// Mock audio server for testing - answers requests with scripted events
///
/// Responses are queued when a request is made and handed out by
/// `poll_events`, `events_per_poll` at a time, so list results arrive spread
/// over several loop iterations like paginated callbacks do.
#[derive(Clone)]
pub struct MockAudioServer {
    pub sinks: Arc<Mutex<Vec<String>>>,
    pub default_sink: Arc<Mutex<Option<String>>>,
    pub sink_inputs: Arc<Mutex<Vec<StreamRecord>>>,
    pub calls: Arc<Mutex<Vec<ServerCall>>>,
    pub pending_events: Arc<Mutex<VecDeque<ServerEvent>>>,
    pub connect_error: Arc<Mutex<Option<String>>>,
    pub connection_failure: Arc<Mutex<Option<String>>>,
    pub sink_list_failure: Arc<Mutex<Option<String>>>,
    pub sink_input_list_failure: Arc<Mutex<Option<String>>>,
    pub drain_refused: Arc<Mutex<bool>>,
    pub stalled: Arc<Mutex<bool>>,
    pub events_per_poll: Arc<Mutex<usize>>,
}

impl MockAudioServer {
    pub fn new() -> Self {
        Self {
            sinks: Arc::new(Mutex::new(Vec::new())),
            default_sink: Arc::new(Mutex::new(None)),
            sink_inputs: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            pending_events: Arc::new(Mutex::new(VecDeque::new())),
            connect_error: Arc::new(Mutex::new(None)),
            connection_failure: Arc::new(Mutex::new(None)),
            sink_list_failure: Arc::new(Mutex::new(None)),
            sink_input_list_failure: Arc::new(Mutex::new(None)),
            drain_refused: Arc::new(Mutex::new(false)),
            stalled: Arc::new(Mutex::new(false)),
            events_per_poll: Arc::new(Mutex::new(1)),
        }
    }

    /// Add a sink; sinks are listed in the order they were added
    pub fn add_sink(&self, name: &str) {
        self.sinks.lock().unwrap().push(name.to_string());
    }

    /// Set the default sink reported by server info
    pub fn set_mock_default_sink(&self, name: Option<&str>) {
        *self.default_sink.lock().unwrap() = name.map(str::to_string);
    }

    /// Add an active sink input
    pub fn add_sink_input(&self, stream: StreamRecord) {
        self.sink_inputs.lock().unwrap().push(stream);
    }

    /// Queue an unsolicited event, e.g. the server closing the connection
    pub fn push_event(&self, event: ServerEvent) {
        self.pending_events.lock().unwrap().push_back(event);
    }

    /// Get all calls that were made
    pub fn get_calls(&self) -> Vec<ServerCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Clear the call history
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Sink input indices moved, in call order
    pub fn moved_sink_inputs(&self) -> Vec<(u32, String)> {
        self.get_calls()
            .into_iter()
            .filter_map(|call| match call {
                ServerCall::MoveSinkInput(index, sink) => Some((index, sink)),
                _ => None,
            })
            .collect()
    }

    /// Whether any request that changes server state was made
    pub fn has_mutating_calls(&self) -> bool {
        self.get_calls().iter().any(|call| {
            matches!(
                call,
                ServerCall::SetDefaultSink(_) | ServerCall::MoveSinkInput(..)
            )
        })
    }

    /// Configure `connect()` itself to fail
    pub fn set_connect_error(&self, message: Option<&str>) {
        *self.connect_error.lock().unwrap() = message.map(str::to_string);
    }

    /// Configure the connection to report a failed state instead of ready
    pub fn set_connection_failure(&self, message: Option<&str>) {
        *self.connection_failure.lock().unwrap() = message.map(str::to_string);
    }

    /// Configure the sink list to end with an error after its items
    pub fn set_sink_list_failure(&self, message: Option<&str>) {
        *self.sink_list_failure.lock().unwrap() = message.map(str::to_string);
    }

    /// Configure the sink input list to end with an error after its items
    pub fn set_sink_input_list_failure(&self, message: Option<&str>) {
        *self.sink_input_list_failure.lock().unwrap() = message.map(str::to_string);
    }

    /// Configure `drain()` to report that no drain was issued
    pub fn set_drain_refused(&self, refused: bool) {
        *self.drain_refused.lock().unwrap() = refused;
    }

    /// Configure the server to stop answering
    pub fn set_stalled(&self, stalled: bool) {
        *self.stalled.lock().unwrap() = stalled;
    }

    /// Configure how many queued events one poll hands out
    pub fn set_events_per_poll(&self, count: usize) {
        *self.events_per_poll.lock().unwrap() = count.max(1);
    }

    fn record(&self, call: ServerCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn queue_list<T>(
        &self,
        items: Vec<T>,
        failure: Option<String>,
        wrap: impl Fn(ListEntry<T>) -> ServerEvent,
    ) {
        let mut pending = self.pending_events.lock().unwrap();
        for item in items {
            pending.push_back(wrap(ListEntry::Item(item)));
        }
        pending.push_back(wrap(match failure {
            Some(message) => ListEntry::Error(message),
            None => ListEntry::End,
        }));
    }
}

impl AudioServerInterface for MockAudioServer {
    fn connect(&mut self) -> Result<()> {
        self.record(ServerCall::Connect);

        if let Some(message) = self.connect_error.lock().unwrap().clone() {
            return Err(anyhow::anyhow!(message));
        }

        let signal = match self.connection_failure.lock().unwrap().clone() {
            Some(message) => ConnectionSignal::Failed(message),
            None => ConnectionSignal::Ready,
        };
        self.push_event(ServerEvent::Connection(signal));
        Ok(())
    }

    fn request_server_info(&mut self) {
        self.record(ServerCall::RequestServerInfo);
        let default_sink = self.default_sink.lock().unwrap().clone();
        self.push_event(ServerEvent::ServerInfo { default_sink });
    }

    fn request_sink_list(&mut self) {
        self.record(ServerCall::RequestSinkList);
        let sinks = self.sinks.lock().unwrap().clone();
        let failure = self.sink_list_failure.lock().unwrap().clone();
        self.queue_list(sinks, failure, ServerEvent::SinkListed);
    }

    fn request_sink_input_list(&mut self) {
        self.record(ServerCall::RequestSinkInputList);
        let streams = self.sink_inputs.lock().unwrap().clone();
        let failure = self.sink_input_list_failure.lock().unwrap().clone();
        self.queue_list(streams, failure, ServerEvent::SinkInputListed);
    }

    fn set_default_sink(&mut self, name: &str) {
        self.record(ServerCall::SetDefaultSink(name.to_string()));
        *self.default_sink.lock().unwrap() = Some(name.to_string());
    }

    fn move_sink_input(&mut self, index: u32, sink_name: &str) {
        self.record(ServerCall::MoveSinkInput(index, sink_name.to_string()));
    }

    fn drain(&mut self) -> bool {
        self.record(ServerCall::Drain);
        if *self.drain_refused.lock().unwrap() {
            return false;
        }
        self.push_event(ServerEvent::DrainComplete);
        true
    }

    fn disconnect(&mut self) {
        self.record(ServerCall::Disconnect);
        self.push_event(ServerEvent::Connection(ConnectionSignal::Terminated));
    }

    fn poll_events(&mut self) -> Result<Vec<ServerEvent>> {
        if *self.stalled.lock().unwrap() {
            // Don't spin in tests
            std::thread::sleep(Duration::from_millis(10));
            return Ok(Vec::new());
        }

        let batch = *self.events_per_poll.lock().unwrap();
        let mut pending = self.pending_events.lock().unwrap();
        if pending.is_empty() {
            return Err(anyhow::anyhow!("Mock audio server has no pending events"));
        }

        let count = batch.min(pending.len());
        Ok(pending.drain(..count).collect())
    }
}

impl Default for MockAudioServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock file system for testing - provides controllable file operations
#[derive(Clone)]
pub struct MockFileSystem {
    pub files: Arc<Mutex<HashMap<PathBuf, String>>>,
    pub read_calls: Arc<Mutex<Vec<PathBuf>>>,
    pub write_calls: Arc<Mutex<Vec<(PathBuf, String)>>>,
    pub directory_creation_calls: Arc<Mutex<Vec<PathBuf>>>,
    pub should_fail_read: Arc<Mutex<bool>>,
    pub should_fail_write: Arc<Mutex<bool>>,
    pub should_fail_create_dir: Arc<Mutex<bool>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            read_calls: Arc::new(Mutex::new(Vec::new())),
            write_calls: Arc::new(Mutex::new(Vec::new())),
            directory_creation_calls: Arc::new(Mutex::new(Vec::new())),
            should_fail_read: Arc::new(Mutex::new(false)),
            should_fail_write: Arc::new(Mutex::new(false)),
            should_fail_create_dir: Arc::new(Mutex::new(false)),
        }
    }

    /// Add a file to the mock file system
    pub fn add_file<P: AsRef<Path>>(&self, path: P, content: String) {
        self.files
            .lock()
            .unwrap()
            .insert(path.as_ref().to_path_buf(), content);
    }

    /// Get all read calls that were made
    pub fn get_read_calls(&self) -> Vec<PathBuf> {
        self.read_calls.lock().unwrap().clone()
    }

    /// Get all write calls that were made
    pub fn get_write_calls(&self) -> Vec<(PathBuf, String)> {
        self.write_calls.lock().unwrap().clone()
    }

    /// Get all directory creation calls that were made
    pub fn get_directory_creation_calls(&self) -> Vec<PathBuf> {
        self.directory_creation_calls.lock().unwrap().clone()
    }

    /// Configure the mock to fail read operations
    pub fn set_read_failure(&self, should_fail: bool) {
        *self.should_fail_read.lock().unwrap() = should_fail;
    }

    /// Configure the mock to fail write operations
    pub fn set_write_failure(&self, should_fail: bool) {
        *self.should_fail_write.lock().unwrap() = should_fail;
    }

    /// Configure the mock to fail directory creation
    pub fn set_create_dir_failure(&self, should_fail: bool) {
        *self.should_fail_create_dir.lock().unwrap() = should_fail;
    }
}

impl FileSystemInterface for MockFileSystem {
    fn read_config_file(&self, path: &Path) -> Result<String> {
        self.read_calls.lock().unwrap().push(path.to_path_buf());

        if *self.should_fail_read.lock().unwrap() {
            return Err(anyhow::anyhow!("Mock read failure"));
        }

        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("File not found: {}", path.display()))
    }

    fn write_config_file(&self, path: &Path, content: &str) -> Result<()> {
        self.write_calls
            .lock()
            .unwrap()
            .push((path.to_path_buf(), content.to_string()));

        if *self.should_fail_write.lock().unwrap() {
            return Err(anyhow::anyhow!("Mock write failure"));
        }

        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn config_file_exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn create_config_dir(&self, path: &Path) -> Result<()> {
        self.directory_creation_calls
            .lock()
            .unwrap()
            .push(path.to_path_buf());

        if *self.should_fail_create_dir.lock().unwrap() {
            return Err(anyhow::anyhow!("Mock create directory failure"));
        }

        Ok(())
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}
