use anyhow::Result;
use std::path::Path;

use crate::session::ServerEvent;

/// Trait for audio server operations - abstracts the PulseAudio client for testability
///
/// Every request is non-blocking. Results arrive later as [`ServerEvent`]s
/// returned from [`poll_events`](AudioServerInterface::poll_events), in the
/// order the server produced them.
pub trait AudioServerInterface {
    /// Start connecting. Completion is reported as a `Connection` event.
    fn connect(&mut self) -> Result<()>;

    /// Ask for server info; answered with a `ServerInfo` event
    fn request_server_info(&mut self);

    /// Enumerate sinks; answered with one `SinkListed` event per sink, then End or Error
    fn request_sink_list(&mut self);

    /// Enumerate sink inputs; answered with one `SinkInputListed` event per stream, then End or Error
    fn request_sink_input_list(&mut self);

    /// Make `name` the default sink. Fire-and-forget.
    fn set_default_sink(&mut self, name: &str);

    /// Move one sink input to `sink_name`. Fire-and-forget.
    fn move_sink_input(&mut self, index: u32, sink_name: &str);

    /// Flush pending requests. Returns `false` if the drain could not be issued,
    /// otherwise a `DrainComplete` event follows.
    fn drain(&mut self) -> bool;

    /// Close the connection; a `Connection(Terminated)` event follows.
    fn disconnect(&mut self);

    /// Run the event loop until callbacks have produced something, and hand it over
    fn poll_events(&mut self) -> Result<Vec<ServerEvent>>;
}

/// Trait for file system operations - abstracts std::fs for testability
pub trait FileSystemInterface {
    /// Read the entire contents of a configuration file
    fn read_config_file(&self, path: &Path) -> Result<String>;

    /// Write configuration content to a file
    fn write_config_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Check if a configuration file exists
    fn config_file_exists(&self, path: &Path) -> bool;

    /// Create the directory structure for config files
    fn create_config_dir(&self, path: &Path) -> Result<()>;
}
