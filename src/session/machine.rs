use std::fmt;
use tracing::{debug, info, warn};

use crate::audio::{DeviceRecord, DeviceRegistry, StreamMigrator, StreamRecord};
use crate::rotation::{ExclusionSet, NoTargetReason, no_target_reason, select_next};
use crate::system::AudioServerInterface;

use super::error::{ListKind, RotateError};
use super::events::{ConnectionSignal, ListEntry, ServerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Ready,
    Failed,
    Terminated,
}

/// Where the rotation currently stands. Each phase waits for one kind of event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connecting,
    QueryingServer,
    EnumeratingDevices,
    Selecting,
    MutatingDefault,
    EnumeratingStreams,
    Draining,
    Disconnecting,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationReport {
    pub from: String,
    pub to: String,
    pub streams_relocated: usize,
}

/// How a session ended when nothing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The server closed the connection, normally after a completed rotation.
    Terminated { rotation: Option<RotationReport> },
    /// There was no sink to rotate to; no mutating request was sent.
    NoTarget(NoTargetReason),
}

impl SessionOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            SessionOutcome::Terminated { .. } => 0,
            SessionOutcome::NoTarget(_) => 1,
        }
    }
}

impl fmt::Display for RotationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({} stream(s) moved)",
            self.from, self.to, self.streams_relocated
        )
    }
}

/// One rotation, driven entirely by server events.
///
/// The session never blocks. [`handle`](Session::handle) applies a single event
/// and issues whatever request the next phase needs on the server handle.
/// Only a list's `End` entry moves the session past an enumeration phase.
pub struct Session {
    exclusions: ExclusionSet,
    connection: ConnectionState,
    phase: Phase,
    default_at_start: Option<String>,
    registry: DeviceRegistry,
    selected_target: Option<DeviceRecord>,
    migrator: Option<StreamMigrator>,
    outcome: Option<Result<SessionOutcome, RotateError>>,
}

impl Session {
    pub fn new(exclusions: ExclusionSet) -> Self {
        Self {
            exclusions,
            connection: ConnectionState::Connecting,
            phase: Phase::Connecting,
            default_at_start: None,
            registry: DeviceRegistry::new(),
            selected_target: None,
            migrator: None,
            outcome: None,
        }
    }

    pub fn handle<A: AudioServerInterface + ?Sized>(&mut self, event: ServerEvent, server: &mut A) {
        if self.outcome.is_some() {
            debug!("Session already finished, ignoring {:?}", event);
            return;
        }

        match event {
            ServerEvent::Connection(signal) => self.on_connection(signal, server),
            ServerEvent::ServerInfo { default_sink } => self.on_server_info(default_sink, server),
            ServerEvent::SinkListed(entry) => self.on_sink(entry, server),
            ServerEvent::SinkInputListed(entry) => self.on_sink_input(entry, server),
            ServerEvent::DrainComplete => self.on_drain_complete(server),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&Result<SessionOutcome, RotateError>> {
        self.outcome.as_ref()
    }

    pub fn into_outcome(self) -> Option<Result<SessionOutcome, RotateError>> {
        self.outcome
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection
    }

    pub fn default_at_start(&self) -> Option<&str> {
        self.default_at_start.as_deref()
    }

    pub fn selected_target(&self) -> Option<&DeviceRecord> {
        self.selected_target.as_ref()
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    fn on_connection<A: AudioServerInterface + ?Sized>(
        &mut self,
        signal: ConnectionSignal,
        server: &mut A,
    ) {
        match signal {
            ConnectionSignal::Ready => {
                if self.phase != Phase::Connecting {
                    debug!("Ignoring repeated ready signal in {:?}", self.phase);
                    return;
                }
                debug!("Connection ready, querying server info");
                self.connection = ConnectionState::Ready;
                self.phase = Phase::QueryingServer;
                server.request_server_info();
            }
            ConnectionSignal::Failed(message) => {
                self.connection = ConnectionState::Failed;
                self.finish(Err(RotateError::Connection(message)));
            }
            ConnectionSignal::Terminated => {
                self.connection = ConnectionState::Terminated;
                if self.phase != Phase::Disconnecting {
                    warn!("Connection closed by the server during {:?}", self.phase);
                }
                let rotation = self.report();
                if let Some(ref report) = rotation {
                    info!("Rotated sink: {}", report);
                }
                self.finish(Ok(SessionOutcome::Terminated { rotation }));
            }
        }
    }

    fn on_server_info<A: AudioServerInterface + ?Sized>(
        &mut self,
        default_sink: Option<String>,
        server: &mut A,
    ) {
        if self.phase != Phase::QueryingServer {
            debug!("Ignoring server info in {:?}", self.phase);
            return;
        }

        let default_sink = default_sink.unwrap_or_else(|| {
            warn!("Server reported no default sink");
            String::new()
        });
        debug!("Default sink at start: '{}'", default_sink);
        self.default_at_start = Some(default_sink);

        self.phase = Phase::EnumeratingDevices;
        server.request_sink_list();
    }

    fn on_sink<A: AudioServerInterface + ?Sized>(&mut self, entry: ListEntry<String>, server: &mut A) {
        if self.phase != Phase::EnumeratingDevices {
            debug!("Ignoring sink entry {:?} in {:?}", entry, self.phase);
            return;
        }

        match entry {
            ListEntry::Item(name) => {
                self.registry.push(name);
            }
            ListEntry::End => self.select_and_switch(server),
            ListEntry::Error(message) => {
                self.connection = ConnectionState::Failed;
                self.finish(Err(RotateError::Enumeration {
                    list: ListKind::Sinks,
                    message,
                }));
            }
        }
    }

    fn select_and_switch<A: AudioServerInterface + ?Sized>(&mut self, server: &mut A) {
        self.phase = Phase::Selecting;
        debug!("Sink enumeration complete: {:?}", self.registry.names());

        let current = self.default_at_start.as_deref().unwrap_or_default();
        let target = match select_next(&self.registry, current, &self.exclusions) {
            Some(target) => target,
            None => {
                let reason = no_target_reason(&self.registry);
                info!("Nothing to rotate to: {}", reason);
                self.finish(Ok(SessionOutcome::NoTarget(reason)));
                return;
            }
        };

        self.phase = Phase::MutatingDefault;
        info!("Setting default sink to {}", target.name);
        server.set_default_sink(&target.name);

        self.phase = Phase::EnumeratingStreams;
        self.migrator = Some(StreamMigrator::new(target.name.clone()));
        self.selected_target = Some(target);
        server.request_sink_input_list();
    }

    fn on_sink_input<A: AudioServerInterface + ?Sized>(
        &mut self,
        entry: ListEntry<StreamRecord>,
        server: &mut A,
    ) {
        if self.phase != Phase::EnumeratingStreams {
            debug!("Ignoring sink input entry {:?} in {:?}", entry, self.phase);
            return;
        }

        match entry {
            ListEntry::Item(stream) => {
                if let Some(migrator) = self.migrator.as_mut() {
                    migrator.relocate(&stream, server);
                }
            }
            ListEntry::End => self.begin_drain(server),
            ListEntry::Error(message) => {
                self.connection = ConnectionState::Failed;
                self.finish(Err(RotateError::Enumeration {
                    list: ListKind::SinkInputs,
                    message,
                }));
            }
        }
    }

    fn begin_drain<A: AudioServerInterface + ?Sized>(&mut self, server: &mut A) {
        if server.drain() {
            debug!("Draining connection");
            self.phase = Phase::Draining;
        } else {
            debug!("Nothing to drain, disconnecting");
            self.request_disconnect(server);
        }
    }

    fn on_drain_complete<A: AudioServerInterface + ?Sized>(&mut self, server: &mut A) {
        if self.phase != Phase::Draining {
            debug!("Ignoring drain completion in {:?}", self.phase);
            return;
        }
        self.request_disconnect(server);
    }

    fn request_disconnect<A: AudioServerInterface + ?Sized>(&mut self, server: &mut A) {
        self.phase = Phase::Disconnecting;
        server.disconnect();
    }

    fn report(&self) -> Option<RotationReport> {
        let target = self.selected_target.as_ref()?;
        Some(RotationReport {
            from: self.default_at_start.clone().unwrap_or_default(),
            to: target.name.clone(),
            streams_relocated: self
                .migrator
                .as_ref()
                .map_or(0, StreamMigrator::relocated_count),
        })
    }

    fn finish(&mut self, result: Result<SessionOutcome, RotateError>) {
        if let Err(ref e) = result {
            debug!("Session aborted in {:?}: {}", self.phase, e);
        }
        self.phase = Phase::Finished;
        self.outcome = Some(result);
    }
}
