use crate::audio::StreamRecord;

/// Connection state changes reported by the client library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionSignal {
    Ready,
    Failed(String),
    Terminated,
}

/// One callback invocation of a paginated list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry<T> {
    Item(T),
    End,
    Error(String),
}

/// Everything the audio server can hand back to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    Connection(ConnectionSignal),
    ServerInfo { default_sink: Option<String> },
    SinkListed(ListEntry<String>),
    SinkInputListed(ListEntry<StreamRecord>),
    DrainComplete,
}
