use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Which enumeration reported an error sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Sinks,
    SinkInputs,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKind::Sinks => write!(f, "sink info"),
            ListKind::SinkInputs => write!(f, "sink input info"),
        }
    }
}

/// Fatal rotation failures. Every variant exits with status 1.
#[derive(Error, Debug)]
pub enum RotateError {
    #[error("Connection failure: {0}")]
    Connection(String),

    #[error("failed to get {list}: {message}")]
    Enumeration { list: ListKind, message: String },

    #[error("audio server client error: {0:#}")]
    Client(#[from] anyhow::Error),

    #[error("no answer from the audio server within {0:?}")]
    Timeout(Duration),

    #[error("rotation cancelled")]
    Cancelled,
}

impl RotateError {
    pub fn exit_code(&self) -> i32 {
        1
    }
}
