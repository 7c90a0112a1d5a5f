use anyhow::anyhow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::rotation::ExclusionSet;
use crate::session::{RotateError, Session, SessionOutcome};
use crate::system::AudioServerInterface;

/// Drives one [`Session`] against an audio server until it reaches an outcome
pub struct SinkRotator<A: AudioServerInterface> {
    audio_server: A,
    exclusions: ExclusionSet,
    cancel: Arc<AtomicBool>,
}

impl<A: AudioServerInterface> SinkRotator<A> {
    pub fn new(audio_server: A, exclusions: ExclusionSet) -> Self {
        Self {
            audio_server,
            exclusions,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a flag that stops the loop between two polls once set
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Connect and pump server events into the session until it is finished
    pub fn run(&mut self) -> Result<SessionOutcome, RotateError> {
        info!(
            "Starting sink rotation ({} excluded sink(s))",
            self.exclusions.len()
        );

        let mut session = Session::new(self.exclusions.clone());
        self.audio_server.connect()?;

        while !session.is_finished() {
            if self.cancel.load(Ordering::Relaxed) {
                debug!("Rotation cancelled in {:?}", session.phase());
                return Err(RotateError::Cancelled);
            }

            for event in self.audio_server.poll_events()? {
                session.handle(event, &mut self.audio_server);
                if session.is_finished() {
                    break;
                }
            }
        }

        match session.into_outcome() {
            Some(result) => result,
            None => Err(RotateError::Cancelled),
        }
    }

    /// Get reference to the audio server (for testing)
    pub fn audio_server(&self) -> &A {
        &self.audio_server
    }
}

/// Run one rotation on a blocking thread, giving up after `timeout`
///
/// The audio server is built inside the blocking thread by `factory`, so it
/// does not need to be `Send`. `None` waits indefinitely.
pub async fn rotate_with_watchdog<A, F>(
    factory: F,
    exclusions: ExclusionSet,
    timeout: Option<Duration>,
) -> Result<SessionOutcome, RotateError>
where
    A: AudioServerInterface,
    F: FnOnce() -> anyhow::Result<A> + Send + 'static,
{
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);

    let task = tokio::task::spawn_blocking(move || -> Result<SessionOutcome, RotateError> {
        let audio_server = factory()?;
        SinkRotator::new(audio_server, exclusions)
            .with_cancel_flag(flag)
            .run()
    });

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, task).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!("Audio server did not finish within {:?}", limit);
                cancel.store(true, Ordering::Relaxed);
                return Err(RotateError::Timeout(limit));
            }
        },
        None => task.await,
    };

    joined.map_err(|e| RotateError::Client(anyhow!("rotation task failed: {}", e)))?
}
