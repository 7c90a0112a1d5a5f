use anyhow::{Context as _, Result, anyhow, bail};
use libpulse_binding::callbacks::ListResult;
use libpulse_binding::context::{Context, FlagSet as ContextFlagSet, State as ContextState};
use libpulse_binding::mainloop::standard::{IterateResult, Mainloop};
use libpulse_binding::proplist::{Proplist, properties};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use tracing::{debug, info, trace, warn};

use crate::audio::StreamRecord;
use crate::session::{ConnectionSignal, ListEntry, ServerEvent};
use crate::system::traits::AudioServerInterface;

const APPLICATION_NAME: &str = "sink-rotator";

type EventQueue = Rc<RefCell<VecDeque<ServerEvent>>>;

/// Production implementation of AudioServerInterface using libpulse's standard mainloop
///
/// Callbacks only translate libpulse results into [`ServerEvent`]s and queue
/// them; all decisions happen in the session after `poll_events` returns.
pub struct PulseAudioServer {
    // Declared before the mainloop so it is released first.
    context: Rc<RefCell<Context>>,
    events: EventQueue,
    mainloop: Mainloop,
    server: Option<String>,
}

impl PulseAudioServer {
    pub fn new(server: Option<String>) -> Result<Self> {
        let mut proplist = Proplist::new().context("Failed to create property list")?;
        proplist
            .set_str(properties::APPLICATION_NAME, APPLICATION_NAME)
            .map_err(|_| anyhow!("Failed to set application name"))?;

        let mainloop = Mainloop::new().context("pa_mainloop_new() failed")?;
        let context = Context::new_with_proplist(&mainloop, APPLICATION_NAME, &proplist)
            .context("pa_context_new() failed")?;

        Ok(Self {
            context: Rc::new(RefCell::new(context)),
            events: Rc::new(RefCell::new(VecDeque::new())),
            mainloop,
            server,
        })
    }

    fn weak_context(&self) -> Weak<RefCell<Context>> {
        Rc::downgrade(&self.context)
    }
}

/// Text for the context's last error, if the context can be looked at right now
fn last_error(context: &Weak<RefCell<Context>>) -> String {
    let Some(context) = context.upgrade() else {
        return "context released".to_string();
    };
    let message = match context.try_borrow() {
        Ok(context) => format!("{}", context.errno()),
        Err(_) => "unknown error".to_string(),
    };
    message
}

impl AudioServerInterface for PulseAudioServer {
    fn connect(&mut self) -> Result<()> {
        info!(
            "Connecting to {}",
            self.server.as_deref().unwrap_or("the default PulseAudio server")
        );

        self.context
            .borrow_mut()
            .connect(self.server.as_deref(), ContextFlagSet::NOFLAGS, None)
            .map_err(|e| anyhow!("pa_context_connect() failed: {}", e))?;

        let events = Rc::clone(&self.events);
        let weak = self.weak_context();
        self.context
            .borrow_mut()
            .set_state_callback(Some(Box::new(move || {
                let Some(context) = weak.upgrade() else {
                    return;
                };
                // Already borrowed means we are inside our own disconnect(),
                // which queues the terminated signal itself.
                let Ok(context) = context.try_borrow() else {
                    return;
                };

                let signal = match context.get_state() {
                    ContextState::Ready => ConnectionSignal::Ready,
                    ContextState::Failed => ConnectionSignal::Failed(format!("{}", context.errno())),
                    ContextState::Terminated => ConnectionSignal::Terminated,
                    state => {
                        trace!("Context state: {:?}", state);
                        return;
                    }
                };
                events
                    .borrow_mut()
                    .push_back(ServerEvent::Connection(signal));
            })));

        Ok(())
    }

    fn request_server_info(&mut self) {
        let events = Rc::clone(&self.events);
        let introspector = self.context.borrow().introspect();
        introspector.get_server_info(move |info| {
            let default_sink = info.default_sink_name.as_ref().map(|name| name.to_string());
            events
                .borrow_mut()
                .push_back(ServerEvent::ServerInfo { default_sink });
        });
    }

    fn request_sink_list(&mut self) {
        let events = Rc::clone(&self.events);
        let weak = self.weak_context();
        let introspector = self.context.borrow().introspect();
        introspector.get_sink_info_list(move |result| {
            let entry = match result {
                ListResult::Item(info) => match info.name.as_ref() {
                    Some(name) => ListEntry::Item(name.to_string()),
                    None => {
                        warn!("Skipping sink {} without a name", info.index);
                        return;
                    }
                },
                ListResult::End => ListEntry::End,
                ListResult::Error => ListEntry::Error(last_error(&weak)),
            };
            events.borrow_mut().push_back(ServerEvent::SinkListed(entry));
        });
    }

    fn request_sink_input_list(&mut self) {
        let events = Rc::clone(&self.events);
        let weak = self.weak_context();
        let introspector = self.context.borrow().introspect();
        introspector.get_sink_input_info_list(move |result| {
            let entry = match result {
                ListResult::Item(info) => ListEntry::Item(StreamRecord {
                    index: info.index,
                    name: info.name.as_ref().map(|name| name.to_string()),
                }),
                ListResult::End => ListEntry::End,
                ListResult::Error => ListEntry::Error(last_error(&weak)),
            };
            events
                .borrow_mut()
                .push_back(ServerEvent::SinkInputListed(entry));
        });
    }

    fn set_default_sink(&mut self, name: &str) {
        let sink = name.to_string();
        self.context
            .borrow_mut()
            .set_default_sink(name, move |success| {
                if !success {
                    warn!("Server rejected {} as default sink", sink);
                }
            });
    }

    fn move_sink_input(&mut self, index: u32, sink_name: &str) {
        let sink = sink_name.to_string();
        let mut introspector = self.context.borrow().introspect();
        introspector.move_sink_input_by_name(
            index,
            sink_name,
            Some(Box::new(move |success| {
                if !success {
                    warn!("Failed to move sink input {} to {}", index, sink);
                }
            })),
        );
    }

    fn drain(&mut self) -> bool {
        let events = Rc::clone(&self.events);
        let operation = self.context.borrow_mut().drain(move || {
            events.borrow_mut().push_back(ServerEvent::DrainComplete);
        });
        operation.is_some()
    }

    fn disconnect(&mut self) {
        debug!("Disconnecting from PulseAudio");
        self.context.borrow_mut().disconnect();
        self.events
            .borrow_mut()
            .push_back(ServerEvent::Connection(ConnectionSignal::Terminated));
    }

    fn poll_events(&mut self) -> Result<Vec<ServerEvent>> {
        loop {
            {
                let mut events = self.events.borrow_mut();
                if !events.is_empty() {
                    return Ok(events.drain(..).collect());
                }
            }

            match self.mainloop.iterate(true) {
                IterateResult::Success(_) => {}
                IterateResult::Quit(retval) => bail!("pa_mainloop quit with {}", retval.0),
                IterateResult::Err(e) => bail!("pa_mainloop_iterate() failed: {}", e),
            }
        }
    }
}

impl Drop for PulseAudioServer {
    fn drop(&mut self) {
        if let Ok(mut context) = self.context.try_borrow_mut() {
            context.set_state_callback(None);
            if context.get_state().is_good() {
                context.disconnect();
            }
        }
    }
}
