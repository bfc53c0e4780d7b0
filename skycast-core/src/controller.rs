//! Front-end state machine.
//!
//! The controller owns the application state. Lookups run on a tokio task and
//! report back over a channel; the result is applied only when the owner calls
//! [`Controller::poll`] or [`Controller::settle`], so state is never touched
//! from the worker.

use std::sync::Arc;

use serde::Serialize;
use tokio::{runtime::Handle, sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    error::WeatherError,
    lookup::WeatherService,
    model::{PlaceQuery, WeatherSnapshot},
};

/// A message for the user, shaped like a message box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl From<&WeatherError> for Notice {
    fn from(err: &WeatherError) -> Self {
        Self {
            title: err.title().to_string(),
            message: err.user_message(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppState {
    pub snapshot: Option<WeatherSnapshot>,
    pub notice: Option<Notice>,
    /// False while a lookup is in flight.
    pub search_enabled: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            snapshot: None,
            notice: None,
            search_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Started,
    /// Another lookup is still running; the request was ignored.
    Busy,
    /// Input was empty or no runtime can run the lookup; a notice was set.
    Rejected,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupEvent {
    Updated,
    Failed(Notice),
}

struct Completion {
    id: u64,
    result: Result<WeatherSnapshot, WeatherError>,
}

struct InFlight {
    id: u64,
    query: PlaceQuery,
    handle: JoinHandle<()>,
}

pub struct Controller {
    service: Arc<WeatherService>,
    runtime: Option<Handle>,
    state: AppState,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: Option<InFlight>,
    next_id: u64,
}

impl Controller {
    /// Lookups run on the runtime current at construction, if any.
    pub fn new(service: WeatherService) -> Self {
        Self::build(service, Handle::try_current().ok())
    }

    /// Lookups run on `runtime`, wherever the controller is driven from.
    pub fn with_runtime(service: WeatherService, runtime: Handle) -> Self {
        Self::build(service, Some(runtime))
    }

    fn build(service: WeatherService, runtime: Option<Handle>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            service: Arc::new(service),
            runtime,
            state: AppState::default(),
            tx,
            rx,
            in_flight: None,
            next_id: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Place currently being looked up, if any.
    pub fn pending_query(&self) -> Option<&PlaceQuery> {
        self.in_flight.as_ref().map(|f| &f.query)
    }

    /// Start a lookup for `input`.
    pub fn submit(&mut self, input: &str) -> SubmitOutcome {
        if self.in_flight.is_some() {
            debug!(input, "lookup already in flight, ignoring submit");
            return SubmitOutcome::Busy;
        }

        let query = match PlaceQuery::parse(input) {
            Ok(q) => q,
            Err(err) => {
                self.state.notice = Some(Notice::from(&err));
                return SubmitOutcome::Rejected;
            }
        };

        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            warn!(%query, "no tokio runtime to run the lookup on");
            self.state.notice = Some(Notice {
                title: "Error".to_string(),
                message: "The lookup could not be started.".to_string(),
            });
            return SubmitOutcome::Rejected;
        };

        self.next_id += 1;
        let id = self.next_id;
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        let task_query = query.clone();

        let handle = runtime.spawn(async move {
            let result = service.lookup(&task_query).await;
            // The receiver lives as long as the controller.
            let _ = tx.send(Completion { id, result });
        });

        debug!(id, %query, "lookup started");
        self.state.search_enabled = false;
        self.state.notice = None;
        self.in_flight = Some(InFlight { id, query, handle });
        SubmitOutcome::Started
    }

    /// Apply a finished lookup, if there is one, without waiting.
    pub fn poll(&mut self) -> Option<LookupEvent> {
        let finished = self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.handle.is_finished());
        let current = self.in_flight.as_ref().map(|f| f.id);

        while let Ok(done) = self.rx.try_recv() {
            if Some(done.id) == current {
                return Some(self.complete(done.result));
            }
            debug!(id = done.id, "dropping result of cancelled lookup");
        }

        if finished {
            // The task ended without reporting back, which only a panic does.
            let notice = Notice {
                title: "Error".to_string(),
                message: "The lookup stopped unexpectedly.".to_string(),
            };
            self.finish();
            self.state.notice = Some(notice.clone());
            return Some(LookupEvent::Failed(notice));
        }

        None
    }

    /// Wait for the in-flight lookup and apply it.
    pub async fn settle(&mut self) -> Option<LookupEvent> {
        let flight = self.in_flight.as_mut()?;
        // A join error means the task panicked or was aborted; `poll` handles both.
        let _ = (&mut flight.handle).await;
        self.poll()
    }

    /// Abort the in-flight lookup and re-enable search. Displayed data is kept.
    pub fn cancel(&mut self) -> bool {
        match self.in_flight.take() {
            Some(flight) => {
                flight.handle.abort();
                debug!(id = flight.id, "lookup cancelled");
                self.state.search_enabled = true;
                true
            }
            None => false,
        }
    }

    fn complete(&mut self, result: Result<WeatherSnapshot, WeatherError>) -> LookupEvent {
        self.finish();
        match result {
            Ok(snapshot) => {
                self.state.snapshot = Some(snapshot);
                self.state.notice = None;
                LookupEvent::Updated
            }
            Err(err) => {
                let notice = Notice::from(&err);
                self.state.notice = Some(notice.clone());
                LookupEvent::Failed(notice)
            }
        }
    }

    fn finish(&mut self) {
        self.in_flight = None;
        self.state.search_enabled = true;
    }
}
