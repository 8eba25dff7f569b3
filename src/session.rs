use std::io;
use std::thread::{self, JoinHandle};
use std::time::SystemTime;

use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, error, info};

use crate::error::ValidationError;
use crate::history::History;
use crate::http::Dispatcher;
use crate::request::RequestForm;
use crate::types::{EntryId, HistoryEntry, Request, Response};

/// Result of a send trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The request was handed to a background thread.
    Started,
    /// A request is already in flight; the trigger was dropped.
    Ignored,
    /// The request could not be started. A Failure entry was recorded
    /// straight away, so there is nothing to poll for.
    Recorded(EntryId),
}

struct Completion {
    request: Request,
    response: Response,
}

struct InFlight {
    request: Request,
    sent_at: SystemTime,
    worker: Option<JoinHandle<()>>,
}

/// Each accepted send runs on its own thread and hands the result back
/// through a bounded channel drained by [`Session::poll`].
pub struct Session {
    dispatcher: Dispatcher,
    history: History,
    in_flight: Option<InFlight>,
    last_response: Option<Response>,
    results_tx: mpsc::Sender<Completion>,
    results_rx: mpsc::Receiver<Completion>,
    next_id: u64,
}

impl Session {
    pub fn new(dispatcher: Dispatcher) -> Self {
        let (results_tx, results_rx) = mpsc::channel(1);
        Self {
            dispatcher,
            history: History::new(),
            in_flight: None,
            last_response: None,
            results_tx,
            results_rx,
            next_id: 1,
        }
    }

    /// Validates the form and starts a background send.
    ///
    /// Triggers that arrive while a request is in flight are ignored before
    /// the form is even looked at. A validation error leaves the session idle
    /// and history untouched.
    pub fn send(&mut self, form: &RequestForm) -> Result<SendOutcome, ValidationError> {
        if self.in_flight.is_some() {
            debug!("send ignored: a request is already in flight");
            return Ok(SendOutcome::Ignored);
        }

        let request = form.build()?;
        info!(method = %request.method(), url = request.url(), "sending request");

        let dispatcher = self.dispatcher.clone();
        let tx = self.results_tx.clone();
        let job = request.clone();
        let sent_at = SystemTime::now();

        let spawned = thread::Builder::new()
            .name("dispatch".to_string())
            .spawn(move || {
                let response = dispatcher.dispatch(&job);
                // The receiver lives as long as the session; a closed channel
                // means the window is gone and the result has nowhere to go.
                let _ = tx.blocking_send(Completion {
                    request: job,
                    response,
                });
            });

        match spawned {
            Ok(worker) => {
                self.last_response = None;
                self.in_flight = Some(InFlight {
                    request,
                    sent_at,
                    worker: Some(worker),
                });
            }
            Err(err) => return Ok(self.spawn_failed(request, err, sent_at)),
        }
        Ok(SendOutcome::Started)
    }

    fn spawn_failed(
        &mut self,
        request: Request,
        err: io::Error,
        sent_at: SystemTime,
    ) -> SendOutcome {
        error!("failed to spawn dispatch thread: {}", err);
        let response = Response::Failure {
            message: format!("Could not start request: {}", err),
            elapsed_ms: 0.0,
        };
        SendOutcome::Recorded(self.record(request, response, sent_at))
    }

    /// Applies a finished request, if there is one.
    ///
    /// Call this from the interactive thread on every tick. Returns the id of
    /// the new history entry when a request completed.
    pub fn poll(&mut self) -> Option<EntryId> {
        let in_flight = self.in_flight.as_ref()?;

        let completion = match self.results_rx.try_recv() {
            Ok(completion) => completion,
            Err(TryRecvError::Empty) => {
                let finished = in_flight.worker.as_ref().is_some_and(|w| w.is_finished());
                if !finished {
                    return None;
                }
                // The worker may have posted between `try_recv` and
                // `is_finished`; look once more before declaring it lost.
                match self.results_rx.try_recv() {
                    Ok(completion) => completion,
                    Err(_) => {
                        error!("dispatch thread exited without a result");
                        Completion {
                            request: in_flight.request.clone(),
                            response: Response::Failure {
                                message: "Request worker stopped unexpectedly".to_string(),
                                elapsed_ms: 0.0,
                            },
                        }
                    }
                }
            }
            // The session holds a sender, so the channel never closes.
            Err(TryRecvError::Disconnected) => return None,
        };

        let in_flight = self.in_flight.take()?;
        if let Some(worker) = in_flight.worker {
            let _ = worker.join();
        }
        Some(self.record(completion.request, completion.response, in_flight.sent_at))
    }

    fn record(&mut self, request: Request, response: Response, sent_at: SystemTime) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        debug!(%id, status = ?response.status_code(), "recording history entry");
        self.last_response = Some(response.clone());
        self.history.append(HistoryEntry::new(id, request, response, sent_at));
        id
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The request currently in flight.
    pub fn pending_request(&self) -> Option<&Request> {
        self.in_flight.as_ref().map(|f| &f.request)
    }

    /// The most recent completed response, cleared when a new send starts.
    pub fn last_response(&self) -> Option<&Response> {
        self.last_response.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Form contents for a history entry. Refused while a request is in flight.
    pub fn reload(&self, id: EntryId) -> Option<RequestForm> {
        if self.is_sending() {
            debug!(%id, "reload refused while sending");
            return None;
        }
        self.history
            .get(id)
            .map(|entry| RequestForm::from_request(entry.request()))
    }

    pub fn remove(&mut self, id: EntryId) -> Option<HistoryEntry> {
        let removed = self.history.remove(id);
        if removed.is_some() {
            info!(%id, "removed history entry");
        }
        removed
    }

    pub fn clear_history(&mut self) {
        info!(entries = self.history.len(), "clearing history");
        self.history.clear();
    }
}
