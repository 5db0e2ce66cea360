//! Viewer service - runs the controller on a worker thread

use std::collections::HashSet;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use flume::{Receiver, RecvTimeoutError, Sender};
use log::{debug, warn};

use crate::backend::DocumentBackend;
use crate::notification::Notifier;

use super::controller::{ViewerController, ViewerSnapshot, ensure_pdf, report};
use super::request::{RequestId, ViewerRequest, ViewerResponse};
use super::session::PageStep;
use super::source::SourceFile;
use super::worker::viewer_worker;
use super::zoom::ZoomStep;

/// Front end of the viewer used by the UI thread.
///
/// Requests are queued to a single worker that owns the backend. The service
/// keeps the newest snapshot it has seen and never regresses to an older
/// generation.
pub struct ViewerService {
    request_tx: Sender<ViewerRequest>,
    response_rx: Receiver<ViewerResponse>,
    next_request_id: u64,
    pending: HashSet<RequestId>,
    snapshot: ViewerSnapshot,
    worker: Option<JoinHandle<()>>,
}

impl ViewerService {
    /// Spawn the worker. `make_backend` runs on the worker thread, so the
    /// backend itself need not be `Send`.
    pub fn spawn<F, B>(make_backend: F) -> Self
    where
        F: FnOnce() -> B + Send + 'static,
        B: DocumentBackend + 'static,
    {
        let (request_tx, request_rx) = flume::unbounded();
        let (response_tx, response_rx) = flume::unbounded();

        let worker = std::thread::Builder::new()
            .name("viewer-worker".into())
            .spawn(move || {
                let controller = ViewerController::new(make_backend());
                viewer_worker(controller, request_rx, response_tx);
            })
            .map_err(|e| warn!("Failed to spawn viewer worker: {e}"))
            .ok();

        Self {
            request_tx,
            response_rx,
            next_request_id: 1,
            pending: HashSet::new(),
            snapshot: ViewerSnapshot::default(),
            worker,
        }
    }

    /// Queue a document load. A source not declared as PDF is reported right
    /// away and never queued, so it cannot supersede pending work.
    pub fn load(&mut self, source: SourceFile, notifier: &mut dyn Notifier) -> Option<RequestId> {
        if let Err(e) = ensure_pdf(&source) {
            report(e, notifier);
            return None;
        }
        let id = self.next_id();
        debug!("Queueing load of {} as {id:?}", source.name());
        Some(self.send(id, ViewerRequest::Load { id, source }))
    }

    pub fn step_page(&mut self, step: PageStep) -> RequestId {
        let id = self.next_id();
        self.send(id, ViewerRequest::StepPage { id, step })
    }

    pub fn step_zoom(&mut self, step: ZoomStep) -> RequestId {
        let id = self.next_id();
        self.send(id, ViewerRequest::StepZoom { id, step })
    }

    /// Newest session state received from the worker
    pub fn snapshot(&self) -> &ViewerSnapshot {
        &self.snapshot
    }

    /// True while requests are in flight
    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drain worker responses without blocking; returns true if anything
    /// visible changed
    pub fn poll(&mut self, notifier: &mut dyn Notifier) -> bool {
        let mut changed = false;
        while let Ok(response) = self.response_rx.try_recv() {
            changed |= self.handle(response, notifier);
        }
        changed
    }

    /// Block until every pending request is answered or `timeout` elapses.
    /// Returns true if the worker went idle.
    pub fn settle(&mut self, notifier: &mut dyn Notifier, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_busy() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.response_rx.recv_timeout(remaining) {
                Ok(response) => {
                    self.handle(response, notifier);
                }
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("Viewer worker disconnected with requests in flight");
                    self.pending.clear();
                    return false;
                }
            }
        }
        self.poll(notifier);
        true
    }

    fn handle(&mut self, response: ViewerResponse, notifier: &mut dyn Notifier) -> bool {
        match response {
            ViewerResponse::Notice(notice) => {
                notifier.notify(notice.message, notice.level);
                true
            }
            ViewerResponse::Snapshot(snapshot) => {
                if snapshot.generation < self.snapshot.generation {
                    debug!(
                        "Dropping stale snapshot {} (showing {})",
                        snapshot.generation, self.snapshot.generation
                    );
                    return false;
                }
                self.snapshot = snapshot;
                true
            }
            ViewerResponse::Completed(id) | ViewerResponse::Superseded(id) => {
                self.pending.remove(&id);
                self.pending.is_empty()
            }
        }
    }

    fn send(&mut self, id: RequestId, request: ViewerRequest) -> RequestId {
        if self.request_tx.send(request).is_ok() {
            self.pending.insert(id);
        } else {
            warn!("Viewer worker is gone; dropping request {id:?}");
        }
        id
    }

    fn next_id(&mut self) -> RequestId {
        let id = RequestId::new(self.next_request_id);
        self.next_request_id += 1;
        id
    }
}

impl Drop for ViewerService {
    fn drop(&mut self) {
        let _ = self.request_tx.send(ViewerRequest::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
