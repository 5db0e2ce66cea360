//! Viewer worker thread

use std::collections::VecDeque;

use flume::{Receiver, Sender};
use log::debug;

use crate::backend::DocumentBackend;
use crate::notification::Notice;

use super::controller::ViewerController;
use super::request::{ViewerRequest, ViewerResponse};

/// Main worker function - runs in a dedicated thread.
///
/// Each wakeup drains every pending request. If a PDF load is among them,
/// all requests queued before the last such load are skipped: the load resets
/// the session, so only the newest one may touch it.
pub fn viewer_worker<B: DocumentBackend>(
    mut controller: ViewerController<B>,
    requests: Receiver<ViewerRequest>,
    responses: Sender<ViewerResponse>,
) {
    let mut queue = VecDeque::new();
    let mut last_generation = controller.session().generation();

    loop {
        if queue.is_empty() {
            match requests.recv() {
                Ok(request) => queue.push_back(request),
                Err(_) => break,
            }
        }
        queue.extend(requests.try_iter());

        if queue.iter().any(|r| matches!(r, ViewerRequest::Shutdown)) {
            break;
        }
        skip_superseded(&mut queue, &responses);

        let Some(request) = queue.pop_front() else {
            continue;
        };

        let mut outbox: Vec<Notice> = Vec::new();
        let id = match request {
            ViewerRequest::Load { id, source } => {
                let _ = controller.load(&source, &mut outbox);
                id
            }
            ViewerRequest::StepPage { id, step } => {
                controller.go_to_page(step, &mut outbox);
                id
            }
            ViewerRequest::StepZoom { id, step } => {
                controller.set_zoom(step, &mut outbox);
                id
            }
            ViewerRequest::Shutdown => break,
        };

        for notice in outbox {
            let _ = responses.send(ViewerResponse::Notice(notice));
        }
        let generation = controller.session().generation();
        if generation != last_generation {
            last_generation = generation;
            let _ = responses.send(ViewerResponse::Snapshot(controller.snapshot()));
        }
        let _ = responses.send(ViewerResponse::Completed(id));
    }

    debug!("Viewer worker stopped");
}

fn skip_superseded(queue: &mut VecDeque<ViewerRequest>, responses: &Sender<ViewerResponse>) {
    let Some(last_load) = queue.iter().rposition(ViewerRequest::replaces_session) else {
        return;
    };
    for request in queue.drain(..last_load) {
        if let Some(id) = request.id() {
            debug!("Skipping superseded viewer request {id:?}");
            let _ = responses.send(ViewerResponse::Superseded(id));
        }
    }
}
