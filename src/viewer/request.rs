//! Viewer request and response types

use crate::notification::Notice;

use super::controller::ViewerSnapshot;
use super::session::PageStep;
use super::source::SourceFile;
use super::zoom::ZoomStep;

/// Unique identifier for viewer requests
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

impl RequestId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Request sent to the viewer worker
#[derive(Debug)]
pub enum ViewerRequest {
    /// Load a new document, replacing the session
    Load { id: RequestId, source: SourceFile },

    StepPage { id: RequestId, step: PageStep },

    StepZoom { id: RequestId, step: ZoomStep },

    /// Stop the worker
    Shutdown,
}

impl ViewerRequest {
    pub fn id(&self) -> Option<RequestId> {
        match self {
            Self::Load { id, .. } | Self::StepPage { id, .. } | Self::StepZoom { id, .. } => {
                Some(*id)
            }
            Self::Shutdown => None,
        }
    }

    /// A load that will reset the session if it succeeds. Loads of other
    /// media types are rejected without touching it.
    pub fn replaces_session(&self) -> bool {
        matches!(self, Self::Load { source, .. } if source.is_pdf())
    }
}

/// Response from the viewer worker
#[derive(Debug)]
pub enum ViewerResponse {
    /// Toast produced while handling a request
    Notice(Notice),

    /// Session changed
    Snapshot(ViewerSnapshot),

    /// Request handled
    Completed(RequestId),

    /// Request dropped because a later load replaces its effect
    Superseded(RequestId),
}
