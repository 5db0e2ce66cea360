//! Viewing session state
//!
//! All page and zoom bounds live here. Buttons, key bindings and the worker
//! only ever send a [`Command`]; they never touch the fields directly.

use crate::backend::DocumentHandle;

use super::zoom::{Zoom, ZoomStep};

/// Page step direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageStep {
    Previous,
    Next,
}

impl PageStep {
    pub fn delta(self) -> isize {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }
}

/// A decoded document and the position within it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpenDocument {
    pub handle: DocumentHandle,
    /// Current page, 1-based
    pub page_index: usize,
    pub page_count: usize,
}

impl OpenDocument {
    pub fn can_go_previous(&self) -> bool {
        self.page_index > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.page_index < self.page_count
    }

    /// Page info line, e.g. "Página 2 de 5"
    pub fn page_label(&self) -> String {
        format!("Página {} de {}", self.page_index, self.page_count)
    }
}

/// The mutable record of which document, page and zoom are displayed
#[derive(Clone, Debug, Default)]
pub struct ViewerSession {
    document: Option<OpenDocument>,
    zoom: Zoom,
    generation: u64,
}

impl ViewerSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<&OpenDocument> {
        self.document.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn zoom(&self) -> &Zoom {
        &self.zoom
    }

    /// Counter bumped on every committed change
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply a command and return resulting effects
    #[must_use]
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        match cmd {
            Command::Open { handle, page_count } => {
                if page_count == 0 {
                    return vec![];
                }
                let previous = self.document.replace(OpenDocument {
                    handle,
                    page_index: 1,
                    page_count,
                });
                self.zoom.reset();
                self.generation += 1;

                let mut effects = Vec::with_capacity(5);
                if let Some(old) = previous.filter(|old| old.handle != handle) {
                    effects.push(Effect::CloseDocument(old.handle));
                }
                effects.extend([
                    Effect::ShowDocument,
                    Effect::RenderCurrentPage,
                    Effect::PageInfoChanged,
                    Effect::ZoomChanged,
                ]);
                effects
            }

            Command::StepPage(step) => {
                let Some(doc) = self.document.as_mut() else {
                    return vec![];
                };
                let target = doc.page_index as isize + step.delta();
                if target < 1 || target > doc.page_count as isize {
                    return vec![];
                }
                doc.page_index = target as usize;
                self.generation += 1;
                vec![Effect::RenderCurrentPage, Effect::PageInfoChanged]
            }

            Command::StepZoom(step) => {
                if !self.zoom.step(step) {
                    return vec![];
                }
                self.generation += 1;
                vec![Effect::RenderCurrentPage, Effect::ZoomChanged]
            }
        }
    }
}

/// Commands that modify the session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replace the session with a freshly decoded document
    Open {
        handle: DocumentHandle,
        page_count: usize,
    },
    /// Move one page back or forward
    StepPage(PageStep),
    /// Zoom one step in or out
    StepZoom(ZoomStep),
}

/// Effects produced by session changes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Release a document that was replaced
    CloseDocument(DocumentHandle),
    /// Hide the placeholder, show canvas and controls
    ShowDocument,
    RenderCurrentPage,
    PageInfoChanged,
    ZoomChanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(session: &mut ViewerSession, raw: u64, page_count: usize) -> Vec<Effect> {
        session.apply(Command::Open {
            handle: DocumentHandle::new(raw),
            page_count,
        })
    }

    #[test]
    fn open_resets_page_and_zoom() {
        let mut session = ViewerSession::new();
        let _ = session.apply(Command::StepZoom(ZoomStep::In));

        let effects = open(&mut session, 1, 3);

        let doc = session.document().unwrap();
        assert_eq!((doc.page_index, doc.page_count), (1, 3));
        assert_eq!(session.zoom().factor(), 1.0);
        assert_eq!(
            effects,
            vec![
                Effect::ShowDocument,
                Effect::RenderCurrentPage,
                Effect::PageInfoChanged,
                Effect::ZoomChanged,
            ]
        );
    }

    #[test]
    fn reopening_closes_previous_handle() {
        let mut session = ViewerSession::new();
        let _ = open(&mut session, 1, 3);

        let effects = open(&mut session, 2, 7);

        assert_eq!(effects[0], Effect::CloseDocument(DocumentHandle::new(1)));
        assert_eq!(session.document().unwrap().page_count, 7);
    }

    #[test]
    fn open_without_pages_is_ignored() {
        let mut session = ViewerSession::new();
        assert!(open(&mut session, 1, 0).is_empty());
        assert!(!session.is_loaded());
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn page_steps_stay_in_bounds() {
        let mut session = ViewerSession::new();
        let _ = open(&mut session, 1, 3);

        assert!(session.apply(Command::StepPage(PageStep::Previous)).is_empty());
        assert_eq!(session.document().unwrap().page_index, 1);

        for _ in 0..2 {
            assert_eq!(
                session.apply(Command::StepPage(PageStep::Next)),
                vec![Effect::RenderCurrentPage, Effect::PageInfoChanged]
            );
        }
        assert_eq!(session.document().unwrap().page_index, 3);

        assert!(session.apply(Command::StepPage(PageStep::Next)).is_empty());
        assert_eq!(session.document().unwrap().page_index, 3);
    }

    #[test]
    fn page_step_without_document_is_noop() {
        let mut session = ViewerSession::new();
        assert!(session.apply(Command::StepPage(PageStep::Next)).is_empty());
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn zoom_works_without_document() {
        let mut session = ViewerSession::new();
        for _ in 0..8 {
            let _ = session.apply(Command::StepZoom(ZoomStep::Out));
        }
        assert_eq!(session.zoom().factor(), 0.5);
        assert!(session.apply(Command::StepZoom(ZoomStep::Out)).is_empty());
    }

    #[test]
    fn generation_tracks_committed_changes_only() {
        let mut session = ViewerSession::new();
        let _ = open(&mut session, 1, 2);
        assert_eq!(session.generation(), 1);

        let _ = session.apply(Command::StepPage(PageStep::Next));
        let _ = session.apply(Command::StepPage(PageStep::Next));
        assert_eq!(session.generation(), 2);

        let _ = session.apply(Command::StepZoom(ZoomStep::In));
        assert_eq!(session.generation(), 3);
    }

    #[test]
    fn page_label_matches_page_info() {
        let mut session = ViewerSession::new();
        let _ = open(&mut session, 1, 5);
        assert_eq!(session.document().unwrap().page_label(), "Página 1 de 5");
    }
}
