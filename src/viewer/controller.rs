//! Viewer controller: load, paginate, zoom and render one document

use std::sync::Arc;

use log::{debug, error, info};

use crate::backend::{BackendError, DocumentBackend, DocumentHandle, Surface, Viewport};
use crate::notification::{NotificationLevel, Notifier};

use super::error::ViewerError;
use super::session::{Command, Effect, OpenDocument, PageStep, ViewerSession};
use super::source::SourceFile;
use super::zoom::{Zoom, ZoomStep};

pub const LOADED_MESSAGE: &str = "PDF cargado correctamente";

/// Owns the viewing session, the backend it talks to and the drawing surface
pub struct ViewerController<B: DocumentBackend> {
    backend: B,
    session: ViewerSession,
    surface: Surface,
}

impl<B: DocumentBackend> ViewerController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            session: ViewerSession::new(),
            surface: Surface::default(),
        }
    }

    pub fn session(&self) -> &ViewerSession {
        &self.session
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load a user-selected file.
    ///
    /// The session only changes once the document is decoded and reports at
    /// least one page. Returns the page count.
    pub fn load(
        &mut self,
        source: &SourceFile,
        notifier: &mut dyn Notifier,
    ) -> Result<usize, ViewerError> {
        ensure_pdf(source).map_err(|e| report(e, notifier))?;

        let bytes = source.bytes().map_err(|e| {
            report(
                ViewerError::Read {
                    name: source.name().to_string(),
                    source: e,
                },
                notifier,
            )
        })?;

        let decoded = self
            .backend
            .decode(&bytes)
            .and_then(|handle| self.counted(handle));
        let (handle, page_count) = decoded.map_err(|e| {
            report(
                ViewerError::Decode {
                    name: source.name().to_string(),
                    source: e,
                },
                notifier,
            )
        })?;

        info!("Loaded {} ({page_count} pages)", source.name());
        let effects = self.session.apply(Command::Open { handle, page_count });
        self.run_effects(effects, notifier);

        notifier.notify(LOADED_MESSAGE.to_string(), NotificationLevel::Success);
        Ok(page_count)
    }

    /// Page count of a freshly decoded document; empty documents are closed
    fn counted(&mut self, handle: DocumentHandle) -> Result<(DocumentHandle, usize), BackendError> {
        match self.backend.page_count(handle) {
            Ok(0) => {
                self.backend.close(handle);
                Err(BackendError::EmptyDocument)
            }
            Ok(count) => Ok((handle, count)),
            Err(e) => {
                self.backend.close(handle);
                Err(e)
            }
        }
    }

    /// Move one page; returns true if the page changed
    pub fn go_to_page(&mut self, step: PageStep, notifier: &mut dyn Notifier) -> bool {
        let effects = self.session.apply(Command::StepPage(step));
        let changed = !effects.is_empty();
        self.run_effects(effects, notifier);
        changed
    }

    /// Zoom one step; returns true if the factor changed
    pub fn set_zoom(&mut self, step: ZoomStep, notifier: &mut dyn Notifier) -> bool {
        let effects = self.session.apply(Command::StepZoom(step));
        let changed = !effects.is_empty();
        self.run_effects(effects, notifier);
        changed
    }

    /// Render the current page at the current zoom.
    ///
    /// Without a document this is a silent no-op. A failure leaves page and
    /// zoom where they are.
    pub fn render_current_page(&mut self, notifier: &mut dyn Notifier) -> Result<(), ViewerError> {
        let Some(doc) = self.session.document().copied() else {
            return Ok(());
        };
        let scale = self.session.zoom().factor();

        render_page(&mut self.backend, &mut self.surface, &doc, scale).map_err(|e| {
            report(
                ViewerError::Render {
                    page: doc.page_index,
                    source: e,
                },
                notifier,
            )
        })?;

        debug!(
            "Rendered page {}/{} at {scale} ({}x{})",
            doc.page_index,
            doc.page_count,
            self.surface.width(),
            self.surface.height()
        );
        Ok(())
    }

    fn run_effects(&mut self, effects: Vec<Effect>, notifier: &mut dyn Notifier) {
        for effect in effects {
            match effect {
                Effect::CloseDocument(handle) => self.backend.close(handle),
                Effect::RenderCurrentPage => {
                    // Failures are reported inside
                    let _ = self.render_current_page(notifier);
                }
                Effect::ShowDocument | Effect::PageInfoChanged | Effect::ZoomChanged => {
                    debug!("Viewer effect: {effect:?}");
                }
            }
        }
    }

    /// Immutable view of the session for display
    pub fn snapshot(&self) -> ViewerSnapshot {
        let document = self.session.document().copied();
        ViewerSnapshot {
            generation: self.session.generation(),
            document,
            zoom: *self.session.zoom(),
            surface: document.map(|_| Arc::new(self.surface.clone())),
        }
    }
}

fn render_page<B: DocumentBackend>(
    backend: &mut B,
    surface: &mut Surface,
    doc: &OpenDocument,
    scale: f32,
) -> Result<(), BackendError> {
    let page = doc.page_index - 1;
    let size = backend.page_size(doc.handle, page)?;
    let viewport = Viewport::for_page(size, scale);
    surface.resize_to(&viewport);
    backend.render(doc.handle, page, &viewport, surface)
}

/// Reject a source whose declared type is not PDF, before anything is read
pub(super) fn ensure_pdf(source: &SourceFile) -> Result<(), ViewerError> {
    if source.is_pdf() {
        Ok(())
    } else {
        Err(ViewerError::InvalidInput {
            name: source.name().to_string(),
            media_type: source.media_type().map(str::to_string),
        })
    }
}

pub(super) fn report(err: ViewerError, notifier: &mut dyn Notifier) -> ViewerError {
    error!("{err}");
    notifier.notify(err.user_message().to_string(), NotificationLevel::Error);
    err
}

/// What the UI needs to draw the viewer
#[derive(Clone, Debug)]
pub struct ViewerSnapshot {
    pub generation: u64,
    pub document: Option<OpenDocument>,
    pub zoom: Zoom,
    /// Last rendered page, present while a document is loaded
    pub surface: Option<Arc<Surface>>,
}

impl Default for ViewerSnapshot {
    fn default() -> Self {
        Self {
            generation: 0,
            document: None,
            zoom: Zoom::default(),
            surface: None,
        }
    }
}

impl ViewerSnapshot {
    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn page_label(&self) -> Option<String> {
        self.document.as_ref().map(OpenDocument::page_label)
    }

    pub fn zoom_label(&self) -> String {
        self.zoom.label()
    }

    pub fn can_go_previous(&self) -> bool {
        self.document.is_some_and(|d| d.can_go_previous())
    }

    pub fn can_go_next(&self) -> bool {
        self.document.is_some_and(|d| d.can_go_next())
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom.can_zoom_in()
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom.can_zoom_out()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::Notice;
    use crate::test_utils::fake_backend::{FakeBackend, fake_pdf};

    fn pdf(pages: usize) -> SourceFile {
        SourceFile::from_bytes("reporte.pdf", Some("application/pdf"), fake_pdf(pages))
    }

    fn levels(outbox: &[Notice]) -> Vec<NotificationLevel> {
        outbox.iter().map(|n| n.level).collect()
    }

    #[test]
    fn load_sets_session_and_renders_first_page() {
        let mut viewer = ViewerController::new(FakeBackend::new());
        let mut outbox = Vec::new();

        assert_eq!(viewer.load(&pdf(3), &mut outbox).unwrap(), 3);

        let snapshot = viewer.snapshot();
        let doc = snapshot.document.unwrap();
        assert_eq!((doc.page_index, doc.page_count), (1, 3));
        assert_eq!(snapshot.zoom.factor(), 1.0);
        assert_eq!(viewer.surface().width(), 612);
        assert_eq!(viewer.surface().height(), 792);
        assert_eq!(viewer.backend().rendered_pages(), &[0]);
        assert_eq!(
            outbox,
            vec![Notice {
                message: LOADED_MESSAGE.into(),
                level: NotificationLevel::Success,
            }]
        );
    }

    #[test]
    fn three_page_walkthrough() {
        let mut viewer = ViewerController::new(FakeBackend::new());
        let mut outbox = Vec::new();
        viewer.load(&pdf(3), &mut outbox).unwrap();

        assert!(viewer.go_to_page(PageStep::Next, &mut outbox));
        assert!(viewer.go_to_page(PageStep::Next, &mut outbox));
        assert_eq!(viewer.session().document().unwrap().page_index, 3);

        assert!(!viewer.go_to_page(PageStep::Next, &mut outbox));
        assert_eq!(viewer.session().document().unwrap().page_index, 3);
        assert_eq!(viewer.backend().rendered_pages(), &[0, 1, 2]);
    }

    #[test]
    fn previous_on_first_page_is_noop() {
        let mut viewer = ViewerController::new(FakeBackend::new());
        let mut outbox = Vec::new();
        viewer.load(&pdf(2), &mut outbox).unwrap();

        assert!(!viewer.go_to_page(PageStep::Previous, &mut outbox));
        assert_eq!(viewer.backend().rendered_pages(), &[0]);
    }

    #[test]
    fn fresh_session_zoom_floors_at_half() {
        let mut viewer = ViewerController::new(FakeBackend::new());
        let mut outbox = Vec::new();

        for _ in 0..8 {
            viewer.set_zoom(ZoomStep::Out, &mut outbox);
        }

        assert_eq!(viewer.session().zoom().factor(), 0.5);
        assert!(outbox.is_empty());
        assert!(viewer.backend().rendered_pages().is_empty());
    }

    #[test]
    fn zoom_rerenders_at_new_size() {
        let mut viewer = ViewerController::new(FakeBackend::new());
        let mut outbox = Vec::new();
        viewer.load(&pdf(1), &mut outbox).unwrap();

        viewer.set_zoom(ZoomStep::In, &mut outbox);

        assert_eq!(viewer.surface().width(), 765);
        assert_eq!(viewer.surface().height(), 990);
        assert_eq!(viewer.snapshot().zoom_label(), "125%");
    }

    #[test]
    fn non_pdf_never_touches_session() {
        let mut viewer = ViewerController::new(FakeBackend::new());
        let mut outbox = Vec::new();
        viewer.load(&pdf(4), &mut outbox).unwrap();
        viewer.go_to_page(PageStep::Next, &mut outbox);
        outbox.clear();

        let image = SourceFile::from_bytes("foto.png", Some("image/png"), fake_pdf(9));
        let err = viewer.load(&image, &mut outbox).unwrap_err();

        assert!(matches!(err, ViewerError::InvalidInput { .. }));
        assert_eq!(viewer.backend().decode_calls(), 1);
        let doc = viewer.session().document().unwrap();
        assert_eq!((doc.page_index, doc.page_count), (2, 4));
        assert_eq!(levels(&outbox), vec![NotificationLevel::Error]);
        assert_eq!(
            outbox[0].message,
            "Por favor selecciona un archivo PDF válido"
        );
    }

    #[test]
    fn failed_decode_keeps_previous_session() {
        let mut viewer = ViewerController::new(FakeBackend::new());
        let mut outbox = Vec::new();
        viewer.load(&pdf(5), &mut outbox).unwrap();
        viewer.go_to_page(PageStep::Next, &mut outbox);
        viewer.set_zoom(ZoomStep::In, &mut outbox);
        let before = viewer.snapshot();
        outbox.clear();

        let broken = SourceFile::from_bytes("roto.pdf", Some("application/pdf"), b"garbage".to_vec());
        let err = viewer.load(&broken, &mut outbox).unwrap_err();

        assert!(matches!(err, ViewerError::Decode { .. }));
        let after = viewer.snapshot();
        assert_eq!(after.document, before.document);
        assert_eq!(after.zoom, before.zoom);
        assert_eq!(after.generation, before.generation);
        assert_eq!(outbox[0].message, "Error al cargar el PDF");
    }

    #[test]
    fn empty_document_is_a_decode_error() {
        let mut viewer = ViewerController::new(FakeBackend::new());
        let mut outbox = Vec::new();

        let err = viewer.load(&pdf(0), &mut outbox).unwrap_err();

        assert!(matches!(
            err,
            ViewerError::Decode {
                source: BackendError::EmptyDocument,
                ..
            }
        ));
        assert!(!viewer.session().is_loaded());
        assert_eq!(viewer.backend().open_documents(), 0);
    }

    #[test]
    fn reload_replaces_session_and_closes_old_document() {
        let mut viewer = ViewerController::new(FakeBackend::new());
        let mut outbox = Vec::new();
        viewer.load(&pdf(3), &mut outbox).unwrap();
        viewer.go_to_page(PageStep::Next, &mut outbox);
        viewer.set_zoom(ZoomStep::Out, &mut outbox);

        viewer.load(&pdf(7), &mut outbox).unwrap();

        let snapshot = viewer.snapshot();
        let doc = snapshot.document.unwrap();
        assert_eq!((doc.page_index, doc.page_count), (1, 7));
        assert_eq!(snapshot.zoom.factor(), 1.0);
        assert_eq!(viewer.backend().open_documents(), 1);
    }

    #[test]
    fn render_failure_keeps_navigation() {
        let mut viewer = ViewerController::new(FakeBackend::new().failing_on_page(1));
        let mut outbox = Vec::new();
        viewer.load(&pdf(3), &mut outbox).unwrap();
        outbox.clear();

        assert!(viewer.go_to_page(PageStep::Next, &mut outbox));

        assert_eq!(viewer.session().document().unwrap().page_index, 2);
        assert_eq!(levels(&outbox), vec![NotificationLevel::Error]);
        assert_eq!(outbox[0].message, "Error al renderizar la página");
        // Surface was resized and cleared before the failed render
        assert_eq!(viewer.surface().pixel(0, 0), Some([255, 255, 255]));
    }

    #[test]
    fn render_without_document_is_silent() {
        let mut viewer = ViewerController::new(FakeBackend::new());
        let mut outbox = Vec::new();

        assert!(viewer.render_current_page(&mut outbox).is_ok());
        assert!(outbox.is_empty());
        assert!(viewer.snapshot().surface.is_none());
    }

    #[test]
    fn unreadable_file_reports_load_error() {
        let mut viewer = ViewerController::new(FakeBackend::new());
        let mut outbox = Vec::new();

        let missing = SourceFile::from_path("/no/such/dir/reporte.pdf");
        let err = viewer.load(&missing, &mut outbox).unwrap_err();

        assert!(matches!(err, ViewerError::Read { .. }));
        assert_eq!(outbox[0].message, "Error al cargar el PDF");
        assert_eq!(viewer.backend().decode_calls(), 0);
    }
}
