//! MuPDF-backed document decoding and rasterization

use std::collections::HashMap;

use log::debug;
use mupdf::{Colorspace, Document, Matrix};

use crate::viewer::PDF_MEDIA_TYPE;

use super::{BackendError, DocumentBackend, DocumentHandle, PageSize, Surface, Viewport};

/// Document backend over MuPDF.
///
/// MuPDF documents are not `Send`, so a backend instance must stay on the
/// thread that created it. The viewer service builds it inside its worker.
#[derive(Default)]
pub struct MupdfBackend {
    next_handle: u64,
    docs: HashMap<DocumentHandle, Document>,
}

impl MupdfBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn document(&self, handle: DocumentHandle) -> Result<&Document, BackendError> {
        self.docs
            .get(&handle)
            .ok_or(BackendError::InvalidHandle(handle.raw()))
    }

    fn check_page(&self, handle: DocumentHandle, page: usize) -> Result<&Document, BackendError> {
        let doc = self.document(handle)?;
        let page_count = doc.page_count()? as usize;
        if page >= page_count {
            return Err(BackendError::PageOutOfRange { page, page_count });
        }
        Ok(doc)
    }
}

impl DocumentBackend for MupdfBackend {
    fn decode(&mut self, bytes: &[u8]) -> Result<DocumentHandle, BackendError> {
        let doc = Document::from_bytes(bytes, PDF_MEDIA_TYPE)?;
        if doc.page_count()? <= 0 {
            return Err(BackendError::EmptyDocument);
        }

        self.next_handle += 1;
        let handle = DocumentHandle::new(self.next_handle);
        self.docs.insert(handle, doc);
        debug!("Decoded document {} ({} bytes)", handle.raw(), bytes.len());
        Ok(handle)
    }

    fn page_count(&self, handle: DocumentHandle) -> Result<usize, BackendError> {
        Ok(self.document(handle)?.page_count()? as usize)
    }

    fn page_size(&self, handle: DocumentHandle, page: usize) -> Result<PageSize, BackendError> {
        let doc = self.check_page(handle, page)?;
        let bounds = doc.load_page(page as i32)?.bounds()?;
        Ok(PageSize::new(bounds.x1 - bounds.x0, bounds.y1 - bounds.y0))
    }

    fn render(
        &mut self,
        handle: DocumentHandle,
        page: usize,
        viewport: &Viewport,
        surface: &mut Surface,
    ) -> Result<(), BackendError> {
        let doc = self.check_page(handle, page)?;
        let page = doc.load_page(page as i32)?;

        let transform = Matrix::new_scale(viewport.scale, viewport.scale);
        let rgb = Colorspace::device_rgb();
        let pixmap = page.to_pixmap(&transform, &rgb, false, false)?;

        surface.blit_samples(
            pixmap.samples(),
            pixmap.width(),
            pixmap.height(),
            pixmap.stride() as usize,
            pixmap.n() as usize,
        )
    }

    fn close(&mut self, handle: DocumentHandle) {
        if self.docs.remove(&handle).is_some() {
            debug!("Closed document {}", handle.raw());
        }
    }
}
