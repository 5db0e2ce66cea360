//! In-memory stand-in for the PDF engine

use std::collections::HashMap;

use flume::{Receiver, Sender};

use crate::backend::{BackendError, DocumentBackend, DocumentHandle, PageSize, Surface, Viewport};

const PAGE_MARKER: &[u8] = b"<< /Type /Page >>";
const LETTER: PageSize = PageSize::new(612.0, 792.0);

/// Minimal byte buffer the fake backend decodes as an N-page document
pub fn fake_pdf(pages: usize) -> Vec<u8> {
    let mut bytes = b"%PDF-1.4\n".to_vec();
    for i in 0..pages {
        bytes.extend_from_slice(format!("{} 0 obj ", i + 1).as_bytes());
        bytes.extend_from_slice(PAGE_MARKER);
        bytes.extend_from_slice(b" endobj\n");
    }
    bytes.extend_from_slice(b"%%EOF\n");
    bytes
}

/// Decodes anything starting with `%PDF-`, counting page markers.
///
/// Pages are US Letter. Rendering fills the surface with a grey level derived
/// from the page index so tests can tell pages apart.
#[derive(Debug, Default)]
pub struct FakeBackend {
    next_handle: u64,
    docs: HashMap<DocumentHandle, usize>,
    failing_page: Option<usize>,
    gate: Option<(Sender<()>, Receiver<()>)>,
    decode_calls: usize,
    rendered: Vec<usize>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every render of `page` (0-based) fail
    pub fn failing_on_page(mut self, page: usize) -> Self {
        self.failing_page = Some(page);
        self
    }

    /// Announce each decode on `entered`, then block it until a token
    /// arrives on `release`
    pub fn gated(mut self, entered: Sender<()>, release: Receiver<()>) -> Self {
        self.gate = Some((entered, release));
        self
    }

    pub fn decode_calls(&self) -> usize {
        self.decode_calls
    }

    /// 0-based indices of every page rendered so far, in order
    pub fn rendered_pages(&self) -> &[usize] {
        &self.rendered
    }

    pub fn open_documents(&self) -> usize {
        self.docs.len()
    }

    /// Grey level the fake paints for a page
    pub fn shade_for(page: usize) -> u8 {
        250u8.saturating_sub((page as u8).saturating_mul(20))
    }

    fn pages(&self, handle: DocumentHandle) -> Result<usize, BackendError> {
        self.docs
            .get(&handle)
            .copied()
            .ok_or(BackendError::InvalidHandle(handle.raw()))
    }

    fn check_page(&self, handle: DocumentHandle, page: usize) -> Result<(), BackendError> {
        let page_count = self.pages(handle)?;
        if page >= page_count {
            return Err(BackendError::PageOutOfRange { page, page_count });
        }
        Ok(())
    }
}

impl DocumentBackend for FakeBackend {
    fn decode(&mut self, bytes: &[u8]) -> Result<DocumentHandle, BackendError> {
        self.decode_calls += 1;
        if let Some((entered, release)) = &self.gate {
            let _ = entered.send(());
            let _ = release.recv();
        }
        if !bytes.starts_with(b"%PDF-") {
            return Err(BackendError::generic("missing %PDF header"));
        }
        let pages = bytes
            .windows(PAGE_MARKER.len())
            .filter(|w| *w == PAGE_MARKER)
            .count();

        self.next_handle += 1;
        let handle = DocumentHandle::new(self.next_handle);
        self.docs.insert(handle, pages);
        Ok(handle)
    }

    fn page_count(&self, handle: DocumentHandle) -> Result<usize, BackendError> {
        self.pages(handle)
    }

    fn page_size(&self, handle: DocumentHandle, page: usize) -> Result<PageSize, BackendError> {
        self.check_page(handle, page)?;
        Ok(LETTER)
    }

    fn render(
        &mut self,
        handle: DocumentHandle,
        page: usize,
        _viewport: &Viewport,
        surface: &mut Surface,
    ) -> Result<(), BackendError> {
        self.check_page(handle, page)?;
        if self.failing_page == Some(page) {
            return Err(BackendError::generic(format!("cannot rasterize page {page}")));
        }
        let shade = Self::shade_for(page);
        surface.fill([shade, shade, shade]);
        self.rendered.push(page);
        Ok(())
    }

    fn close(&mut self, handle: DocumentHandle) {
        self.docs.remove(&handle);
    }
}
