//! Document decode/render backends
//!
//! The viewer never parses PDF itself. Everything below the page/viewport
//! level goes through [`DocumentBackend`], which the MuPDF implementation
//! satisfies when the `pdf` feature is enabled.

#[cfg(feature = "pdf")]
mod mupdf_backend;
mod surface;

#[cfg(feature = "pdf")]
pub use mupdf_backend::MupdfBackend;
pub use surface::Surface;

/// Opaque handle to a decoded document held by a backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DocumentHandle(u64);

impl DocumentHandle {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Intrinsic page size in PDF points
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSize {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PageSize {
    #[must_use]
    pub const fn new(width_pt: f32, height_pt: f32) -> Self {
        Self {
            width_pt,
            height_pt,
        }
    }
}

/// Pixel-space rectangle a page is rasterized into
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Zoom factor the viewport was derived from
    pub scale: f32,
    pub width_px: u32,
    pub height_px: u32,
}

impl Viewport {
    /// Viewport for a page at the given zoom factor.
    ///
    /// Fractional pixels are truncated, the way a canvas truncates the
    /// dimensions it is given. A degenerate page still gets one pixel.
    #[must_use]
    pub fn for_page(page: PageSize, scale: f32) -> Self {
        Self {
            scale,
            width_px: scaled_dimension(page.width_pt, scale),
            height_px: scaled_dimension(page.height_pt, scale),
        }
    }
}

fn scaled_dimension(points: f32, scale: f32) -> u32 {
    let px = (points * scale).floor();
    if px.is_finite() && px >= 1.0 {
        px as u32
    } else {
        1
    }
}

/// Errors reported by document backends
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[cfg(feature = "pdf")]
    #[error("PDF engine: {0}")]
    Pdf(#[from] mupdf::error::Error),

    #[error("document has no pages")]
    EmptyDocument,

    #[error("invalid document handle {0}")]
    InvalidHandle(u64),

    #[error("page {page} out of range (page_count={page_count})")]
    PageOutOfRange { page: usize, page_count: usize },

    #[error("this build has no PDF backend")]
    Unsupported,

    #[error("{detail}")]
    Generic { detail: String },
}

impl BackendError {
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic { detail: msg.into() }
    }
}

/// External document decode/render library.
///
/// Page indices are 0-based here; the viewer session is 1-based and converts
/// at the call site.
pub trait DocumentBackend {
    /// Decode a byte buffer into a document
    fn decode(&mut self, bytes: &[u8]) -> Result<DocumentHandle, BackendError>;

    fn page_count(&self, handle: DocumentHandle) -> Result<usize, BackendError>;

    fn page_size(&self, handle: DocumentHandle, page: usize) -> Result<PageSize, BackendError>;

    /// Rasterize `page` into `surface`, which is already sized to `viewport`
    fn render(
        &mut self,
        handle: DocumentHandle,
        page: usize,
        viewport: &Viewport,
        surface: &mut Surface,
    ) -> Result<(), BackendError>;

    /// Release a document. Unknown handles are ignored.
    fn close(&mut self, handle: DocumentHandle);
}

/// Backend for builds without a PDF engine: every decode fails
#[derive(Debug, Default)]
pub struct UnsupportedBackend;

impl DocumentBackend for UnsupportedBackend {
    fn decode(&mut self, _bytes: &[u8]) -> Result<DocumentHandle, BackendError> {
        Err(BackendError::Unsupported)
    }

    fn page_count(&self, handle: DocumentHandle) -> Result<usize, BackendError> {
        Err(BackendError::InvalidHandle(handle.raw()))
    }

    fn page_size(&self, handle: DocumentHandle, _page: usize) -> Result<PageSize, BackendError> {
        Err(BackendError::InvalidHandle(handle.raw()))
    }

    fn render(
        &mut self,
        handle: DocumentHandle,
        _page: usize,
        _viewport: &Viewport,
        _surface: &mut Surface,
    ) -> Result<(), BackendError> {
        Err(BackendError::InvalidHandle(handle.raw()))
    }

    fn close(&mut self, _handle: DocumentHandle) {}
}
