//! PDF viewer widget: session, controller and the worker that runs it

mod controller;
mod error;
mod request;
mod service;
mod session;
mod source;
mod worker;
mod zoom;

pub use controller::{LOADED_MESSAGE, ViewerController, ViewerSnapshot};
pub use error::ViewerError;
pub use request::{RequestId, ViewerRequest, ViewerResponse};
pub use service::ViewerService;
pub use session::{Command, Effect, OpenDocument, PageStep, ViewerSession};
pub use source::{PDF_MEDIA_TYPE, SourceFile, media_type_for};
pub use zoom::{Zoom, ZoomStep};
