//! User-selected document sources

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A file picked by the user, with the media type it declares.
///
/// Like a browser file input, the type is declared from the file name before
/// any bytes are read; the bytes themselves are read lazily.
#[derive(Clone, Debug)]
pub struct SourceFile {
    name: String,
    media_type: Option<String>,
    data: SourceData,
}

#[derive(Clone, Debug)]
enum SourceData {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

impl SourceFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            media_type: media_type_for(&path).map(str::to_string),
            name,
            data: SourceData::Path(path),
        }
    }

    pub fn from_bytes(
        name: impl Into<String>,
        media_type: Option<&str>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.map(str::to_string),
            data: SourceData::Bytes(bytes.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    pub fn is_pdf(&self) -> bool {
        self.media_type() == Some(PDF_MEDIA_TYPE)
    }

    pub fn bytes(&self) -> io::Result<Cow<'_, [u8]>> {
        match &self.data {
            SourceData::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            SourceData::Path(path) => fs::read(path).map(Cow::Owned),
        }
    }
}

/// Media type a file picker would declare for this path
pub fn media_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let media_type = match ext.as_str() {
        "pdf" => PDF_MEDIA_TYPE,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "epub" => "application/epub+zip",
        "zip" => "application/zip",
        "json" => "application/json",
        _ => return None,
    };
    Some(media_type)
}
