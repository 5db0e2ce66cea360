use crate::backend::BackendError;

/// Viewer failures. Each one is logged and shown as an error toast where it
/// happens; none of them is fatal to the session.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("{name} is not a PDF (declared type: {})", .media_type.as_deref().unwrap_or("unknown"))]
    InvalidInput {
        name: String,
        media_type: Option<String>,
    },

    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: BackendError,
    },

    #[error("failed to render page {page}: {source}")]
    Render {
        page: usize,
        #[source]
        source: BackendError,
    },
}

impl ViewerError {
    /// Message shown to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "Por favor selecciona un archivo PDF válido",
            Self::Read { .. } | Self::Decode { .. } => "Error al cargar el PDF",
            Self::Render { .. } => "Error al renderizar la página",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_per_kind() {
        let invalid = ViewerError::InvalidInput {
            name: "foto.png".into(),
            media_type: Some("image/png".into()),
        };
        assert_eq!(
            invalid.user_message(),
            "Por favor selecciona un archivo PDF válido"
        );
        assert_eq!(
            invalid.to_string(),
            "foto.png is not a PDF (declared type: image/png)"
        );

        let render = ViewerError::Render {
            page: 2,
            source: BackendError::generic("boom"),
        };
        assert_eq!(render.user_message(), "Error al renderizar la página");
        assert_eq!(render.to_string(), "failed to render page 2: boom");
    }
}
