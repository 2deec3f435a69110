use thiserror::Error;

/// Failures surfaced by boundary-facing operations. None of them are fatal:
/// the session is left exactly as it was before the failed call.
#[derive(Debug, Error)]
pub enum PickError {
    /// Wrong kind of file selected (non-image for image load, non-JSON for data load).
    #[error("unsupported file: {0}")]
    InputFormat(String),
    /// Malformed JSON or a document missing required fields.
    #[error("invalid data file: {0}")]
    Parse(String),
    /// Operation attempted in a state that cannot serve it.
    #[error("{0}")]
    Precondition(String),
    /// Image bytes could not be decoded.
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl PickError {
    pub fn title(&self) -> &'static str {
        match self {
            Self::InputFormat(_) => "Unsupported file",
            Self::Parse(_) => "Invalid data file",
            Self::Precondition(_) => "Not available",
            Self::Decode(_) => "Image load failed",
            Self::Io { .. } => "File error",
        }
    }
}

impl From<serde_json::Error> for PickError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

pub type PickResult<T> = Result<T, PickError>;
