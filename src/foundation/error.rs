/// Convenience result type used across the try-on engine.
pub type TryonResult<T> = Result<T, TryonError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Loader and compositor errors are terminal for the request that produced
/// them, never for the engine: the controller records them and stays usable.
#[derive(thiserror::Error, Debug)]
pub enum TryonError {
    /// Invalid caller-provided data (malformed raster, bad parameters).
    #[error("validation error: {0}")]
    Validation(String),

    /// Source bytes are not a recognizable image.
    #[error("decode error: {0}")]
    Decode(String),

    /// Decoded raster exceeds the configured maximum dimensions.
    #[error("size error: {0}")]
    Size(String),

    /// Fetch or decode exceeded the configured time bound.
    #[error("timeout error: {0}")]
    Timeout(String),

    /// Unexpected rasterization failure. Compose is total for well-formed
    /// rasters, so this variant only carries defensive handling.
    #[error("composition error: {0}")]
    Composition(String),

    /// Saving encoded bytes to local storage failed.
    #[error("export error: {0}")]
    Export(String),

    /// A share target (native share, clipboard) was unavailable or failed.
    #[error("share error: {0}")]
    Share(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TryonError {
    /// Build a [`TryonError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TryonError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`TryonError::Size`] value.
    pub fn size(msg: impl Into<String>) -> Self {
        Self::Size(msg.into())
    }

    /// Build a [`TryonError::Timeout`] value.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Build a [`TryonError::Composition`] value.
    pub fn composition(msg: impl Into<String>) -> Self {
        Self::Composition(msg.into())
    }

    /// Build a [`TryonError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`TryonError::Share`] value.
    pub fn share(msg: impl Into<String>) -> Self {
        Self::Share(msg.into())
    }

    /// Classify this error into its taxonomy kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Size(_) => ErrorKind::Size,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Composition(_) => ErrorKind::Composition,
            Self::Export(_) => ErrorKind::Export,
            Self::Share(_) => ErrorKind::Share,
            Self::Other(_) => ErrorKind::Other,
        }
    }
}

/// Variant-only view of [`TryonError`] carried by failure states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Invalid caller-provided data.
    Validation,
    /// Unrecognizable image bytes.
    Decode,
    /// Raster over the configured dimension cap.
    Size,
    /// Load exceeded its time bound.
    Timeout,
    /// Unexpected rasterization failure.
    Composition,
    /// Local save failed.
    Export,
    /// Share target unavailable or failed.
    Share,
    /// Wrapped lower-level error.
    Other,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
