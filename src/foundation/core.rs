use std::{path::PathBuf, sync::Arc};

use crate::foundation::error::{TryonError, TryonResult};

/// Decoded raster in straight-alpha RGBA8 form, row-major.
///
/// Immutable once built: every pipeline step that produces pixels allocates a
/// fresh buffer rather than mutating an existing raster in place.
#[derive(Clone, Debug)]
pub struct RasterImage {
    width: u32,
    height: u32,
    rgba8: Arc<Vec<u8>>,
    source_id: String,
}

impl RasterImage {
    /// Build a raster from raw RGBA8 bytes, validating the buffer shape.
    pub fn new(
        width: u32,
        height: u32,
        rgba8: Vec<u8>,
        source_id: impl Into<String>,
    ) -> TryonResult<Self> {
        if width == 0 || height == 0 {
            return Err(TryonError::validation("raster dimensions must be > 0"));
        }
        let expected = (width as usize) * (height as usize) * 4;
        if rgba8.len() != expected {
            return Err(TryonError::validation(format!(
                "raster buffer length {} does not match {}x{} rgba8 ({} bytes)",
                rgba8.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8: Arc::new(rgba8),
            source_id: source_id.into(),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel bytes in row-major straight-alpha RGBA8.
    pub fn rgba8(&self) -> &[u8] {
        &self.rgba8
    }

    /// Identifier of the source this raster was decoded from.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }
}

/// Where image bytes come from.
///
/// `Bytes` covers in-memory handles a shell already holds (file pickers,
/// camera buffers); `Path` and `Url` are fetched by the loader.
#[derive(Clone, Debug)]
pub enum ImageSource {
    /// Bytes already in memory.
    Bytes(Arc<Vec<u8>>),
    /// Local file path.
    Path(PathBuf),
    /// Remote URL fetched over HTTPS.
    Url(String),
}

impl ImageSource {
    /// Wrap an owned byte buffer as an in-memory source.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::Bytes(Arc::new(bytes))
    }

    /// Human-readable identifier used as [`RasterImage::source_id`].
    pub fn id(&self) -> String {
        match self {
            Self::Bytes(bytes) => format!("bytes:{}", bytes.len()),
            Self::Path(path) => format!("file:{}", path.display()),
            Self::Url(url) => url.clone(),
        }
    }
}

/// Monotonically increasing composition generation counter.
///
/// Every change to the controller's inputs mints a new id; results tagged
/// with an older id are stale and get discarded on arrival.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct RequestId(pub u64);

impl RequestId {
    /// The id following this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Encoded output format for composed results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OutputFormat {
    /// JPEG at a given quality (1..=100). Alpha is dropped.
    Jpeg {
        /// Encoder quality, 1..=100.
        quality: u8,
    },
    /// Lossless PNG, alpha preserved.
    Png,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Jpeg { quality: 90 }
    }
}

impl OutputFormat {
    /// Build a JPEG format, validating the quality range.
    pub fn jpeg(quality: u8) -> TryonResult<Self> {
        if quality == 0 || quality > 100 {
            return Err(TryonError::validation("jpeg quality must be in 1..=100"));
        }
        Ok(Self::Jpeg { quality })
    }

    /// Conventional file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg { .. } => "jpg",
            Self::Png => "png",
        }
    }

    /// MIME type for this format.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg { .. } => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
