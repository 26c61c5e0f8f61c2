use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::{
    core::OutputFormat,
    error::{TryonError, TryonResult},
};

/// What actually happened to the bytes. Exactly one outcome per operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Delivered through the platform's native share mechanism.
    Shared,
    /// Written to the clipboard.
    Copied,
    /// Written to local storage at the given path.
    Saved(PathBuf),
    /// Every delivery channel failed; the last error message is attached.
    Failed(String),
}

/// Caller-facing metadata attached to share requests.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ShareMetadata {
    /// Share sheet title.
    pub title: String,
    /// Share sheet body text.
    pub text: String,
    /// File name (without extension) used when falling back to save.
    pub suggested_name: String,
}

impl Default for ShareMetadata {
    fn default() -> Self {
        Self {
            title: "Check out my virtual try-on!".to_string(),
            text: "I tried on this outfit virtually - what do you think?".to_string(),
            suggested_name: "virtual-tryon-result".to_string(),
        }
    }
}

/// Platform capability seam for delivering encoded bytes.
///
/// Each method either completes the delivery or reports why it cannot; the
/// adapter walks the fallback chain, so implementations should return
/// [`TryonError::Share`] for "unavailable here" rather than panicking.
pub trait SharePlatform {
    /// Hand the bytes to a native share mechanism, if one exists.
    fn native_share(
        &mut self,
        bytes: &[u8],
        format: OutputFormat,
        meta: &ShareMetadata,
    ) -> TryonResult<()>;

    /// Write the image to a clipboard-like destination.
    fn clipboard_write(&mut self, bytes: &[u8], format: OutputFormat) -> TryonResult<()>;

    /// Persist the bytes locally; returns the written path.
    fn save_file(&mut self, bytes: &[u8], file_name: &str) -> TryonResult<PathBuf>;
}

/// Delivers composed results over a [`SharePlatform`].
///
/// `save` and `share` always terminate in a [`ShareOutcome`] and never
/// propagate an error to the caller; composition state is untouched either
/// way.
#[derive(Debug)]
pub struct ShareAdapter<P: SharePlatform> {
    platform: P,
}

impl<P: SharePlatform> ShareAdapter<P> {
    /// Wrap a platform implementation.
    pub fn new(platform: P) -> Self {
        Self { platform }
    }

    /// Borrow the underlying platform.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Save encoded bytes locally under the suggested name.
    pub fn save(&mut self, bytes: &[u8], format: OutputFormat, suggested_name: &str) -> ShareOutcome {
        let file_name = format!("{}.{}", suggested_name, format.extension());
        match self.platform.save_file(bytes, &file_name) {
            Ok(path) => ShareOutcome::Saved(path),
            Err(e) => {
                tracing::warn!(error = %e, "save failed");
                ShareOutcome::Failed(e.to_string())
            }
        }
    }

    /// Share encoded bytes, falling back native share -> clipboard -> save.
    pub fn share(
        &mut self,
        bytes: &[u8],
        format: OutputFormat,
        meta: &ShareMetadata,
    ) -> ShareOutcome {
        match self.platform.native_share(bytes, format, meta) {
            Ok(()) => return ShareOutcome::Shared,
            Err(e) => {
                tracing::debug!(error = %e, "native share unavailable, trying clipboard");
            }
        }
        match self.platform.clipboard_write(bytes, format) {
            Ok(()) => return ShareOutcome::Copied,
            Err(e) => {
                tracing::debug!(error = %e, "clipboard write failed, trying save");
            }
        }
        self.save(bytes, format, &meta.suggested_name)
    }
}

/// Desktop platform: saves into a directory, copies via the system clipboard.
///
/// There is no portable native-share target on a desktop host, so
/// `native_share` always reports unsupported and the fallback chain carries
/// the behavior. A mobile or web shell supplies its own [`SharePlatform`].
#[derive(Debug)]
pub struct SystemPlatform {
    output_dir: PathBuf,
}

impl SystemPlatform {
    /// Platform writing saved files under `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Directory saved files land in.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl SharePlatform for SystemPlatform {
    fn native_share(
        &mut self,
        _bytes: &[u8],
        _format: OutputFormat,
        _meta: &ShareMetadata,
    ) -> TryonResult<()> {
        Err(TryonError::share("no native share target on this platform"))
    }

    fn clipboard_write(&mut self, bytes: &[u8], _format: OutputFormat) -> TryonResult<()> {
        // arboard wants raw RGBA, so decode the encoded bytes back out.
        let img = image::load_from_memory(bytes)
            .map_err(|e| TryonError::share(format!("decode for clipboard: {e}")))?
            .to_rgba8();
        let (width, height) = img.dimensions();

        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| TryonError::share(format!("open clipboard: {e}")))?;
        clipboard
            .set_image(arboard::ImageData {
                width: width as usize,
                height: height as usize,
                bytes: std::borrow::Cow::Owned(img.into_raw()),
            })
            .map_err(|e| TryonError::share(format!("write clipboard image: {e}")))?;
        Ok(())
    }

    fn save_file(&mut self, bytes: &[u8], file_name: &str) -> TryonResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("create output dir '{}'", self.output_dir.display()))
            .map_err(|e| TryonError::export(e.to_string()))?;
        let path = self.output_dir.join(file_name);
        std::fs::write(&path, bytes)
            .with_context(|| format!("write '{}'", path.display()))
            .map_err(|e| TryonError::export(e.to_string()))?;
        Ok(path)
    }
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
