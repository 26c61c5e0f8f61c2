use std::{sync::Arc, time::Duration};

use anyhow::Context;

use crate::{
    assets::decode,
    foundation::core::{ImageSource, RasterImage},
    foundation::error::{TryonError, TryonResult},
};

/// Bounds applied to every asset load.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct LoaderLimits {
    /// Maximum decoded width or height in pixels.
    pub max_dimension: u32,
    /// Wall-clock bound covering fetch plus decode.
    pub timeout: Duration,
}

impl Default for LoaderLimits {
    fn default() -> Self {
        Self {
            max_dimension: 8192,
            timeout: Duration::from_secs(15),
        }
    }
}

/// Fetches and decodes image sources into rasters.
///
/// Loads are independent: the loader holds no mutable state, so any number
/// of calls may run concurrently and fail without affecting each other.
#[derive(Clone, Debug)]
pub struct AssetLoader {
    limits: LoaderLimits,
    http: reqwest::Client,
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new(LoaderLimits::default())
    }
}

impl AssetLoader {
    /// Build a loader with the given limits.
    pub fn new(limits: LoaderLimits) -> Self {
        Self {
            limits,
            http: reqwest::Client::new(),
        }
    }

    /// Limits this loader applies.
    pub fn limits(&self) -> LoaderLimits {
        self.limits
    }

    /// Fetch and decode one source into a raster.
    ///
    /// Errors: [`TryonError::Decode`] for unrecognizable bytes,
    /// [`TryonError::Size`] past the dimension cap, [`TryonError::Timeout`]
    /// when fetch plus decode exceed the configured bound.
    #[tracing::instrument(skip(self, source), fields(source = %source.id()))]
    pub async fn load(&self, source: &ImageSource) -> TryonResult<RasterImage> {
        let source_id = source.id();
        match tokio::time::timeout(self.limits.timeout, self.fetch_and_decode(source, &source_id))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(TryonError::timeout(format!(
                "loading '{}' exceeded {:.1}s",
                source_id,
                self.limits.timeout.as_secs_f64()
            ))),
        }
    }

    async fn fetch_and_decode(
        &self,
        source: &ImageSource,
        source_id: &str,
    ) -> TryonResult<RasterImage> {
        let bytes: Arc<Vec<u8>> = match source {
            ImageSource::Bytes(bytes) => bytes.clone(),
            ImageSource::Path(path) => Arc::new(
                tokio::fs::read(path)
                    .await
                    .with_context(|| format!("read image bytes from '{}'", path.display()))
                    .map_err(TryonError::from)?,
            ),
            ImageSource::Url(url) => {
                let response = self
                    .http
                    .get(url)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .with_context(|| format!("fetch image from '{url}'"))
                    .map_err(TryonError::from)?;
                let body = response
                    .bytes()
                    .await
                    .with_context(|| format!("read image body from '{url}'"))
                    .map_err(TryonError::from)?;
                Arc::new(body.to_vec())
            }
        };

        // Decode is CPU-bound; keep it off the async thread.
        let max_dimension = self.limits.max_dimension;
        let id = source_id.to_string();
        tokio::task::spawn_blocking(move || decode::decode_rgba8(&bytes, max_dimension, &id))
            .await
            .map_err(|e| TryonError::Other(anyhow::anyhow!("decode task failed: {e}")))?
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
