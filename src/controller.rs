use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    assets::loader::AssetLoader,
    compose::overlay,
    compose::params::OverlayParams,
    encode,
    export::{ShareAdapter, ShareMetadata, ShareOutcome, SharePlatform},
    foundation::core::{ImageSource, OutputFormat, RasterImage, RequestId},
    foundation::error::{ErrorKind, TryonError, TryonResult},
};

/// One composition generation: both inputs plus the id that owns them.
///
/// A request is never mutated; changing an input supersedes it with a new
/// request under a fresh id, and whatever the old one eventually produces is
/// discarded on arrival.
#[derive(Clone, Debug)]
pub struct CompositionRequest {
    /// Photo source for this generation.
    pub photo: ImageSource,
    /// Garment source for this generation.
    pub garment: ImageSource,
    /// Generation id the eventual result must match.
    pub request: RequestId,
}

/// A finished composition ready for export.
#[derive(Clone, Debug)]
pub struct CompositionResult {
    /// Encoded image bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Format (and quality) the bytes are encoded in.
    pub format: OutputFormat,
    /// Generation this result answers.
    pub request: RequestId,
}

impl CompositionResult {
    /// Save this result through the given adapter.
    pub fn save_with<P: SharePlatform>(
        &self,
        adapter: &mut ShareAdapter<P>,
        suggested_name: &str,
    ) -> ShareOutcome {
        adapter.save(&self.bytes, self.format, suggested_name)
    }

    /// Share this result through the given adapter's fallback chain.
    pub fn share_with<P: SharePlatform>(
        &self,
        adapter: &mut ShareAdapter<P>,
        meta: &ShareMetadata,
    ) -> ShareOutcome {
        adapter.share(&self.bytes, self.format, meta)
    }
}

/// Controller lifecycle state. Exactly one per controller at any time.
#[derive(Clone, Debug)]
pub enum CompositionState {
    /// Photo and/or garment absent.
    Idle,
    /// Both inputs present, waiting on asset loads.
    Loading,
    /// Both rasters decoded, compose and encode running.
    Composing,
    /// Holds the current result.
    Ready(CompositionResult),
    /// A load or compose step failed for the owning request.
    Failed {
        /// Which taxonomy kind failed.
        reason: ErrorKind,
        /// Human-readable failure detail.
        message: String,
        /// The generation that failed.
        request: RequestId,
    },
}

impl CompositionState {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Composing => "composing",
            Self::Ready(_) => "ready",
            Self::Failed { .. } => "failed",
        }
    }

    /// True when a result is held.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// True for the failure state.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[derive(Debug)]
enum PipelineEvent {
    Decoded {
        request: RequestId,
    },
    Finished {
        request: RequestId,
        outcome: TryonResult<CompositionResult>,
    },
}

/// Orchestrates load, compose, and encode behind a small state machine.
///
/// Single-threaded and event-driven: pipeline tasks run concurrently, but
/// every state transition happens on the caller's thread of control when it
/// drains events via [`pump`](Self::pump) or
/// [`next_transition`](Self::next_transition). Superseded work is never
/// forcefully cancelled; its events arrive tagged with a stale id and are
/// silently dropped, so the controller never observably mixes generations.
///
/// Requires a running tokio runtime for spawned pipeline work.
#[derive(Debug)]
pub struct CompositionController {
    loader: AssetLoader,
    params: OverlayParams,
    format: OutputFormat,
    photo: Option<ImageSource>,
    garment: Option<ImageSource>,
    current: RequestId,
    state: CompositionState,
    tx: mpsc::UnboundedSender<PipelineEvent>,
    rx: mpsc::UnboundedReceiver<PipelineEvent>,
}

impl Default for CompositionController {
    fn default() -> Self {
        Self::new(
            AssetLoader::default(),
            OverlayParams::default(),
            OutputFormat::default(),
        )
    }
}

impl CompositionController {
    /// Build a controller over the given loader, overlay params, and format.
    pub fn new(loader: AssetLoader, params: OverlayParams, format: OutputFormat) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            loader,
            params,
            format,
            photo: None,
            garment: None,
            current: RequestId(0),
            state: CompositionState::Idle,
            tx,
            rx,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &CompositionState {
        &self.state
    }

    /// Current result, if in `Ready`.
    pub fn result(&self) -> Option<&CompositionResult> {
        match &self.state {
            CompositionState::Ready(result) => Some(result),
            _ => None,
        }
    }

    /// Generation id in-flight results must match to be surfaced.
    pub fn current_request(&self) -> RequestId {
        self.current
    }

    /// Overlay parameters in effect.
    pub fn params(&self) -> &OverlayParams {
        &self.params
    }

    /// Set or clear the photo input. A change supersedes in-flight work.
    pub fn set_photo(&mut self, photo: Option<ImageSource>) {
        if same_source(&self.photo, &photo) {
            return;
        }
        self.photo = photo;
        self.reissue();
    }

    /// Set or clear the garment input. A change supersedes in-flight work.
    pub fn set_garment(&mut self, garment: Option<ImageSource>) {
        if same_source(&self.garment, &garment) {
            return;
        }
        self.garment = garment;
        self.reissue();
    }

    /// Replace overlay parameters, recomposing if both inputs are present.
    pub fn set_params(&mut self, params: OverlayParams) -> TryonResult<()> {
        params.validate()?;
        self.params = params;
        self.reissue();
        Ok(())
    }

    /// Re-issue the current inputs under a fresh generation after a failure.
    ///
    /// No-op unless the controller is in `Failed` with both inputs present.
    pub fn retry(&mut self) {
        if self.state.is_failed() {
            self.reissue();
        }
    }

    /// Drain pending pipeline events without blocking.
    ///
    /// Returns true when the state changed. Stale events are dropped.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.rx.try_recv() {
            changed |= self.apply(event);
        }
        changed
    }

    /// Wait for the next state transition and return the new state.
    ///
    /// Stale events are consumed and skipped. Only call while a request is
    /// in flight; with no pending work this waits indefinitely.
    pub async fn next_transition(&mut self) -> CompositionState {
        loop {
            let Some(event) = self.rx.recv().await else {
                return self.state.clone();
            };
            if self.apply(event) {
                return self.state.clone();
            }
        }
    }

    fn reissue(&mut self) {
        self.current = self.current.next();
        match (&self.photo, &self.garment) {
            (Some(photo), Some(garment)) => {
                let request = CompositionRequest {
                    photo: photo.clone(),
                    garment: garment.clone(),
                    request: self.current,
                };
                self.spawn_pipeline(request);
                self.state = CompositionState::Loading;
            }
            _ => {
                self.state = CompositionState::Idle;
            }
        }
    }

    fn apply(&mut self, event: PipelineEvent) -> bool {
        match event {
            PipelineEvent::Decoded { request } => {
                if request != self.current {
                    tracing::debug!(?request, current = ?self.current, "discarding stale decode event");
                    return false;
                }
                if matches!(self.state, CompositionState::Loading) {
                    self.state = CompositionState::Composing;
                    return true;
                }
                false
            }
            PipelineEvent::Finished { request, outcome } => {
                if request != self.current {
                    tracing::debug!(?request, current = ?self.current, "discarding stale result");
                    return false;
                }
                match outcome {
                    Ok(result) => {
                        self.state = CompositionState::Ready(result);
                    }
                    Err(e) => {
                        tracing::warn!(?request, error = %e, "composition request failed");
                        self.state = CompositionState::Failed {
                            reason: e.kind(),
                            message: e.to_string(),
                            request,
                        };
                    }
                }
                true
            }
        }
    }

    fn spawn_pipeline(&self, request: CompositionRequest) {
        let loader = self.loader.clone();
        let params = self.params;
        let format = self.format;
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let CompositionRequest {
                photo,
                garment,
                request,
            } = request;

            // Two independent loads, joined; either side may fail alone.
            let loaded = tokio::join!(loader.load(&photo), loader.load(&garment));
            let (photo_raster, garment_raster) = match loaded {
                (Ok(p), Ok(g)) => (p, g),
                (Err(e), _) | (_, Err(e)) => {
                    let _ = tx.send(PipelineEvent::Finished {
                        request,
                        outcome: Err(e),
                    });
                    return;
                }
            };

            let _ = tx.send(PipelineEvent::Decoded { request });

            let outcome =
                run_compose_encode(photo_raster, garment_raster, params, format, request).await;
            let _ = tx.send(PipelineEvent::Finished { request, outcome });
        });
    }
}

async fn run_compose_encode(
    photo: RasterImage,
    garment: RasterImage,
    params: OverlayParams,
    format: OutputFormat,
    request: RequestId,
) -> TryonResult<CompositionResult> {
    // Compose and encode are CPU-bound; keep them off the async thread.
    tokio::task::spawn_blocking(move || {
        let canvas = overlay::compose(&photo, &garment, &params)?;
        let bytes = encode::encode(&canvas, format)?;
        Ok(CompositionResult {
            bytes: Arc::new(bytes),
            width: canvas.width(),
            height: canvas.height(),
            format,
            request,
        })
    })
    .await
    .map_err(|e| TryonError::Other(anyhow::anyhow!("compose task failed: {e}")))?
}

fn same_source(a: &Option<ImageSource>, b: &Option<ImageSource>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(ImageSource::Bytes(x)), Some(ImageSource::Bytes(y))) => Arc::ptr_eq(x, y),
        (Some(ImageSource::Path(x)), Some(ImageSource::Path(y))) => x == y,
        (Some(ImageSource::Url(x)), Some(ImageSource::Url(y))) => x == y,
        _ => false,
    }
}

#[cfg(test)]
#[path = "../tests/unit/controller.rs"]
mod tests;
