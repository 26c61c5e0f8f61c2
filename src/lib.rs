//! Tryon is a client-side garment overlay compositor.
//!
//! It takes a user photo and a garment image, decodes both, places the
//! garment with a fixed documented heuristic, blends deterministically,
//! encodes the result (JPEG by default), and hands the bytes to save/share
//! delivery. Everything runs in-process; there is no server round trip and
//! no CLI surface.
//!
//! # Pipeline overview
//!
//! 1. **Load**: [`AssetLoader`] fetches and decodes each [`ImageSource`]
//!    into a [`RasterImage`] (concurrent per request, bounded by
//!    [`LoaderLimits`]).
//! 2. **Compose**: [`compose`] overlays the garment onto the photo — a pure
//!    function over two rasters and [`OverlayParams`].
//! 3. **Encode**: [`encode`] turns the canvas into bytes for an
//!    [`OutputFormat`].
//! 4. **Deliver**: [`ShareAdapter`] saves or shares the bytes, reporting a
//!    single [`ShareOutcome`].
//!
//! [`CompositionController`] orchestrates steps 1–3 behind a small state
//! machine with generation-counter staleness handling; delivery runs
//! independently against a `Ready` result.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: compose and encode are pure and
//!   byte-stable for a given input.
//! - **Fresh surface per compose**: no drawing state survives between calls.
//! - **Logical cancellation**: superseded work runs to completion and its
//!   result is discarded by request-id comparison, never preempted.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod compose;
mod controller;
mod encode;
mod export;
mod foundation;

pub use assets::decode::decode_rgba8;
pub use assets::loader::{AssetLoader, LoaderLimits};
pub use compose::blend::{Rgba8, blend_pixel, blend_span_in_place, multiply, over};
pub use compose::overlay::compose;
pub use compose::params::{BlendMode, OverlayParams};
pub use compose::placement::{OverlayPlacement, resolve_placement};
pub use controller::{
    CompositionController, CompositionRequest, CompositionResult, CompositionState,
};
pub use encode::encode;
pub use export::{ShareAdapter, ShareMetadata, ShareOutcome, SharePlatform, SystemPlatform};
pub use foundation::core::{ImageSource, OutputFormat, RasterImage, RequestId};
pub use foundation::error::{ErrorKind, TryonError, TryonResult};
