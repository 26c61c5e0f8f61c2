use crate::foundation::error::{TryonError, TryonResult};

/// Blend mode used when drawing the garment over the photo.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BlendMode {
    /// Per-channel multiplication of garment and photo. Darkens the base,
    /// which reads as fabric laid over the body.
    #[default]
    Multiply,
    /// Standard source-over alpha compositing.
    Over,
}

fn default_garment_width_fraction() -> f32 {
    0.8
}

fn default_vertical_anchor_fraction() -> f32 {
    0.15
}

fn default_blend_alpha() -> f32 {
    0.7
}

/// Fixed placement heuristic for the garment overlay.
///
/// The defaults (80% of photo width, anchored 15% down, multiply at 0.7
/// alpha) are the documented heuristic, not derived from any pose signal;
/// pose-aware placement is explicitly out of scope.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct OverlayParams {
    /// Garment target width as a fraction of the photo width.
    #[serde(default = "default_garment_width_fraction")]
    pub garment_width_fraction: f32,
    /// Vertical offset of the garment top as a fraction of the photo height.
    #[serde(default = "default_vertical_anchor_fraction")]
    pub vertical_anchor_fraction: f32,
    /// Blend mode for the overlay draw.
    #[serde(default)]
    pub blend: BlendMode,
    /// Overlay opacity in `[0, 1]`.
    #[serde(default = "default_blend_alpha")]
    pub blend_alpha: f32,
}

impl Default for OverlayParams {
    fn default() -> Self {
        Self {
            garment_width_fraction: default_garment_width_fraction(),
            vertical_anchor_fraction: default_vertical_anchor_fraction(),
            blend: BlendMode::default(),
            blend_alpha: default_blend_alpha(),
        }
    }
}

impl OverlayParams {
    /// Validate parameter ranges at the configuration seam.
    ///
    /// Compose itself stays total and clamps internally; this exists so a
    /// shell can reject nonsense before issuing a request.
    pub fn validate(&self) -> TryonResult<()> {
        if !self.garment_width_fraction.is_finite() || self.garment_width_fraction <= 0.0 {
            return Err(TryonError::validation(
                "garment_width_fraction must be finite and > 0",
            ));
        }
        if !self.vertical_anchor_fraction.is_finite() {
            return Err(TryonError::validation(
                "vertical_anchor_fraction must be finite",
            ));
        }
        if !self.blend_alpha.is_finite() || !(0.0..=1.0).contains(&self.blend_alpha) {
            return Err(TryonError::validation("blend_alpha must be in [0, 1]"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/params.rs"]
mod tests;
