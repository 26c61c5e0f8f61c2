use crate::compose::params::OverlayParams;

/// Pixel-space placement of the scaled garment on the output canvas.
///
/// The origin may lie outside the canvas (negative, or past the far edge);
/// drawing clips to canvas bounds rather than failing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayPlacement {
    /// Left edge of the garment in canvas coordinates.
    pub x: i64,
    /// Top edge of the garment in canvas coordinates.
    pub y: i64,
    /// Scaled garment width in pixels, >= 1.
    pub width: u32,
    /// Scaled garment height in pixels, >= 1.
    pub height: u32,
}

/// Resolve where the garment lands on a photo of the given size.
///
/// Aspect-preserving: `width = photo_w * garment_width_fraction`, height
/// follows the garment's aspect ratio. Horizontally centered, top anchored
/// at `photo_h * vertical_anchor_fraction`. Sizes round to the nearest pixel
/// (minimum 1) so the math is deterministic and matches integer rasters.
pub fn resolve_placement(
    photo_w: u32,
    photo_h: u32,
    garment_w: u32,
    garment_h: u32,
    params: &OverlayParams,
) -> OverlayPlacement {
    let target_w = f64::from(photo_w) * f64::from(params.garment_width_fraction);
    let target_h = f64::from(garment_h) * target_w / f64::from(garment_w);

    let x = (f64::from(photo_w) - target_w) / 2.0;
    let y = f64::from(photo_h) * f64::from(params.vertical_anchor_fraction);

    OverlayPlacement {
        x: round_coord(x),
        y: round_coord(y),
        width: round_size(target_w),
        height: round_size(target_h),
    }
}

fn round_coord(v: f64) -> i64 {
    if v.is_finite() {
        v.round().clamp(i64::MIN as f64, i64::MAX as f64) as i64
    } else {
        0
    }
}

fn round_size(v: f64) -> u32 {
    if v.is_finite() {
        (v.round().clamp(1.0, f64::from(u32::MAX))) as u32
    } else {
        1
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/placement.rs"]
mod tests;
