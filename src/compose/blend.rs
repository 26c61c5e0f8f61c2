use crate::{
    compose::params::BlendMode,
    foundation::error::{TryonError, TryonResult},
    foundation::math::mul_div255_u8,
};

/// Straight-alpha RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Multiply-blend `src` over an opaque `dst` pixel.
///
/// Effective source alpha is `src.a * opacity`; the result stays opaque.
/// At zero effective alpha this is a no-op; at full alpha, each channel is
/// the product `src * dst / 255`.
pub fn multiply(dst: Rgba8, src: Rgba8, opacity: u8) -> Rgba8 {
    let sa = mul_div255_u8(u16::from(src[3]), u16::from(opacity));
    if sa == 0 {
        return [dst[0], dst[1], dst[2], 255];
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let product = mul_div255_u8(u16::from(src[i]), u16::from(dst[i]));
        let kept = mul_div255_u8(u16::from(dst[i]), inv);
        let added = mul_div255_u8(u16::from(product), u16::from(sa));
        out[i] = kept.saturating_add(added);
    }
    out[3] = 255;
    out
}

/// Source-over blend of `src` onto an opaque `dst` pixel.
pub fn over(dst: Rgba8, src: Rgba8, opacity: u8) -> Rgba8 {
    let sa = mul_div255_u8(u16::from(src[3]), u16::from(opacity));
    if sa == 0 {
        return [dst[0], dst[1], dst[2], 255];
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let kept = mul_div255_u8(u16::from(dst[i]), inv);
        let added = mul_div255_u8(u16::from(src[i]), u16::from(sa));
        out[i] = kept.saturating_add(added);
    }
    out[3] = 255;
    out
}

/// Blend one pixel with the given mode.
pub fn blend_pixel(mode: BlendMode, dst: Rgba8, src: Rgba8, opacity: u8) -> Rgba8 {
    match mode {
        BlendMode::Multiply => multiply(dst, src, opacity),
        BlendMode::Over => over(dst, src, opacity),
    }
}

/// Blend a source span onto a destination span of equal length in place.
pub fn blend_span_in_place(
    mode: BlendMode,
    dst: &mut [u8],
    src: &[u8],
    opacity: u8,
) -> TryonResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(TryonError::composition(
            "blend_span_in_place expects equal-length rgba8 spans",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = blend_pixel(mode, [d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/compose/blend.rs"]
mod tests;
