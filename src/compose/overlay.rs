use image::imageops;

use crate::{
    compose::blend,
    compose::params::OverlayParams,
    compose::placement::{self, OverlayPlacement},
    foundation::core::RasterImage,
    foundation::error::{TryonError, TryonResult},
    foundation::math::alpha_to_u8,
};

/// Composite the garment over the photo into a fresh output raster.
///
/// Pure and deterministic: identical inputs and params produce byte-identical
/// output. Total for well-formed rasters: geometric overflow past the canvas
/// is clipped, never an error. Every call rasterizes into its own canvas, so
/// no blend state can leak between unrelated compositions.
///
/// The canvas takes the photo's dimensions with the photo as an opaque base
/// layer; the garment is scaled aspect-preserving to the placement computed
/// by [`placement::resolve_placement`] and drawn with the configured blend
/// mode and alpha.
#[tracing::instrument(skip_all, fields(photo = %photo.source_id(), garment = %garment.source_id()))]
pub fn compose(
    photo: &RasterImage,
    garment: &RasterImage,
    params: &OverlayParams,
) -> TryonResult<RasterImage> {
    let canvas_w = photo.width();
    let canvas_h = photo.height();

    // Base layer: the photo, forced opaque.
    let mut canvas = photo.rgba8().to_vec();
    for px in canvas.chunks_exact_mut(4) {
        px[3] = 255;
    }

    let place = placement::resolve_placement(
        canvas_w,
        canvas_h,
        garment.width(),
        garment.height(),
        params,
    );

    let scaled = scale_garment(garment, &place)?;
    draw_clipped(&mut canvas, canvas_w, canvas_h, &scaled, &place, params)?;

    RasterImage::new(
        canvas_w,
        canvas_h,
        canvas,
        format!("composite({}, {})", photo.source_id(), garment.source_id()),
    )
}

fn scale_garment(garment: &RasterImage, place: &OverlayPlacement) -> TryonResult<image::RgbaImage> {
    let src = image::RgbaImage::from_raw(
        garment.width(),
        garment.height(),
        garment.rgba8().to_vec(),
    )
    .ok_or_else(|| TryonError::composition("garment raster buffer shape mismatch"))?;

    if garment.width() == place.width && garment.height() == place.height {
        return Ok(src);
    }
    // Triangle (bilinear) keeps scaling deterministic across runs.
    Ok(imageops::resize(
        &src,
        place.width,
        place.height,
        imageops::FilterType::Triangle,
    ))
}

fn draw_clipped(
    canvas: &mut [u8],
    canvas_w: u32,
    canvas_h: u32,
    scaled: &image::RgbaImage,
    place: &OverlayPlacement,
    params: &OverlayParams,
) -> TryonResult<()> {
    let x0 = place.x.max(0);
    let y0 = place.y.max(0);
    let x1 = (place.x + i64::from(place.width)).min(i64::from(canvas_w));
    let y1 = (place.y + i64::from(place.height)).min(i64::from(canvas_h));
    if x0 >= x1 || y0 >= y1 {
        // Entirely off-canvas; the base photo is the result.
        return Ok(());
    }

    let opacity = alpha_to_u8(params.blend_alpha);
    let span_px = (x1 - x0) as usize;
    let src_x0 = (x0 - place.x) as usize;
    let src_buf: &[u8] = scaled.as_raw();
    let src_stride = place.width as usize * 4;

    for dy in y0..y1 {
        let sy = (dy - place.y) as usize;
        let dst_off = ((dy as usize) * (canvas_w as usize) + x0 as usize) * 4;
        let src_off = sy * src_stride + src_x0 * 4;
        blend::blend_span_in_place(
            params.blend,
            &mut canvas[dst_off..dst_off + span_px * 4],
            &src_buf[src_off..src_off + span_px * 4],
            opacity,
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/compose/overlay.rs"]
mod tests;
