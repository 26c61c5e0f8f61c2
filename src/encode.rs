use std::io::Cursor;

use image::{ImageEncoder, codecs::jpeg::JpegEncoder, codecs::png::PngEncoder};

use crate::foundation::{
    core::{OutputFormat, RasterImage},
    error::{TryonError, TryonResult},
};

/// Encode a raster into the requested output format.
///
/// Pure function of its arguments: the same raster and format always produce
/// byte-identical output. JPEG drops the alpha channel (the composed canvas
/// is opaque anyway); PNG keeps RGBA.
pub fn encode(raster: &RasterImage, format: OutputFormat) -> TryonResult<Vec<u8>> {
    let mut out = Vec::new();
    match format {
        OutputFormat::Jpeg { quality } => {
            if quality == 0 || quality > 100 {
                return Err(TryonError::validation("jpeg quality must be in 1..=100"));
            }
            let rgb = strip_alpha(raster.rgba8());
            JpegEncoder::new_with_quality(Cursor::new(&mut out), quality)
                .write_image(
                    &rgb,
                    raster.width(),
                    raster.height(),
                    image::ExtendedColorType::Rgb8,
                )
                .map_err(|e| TryonError::composition(format!("jpeg encode: {e}")))?;
        }
        OutputFormat::Png => {
            PngEncoder::new(Cursor::new(&mut out))
                .write_image(
                    raster.rgba8(),
                    raster.width(),
                    raster.height(),
                    image::ExtendedColorType::Rgba8,
                )
                .map_err(|e| TryonError::composition(format!("png encode: {e}")))?;
        }
    }
    Ok(out)
}

fn strip_alpha(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
    }
    rgb
}

#[cfg(test)]
#[path = "../tests/unit/encode.rs"]
mod tests;
