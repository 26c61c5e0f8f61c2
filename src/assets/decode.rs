use std::io::Cursor;

use crate::foundation::{
    core::RasterImage,
    error::{TryonError, TryonResult},
};

/// Decode image bytes into a straight-alpha RGBA8 raster.
///
/// Dimensions are read from the header and checked against `max_dimension`
/// before the pixel data is decoded, so an oversized source is rejected
/// without allocating its full buffer.
pub fn decode_rgba8(bytes: &[u8], max_dimension: u32, source_id: &str) -> TryonResult<RasterImage> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| TryonError::decode(format!("'{source_id}': {e}")))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| TryonError::decode(format!("'{source_id}': {e}")))?;

    if width > max_dimension || height > max_dimension {
        return Err(TryonError::size(format!(
            "'{source_id}' is {width}x{height}, exceeds maximum dimension {max_dimension}"
        )));
    }

    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| TryonError::decode(format!("'{source_id}': {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    RasterImage::new(width, height, rgba.into_raw(), source_id)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
