use std::io::Cursor;

use super::*;
use crate::foundation::error::ErrorKind;

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_pixels() {
    let buf = png_bytes(2, 3, [100, 50, 200, 128]);

    let raster = decode_rgba8(&buf, 8192, "test.png").unwrap();
    assert_eq!(raster.width(), 2);
    assert_eq!(raster.height(), 3);
    assert_eq!(raster.source_id(), "test.png");
    assert_eq!(&raster.rgba8()[..4], &[100, 50, 200, 128]);
}

#[test]
fn decode_garbage_is_decode_error() {
    let err = decode_rgba8(b"definitely not an image", 8192, "junk").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn decode_oversized_is_size_error() {
    let buf = png_bytes(8, 2, [0, 0, 0, 255]);
    let err = decode_rgba8(&buf, 4, "big.png").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Size);
    assert!(err.to_string().contains("8x2"));
}
