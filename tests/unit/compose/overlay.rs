use super::*;
use crate::compose::params::BlendMode;

fn solid_raster(width: u32, height: u32, rgba: [u8; 4], id: &str) -> RasterImage {
    let px: Vec<u8> = rgba
        .iter()
        .copied()
        .cycle()
        .take((width as usize) * (height as usize) * 4)
        .collect();
    RasterImage::new(width, height, px, id).unwrap()
}

#[test]
fn output_has_photo_dimensions() {
    let photo = solid_raster(100, 150, [200, 180, 160, 255], "photo");
    let garment = solid_raster(50, 70, [40, 40, 120, 255], "garment");
    let out = compose(&photo, &garment, &OverlayParams::default()).unwrap();
    assert_eq!((out.width(), out.height()), (100, 150));
}

#[test]
fn compose_is_deterministic() {
    let photo = solid_raster(64, 96, [210, 170, 150, 255], "photo");
    let garment = solid_raster(30, 40, [20, 60, 100, 200], "garment");
    let params = OverlayParams::default();

    let a = compose(&photo, &garment, &params).unwrap();
    let b = compose(&photo, &garment, &params).unwrap();
    assert_eq!(a.rgba8(), b.rgba8());
}

#[test]
fn no_state_leaks_between_composes() {
    let photo = solid_raster(64, 96, [210, 170, 150, 255], "photo");
    let garment = solid_raster(30, 40, [20, 60, 100, 200], "garment");

    let baseline = compose(&photo, &garment, &OverlayParams::default()).unwrap();

    // An unrelated compose with different mode and alpha in between.
    let mut other = OverlayParams::default();
    other.blend = BlendMode::Over;
    other.blend_alpha = 1.0;
    let _ = compose(&photo, &garment, &other).unwrap();

    let again = compose(&photo, &garment, &OverlayParams::default()).unwrap();
    assert_eq!(baseline.rgba8(), again.rgba8());
}

#[test]
fn tall_garment_is_clipped_not_an_error() {
    let photo = solid_raster(50, 50, [255, 255, 255, 255], "photo");
    // Scales to 40 wide and 400 tall; most of it lands past the bottom.
    let garment = solid_raster(10, 100, [0, 0, 0, 255], "garment");
    let out = compose(&photo, &garment, &OverlayParams::default()).unwrap();
    assert_eq!((out.width(), out.height()), (50, 50));
}

#[test]
fn off_canvas_garment_leaves_photo_intact() {
    let photo = solid_raster(40, 40, [90, 90, 90, 255], "photo");
    let garment = solid_raster(10, 10, [0, 0, 0, 255], "garment");
    let mut params = OverlayParams::default();
    params.vertical_anchor_fraction = 2.0;

    let out = compose(&photo, &garment, &params).unwrap();
    for px in out.rgba8().chunks_exact(4) {
        assert_eq!(px, &[90, 90, 90, 255]);
    }
}

#[test]
fn zero_alpha_overlay_equals_opaque_photo() {
    let photo = solid_raster(40, 40, [90, 90, 90, 128], "photo");
    let garment = solid_raster(10, 10, [0, 0, 0, 255], "garment");
    let mut params = OverlayParams::default();
    params.blend_alpha = 0.0;

    let out = compose(&photo, &garment, &params).unwrap();
    // Base layer is forced opaque; colors untouched at zero alpha.
    for px in out.rgba8().chunks_exact(4) {
        assert_eq!(px, &[90, 90, 90, 255]);
    }
}

#[test]
fn multiply_darkens_the_overlay_region() {
    let photo = solid_raster(100, 100, [200, 200, 200, 255], "photo");
    let garment = solid_raster(50, 50, [50, 50, 50, 255], "garment");
    let out = compose(&photo, &garment, &OverlayParams::default()).unwrap();

    // Center of the overlay: darker than the base.
    let cx = 50usize;
    let cy = 40usize;
    let center = &out.rgba8()[(cy * 100 + cx) * 4..][..4];
    assert!(center[0] < 200);

    // Top-left corner is outside the overlay: untouched.
    assert_eq!(&out.rgba8()[..4], &[200, 200, 200, 255]);
}
