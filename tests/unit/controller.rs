use std::io::Cursor;

use super::*;

fn png_source(width: u32, height: u32, rgba: [u8; 4]) -> ImageSource {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    ImageSource::from_bytes(buf)
}

async fn settle(controller: &mut CompositionController) -> CompositionState {
    loop {
        let state = controller.next_transition().await;
        match state {
            CompositionState::Ready(_) | CompositionState::Failed { .. } => return state,
            _ => continue,
        }
    }
}

#[test]
fn starts_idle_with_no_inputs() {
    let controller = CompositionController::default();
    assert_eq!(controller.state().name(), "idle");
    assert_eq!(controller.current_request(), RequestId(0));
}

#[tokio::test]
async fn single_input_stays_idle() {
    let mut controller = CompositionController::default();
    controller.set_photo(Some(png_source(4, 4, [1, 2, 3, 255])));
    assert_eq!(controller.state().name(), "idle");
    assert_eq!(controller.current_request(), RequestId(1));
}

#[tokio::test]
async fn setting_the_same_source_does_not_reissue() {
    let mut controller = CompositionController::default();
    let photo = png_source(4, 4, [1, 2, 3, 255]);
    controller.set_photo(Some(photo.clone()));
    let id = controller.current_request();
    controller.set_photo(Some(photo));
    assert_eq!(controller.current_request(), id);
}

#[tokio::test]
async fn both_inputs_enter_loading_then_ready() {
    let mut controller = CompositionController::default();
    controller.set_photo(Some(png_source(20, 30, [200, 180, 160, 255])));
    controller.set_garment(Some(png_source(10, 14, [40, 40, 120, 255])));
    assert_eq!(controller.state().name(), "loading");

    let composing = controller.next_transition().await;
    assert_eq!(composing.name(), "composing");

    let ready = controller.next_transition().await;
    let CompositionState::Ready(result) = ready else {
        panic!("expected ready, got {}", ready.name());
    };
    assert_eq!((result.width, result.height), (20, 30));
    assert_eq!(result.request, controller.current_request());
    assert!(controller.result().is_some());
}

#[tokio::test]
async fn clearing_an_input_returns_to_idle() {
    let mut controller = CompositionController::default();
    controller.set_photo(Some(png_source(8, 8, [9, 9, 9, 255])));
    controller.set_garment(Some(png_source(4, 4, [1, 1, 1, 255])));
    assert_eq!(controller.state().name(), "loading");

    controller.set_garment(None);
    assert_eq!(controller.state().name(), "idle");

    // The orphaned pipeline may still finish; its events must change nothing.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(!controller.pump());
    assert_eq!(controller.state().name(), "idle");
}

#[tokio::test]
async fn decode_failure_reaches_failed_never_ready() {
    let mut controller = CompositionController::default();
    controller.set_photo(Some(png_source(8, 8, [9, 9, 9, 255])));
    controller.set_garment(Some(ImageSource::from_bytes(b"not an image".to_vec())));

    let state = settle(&mut controller).await;
    let CompositionState::Failed {
        reason, request, ..
    } = state
    else {
        panic!("expected failed, got {}", state.name());
    };
    assert_eq!(reason, ErrorKind::Decode);
    assert_eq!(request, controller.current_request());
    assert!(controller.result().is_none());
}

#[tokio::test]
async fn retry_reissues_under_a_fresh_generation() {
    let mut controller = CompositionController::default();
    controller.set_photo(Some(png_source(8, 8, [9, 9, 9, 255])));
    controller.set_garment(Some(ImageSource::from_bytes(b"junk".to_vec())));
    settle(&mut controller).await;

    let failed_id = controller.current_request();
    controller.retry();
    assert_eq!(controller.state().name(), "loading");
    assert!(controller.current_request() > failed_id);

    // Same inputs still fail, but under the new generation.
    let state = settle(&mut controller).await;
    assert!(state.is_failed());
}

#[tokio::test]
async fn failed_controller_accepts_new_inputs() {
    let mut controller = CompositionController::default();
    controller.set_photo(Some(png_source(12, 12, [100, 100, 100, 255])));
    controller.set_garment(Some(ImageSource::from_bytes(b"junk".to_vec())));
    settle(&mut controller).await;

    controller.set_garment(Some(png_source(6, 6, [30, 30, 30, 255])));
    let state = settle(&mut controller).await;
    assert!(state.is_ready());
}

#[tokio::test]
async fn superseded_request_is_never_surfaced() {
    let mut controller = CompositionController::default();
    controller.set_photo(Some(png_source(10, 10, [50, 50, 50, 255])));
    controller.set_garment(Some(png_source(5, 5, [10, 10, 10, 255])));
    // Supersede before the first generation can finish.
    controller.set_photo(Some(png_source(24, 36, [80, 80, 80, 255])));
    let final_id = controller.current_request();

    let state = settle(&mut controller).await;
    let CompositionState::Ready(result) = state else {
        panic!("expected ready, got {}", state.name());
    };
    assert_eq!(result.request, final_id);
    assert_eq!((result.width, result.height), (24, 36));

    // Whatever the superseded generation produced is dropped on arrival.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(!controller.pump());
    assert_eq!(controller.result().unwrap().request, final_id);
}

#[tokio::test]
async fn set_params_validates_and_recomposes() {
    let mut controller = CompositionController::default();

    let mut bad = OverlayParams::default();
    bad.blend_alpha = 2.0;
    assert!(controller.set_params(bad).is_err());

    controller.set_photo(Some(png_source(16, 16, [120, 120, 120, 255])));
    controller.set_garment(Some(png_source(8, 8, [60, 60, 60, 255])));
    settle(&mut controller).await;

    let before = controller.current_request();
    let mut narrower = OverlayParams::default();
    narrower.garment_width_fraction = 0.5;
    controller.set_params(narrower).unwrap();
    assert!(controller.current_request() > before);
    assert_eq!(controller.state().name(), "loading");

    let state = settle(&mut controller).await;
    assert!(state.is_ready());
}
