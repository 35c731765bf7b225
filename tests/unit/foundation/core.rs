use super::*;

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0).is_err());
    assert_eq!(Fps::new(24).unwrap().get(), 24);
    assert_eq!(Fps::default().get(), 24);
}

#[test]
fn fps_frames_to_secs() {
    let fps = Fps::new(24).unwrap();
    assert_eq!(fps.frames_to_secs(120), 5.0);
}

#[test]
fn canvas_center_is_half_extent() {
    let c = Canvas::new(64, 33).unwrap();
    assert_eq!(c.center(), Point::new(32.0, 16.5));
    assert_eq!(c.pixel_count(), 64 * 33);
    assert!(!c.is_even());
}

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
}
