use super::*;

#[test]
fn new_rejects_zero_dimensions() {
    let err = RasterImage::new(0, 4, PixelLayout::Rgb8, vec![]).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn new_rejects_mismatched_length() {
    let err = RasterImage::new(2, 2, PixelLayout::Rgba8, vec![0u8; 12]).unwrap_err();
    assert!(err.to_string().contains("does not match"));
}

#[test]
fn from_fn_addresses_pixels_row_major() {
    let img = RasterImage::from_fn(3, 2, PixelLayout::Rgb8, |x, y, px| {
        px[0] = x as u8;
        px[1] = y as u8;
        px[2] = 7;
    })
    .unwrap();
    assert_eq!(img.pixel(2, 1), &[2, 1, 7]);
    assert_eq!(img.pixel(0, 1), &[0, 1, 7]);
    assert_eq!(img.as_bytes().len(), 3 * 2 * 3);
}

#[test]
fn solid_checks_channel_count() {
    assert!(RasterImage::solid(4, 4, PixelLayout::Rgba8, &[1, 2, 3]).is_err());
    let img = RasterImage::solid(4, 4, PixelLayout::Rgba8, &[1, 2, 3, 4]).unwrap();
    assert_eq!(img.pixel(3, 3), &[1, 2, 3, 4]);
}

#[test]
fn dynamic_conversion_keeps_layout() {
    let rgb = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        5,
        3,
        image::Rgb([9, 8, 7]),
    ));
    let img = RasterImage::from_dynamic(rgb).unwrap();
    assert_eq!(img.layout(), PixelLayout::Rgb8);
    assert_eq!((img.width(), img.height()), (5, 3));

    let back = img.to_dynamic().unwrap();
    assert_eq!(back.to_rgb8().get_pixel(4, 2).0, [9, 8, 7]);

    let rgba = image::DynamicImage::ImageRgba8(image::RgbaImage::new(2, 2));
    assert_eq!(
        RasterImage::from_dynamic(rgba).unwrap().layout(),
        PixelLayout::Rgba8
    );
}
