use std::io::Cursor;

use super::*;
use crate::foundation::core::Rgba8;

fn encode(img: image::RgbaImage, format: image::ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), format)
        .unwrap();
    buf
}

#[test]
fn decode_png_keeps_straight_alpha() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let bitmap = decode_bitmap(&encode(img, image::ImageFormat::Png)).unwrap();

    assert_eq!(bitmap.width, 1);
    assert_eq!(bitmap.height, 1);
    assert_eq!(bitmap.rgba8.as_slice(), &[100u8, 50, 200, 128]);
}

#[test]
fn decode_bmp_dimensions_and_pixels() {
    let mut img = image::RgbaImage::new(3, 2);
    img.put_pixel(2, 1, image::Rgba([10, 20, 30, 255]));
    let bitmap = decode_bitmap(&encode(img, image::ImageFormat::Bmp)).unwrap();

    assert_eq!((bitmap.width, bitmap.height), (3, 2));
    assert_eq!(bitmap.pixel(2, 1), Some(Rgba8::opaque(10, 20, 30)));
}

#[test]
fn decode_garbage_is_decode_error() {
    let err = decode_bitmap(b"not an image").unwrap_err();
    assert!(matches!(err, SkinampError::Decode(_)));
}
