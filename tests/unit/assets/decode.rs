use std::io::Cursor;

use super::*;

#[test]
fn decode_image_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8, 1, 2, 3, 255];
    let img = image::RgbaImage::from_raw(2, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.dimensions(), (2, 1));
    assert_eq!(
        prepared.rgba8_premul(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8,
            1,
            2,
            3,
            255
        ]
    );
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_image(b"definitely not an image").is_err());
}

#[test]
fn each_resource_gets_a_fresh_id() {
    let a = from_rgba_image(image::RgbaImage::new(1, 1)).unwrap();
    let b = from_rgba_image(image::RgbaImage::new(1, 1)).unwrap();
    assert_ne!(a.id(), b.id());
}

#[test]
fn empty_images_are_rejected() {
    assert!(ImageResource::from_premul_rgba8(0, 4, vec![]).is_err());
    assert!(ImageResource::from_premul_rgba8(1, 1, vec![0; 3]).is_err());
}
