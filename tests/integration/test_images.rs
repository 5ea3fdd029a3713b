//! In-memory image fixtures.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, RgbaImage};
use std::io::Cursor;
use veriframe::upload::{ImageHandle, UploadFile};

/// Encode a diagonal gradient of the given size.
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

/// Encode a flat-colored JPEG.
pub fn solid_jpeg(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb(color));
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
}

pub fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format)
        .expect("Failed to encode fixture");
    buffer.into_inner()
}

pub fn png_upload(name: &str, width: u32, height: u32) -> UploadFile {
    UploadFile::new(name, "image/png", gradient_png(width, height))
}

pub fn png_handle(width: u32, height: u32) -> ImageHandle {
    ImageHandle::new("fixture.png", "image/png", gradient_png(width, height), width, height)
}

pub fn decode(data: &[u8]) -> RgbaImage {
    image::load_from_memory(data)
        .expect("Failed to decode output")
        .to_rgba8()
}
