//! Image handling for the NPU pipelines.
//!
//! Wraps the `image` crate to decode camera/still images into `Tensor<T>`
//! from `npu-base`, scale them to a model's fixed input size, and encode
//! result maps (e.g. depth) back to PNG.
//!
//! All image tensors use HWC layout: `[height, width, channels]`.

pub mod error;
pub mod image;

pub use error::ImageError;
pub use image::Image;

use crates_image::{DynamicImage, ExtendedColorType, ImageEncoder, imageops::FilterType};
use npu_base::Tensor;

fn to_tensor<T>(
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<T>,
) -> Result<Tensor<T>, ImageError> {
    let shape = vec![height as usize, width as usize, channels];
    Ok(Tensor::new(shape, data)?)
}

fn decode_image_inner(data: &[u8]) -> Result<Image, ImageError> {
    let img = crates_image::load_from_memory(data)?;

    match img {
        DynamicImage::ImageLuma8(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::U8(to_tensor(w, h, 1, buf.into_raw())?))
        }
        DynamicImage::ImageLumaA8(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::U8(to_tensor(w, h, 2, buf.into_raw())?))
        }
        DynamicImage::ImageRgb8(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::U8(to_tensor(w, h, 3, buf.into_raw())?))
        }
        DynamicImage::ImageRgba8(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::U8(to_tensor(w, h, 4, buf.into_raw())?))
        }
        DynamicImage::ImageLuma16(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::U16(to_tensor(w, h, 1, buf.into_raw())?))
        }
        DynamicImage::ImageRgb16(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::U16(to_tensor(w, h, 3, buf.into_raw())?))
        }
        DynamicImage::ImageRgba16(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::U16(to_tensor(w, h, 4, buf.into_raw())?))
        }
        DynamicImage::ImageRgb32F(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Image::F32(to_tensor(w, h, 3, buf.into_raw())?))
        }
        _ => {
            let rgb = img.to_rgb8();
            let (w, h) = rgb.dimensions();
            Ok(Image::U8(to_tensor(w, h, 3, rgb.into_raw())?))
        }
    }
}

/// Decodes an image from raw bytes.
///
/// The format is auto-detected by the `image` crate and the source precision
/// is preserved (u8, u16, or f32). The CPU-bound work runs on tokio's
/// blocking thread pool.
///
/// # Errors
///
/// Returns `ImageError::Decode` if the data is invalid or the format is unsupported.
pub async fn decode_image(data: &[u8]) -> Result<Image, ImageError> {
    let owned = data.to_vec();
    tokio::task::spawn_blocking(move || decode_image_inner(&owned))
        .await
        .map_err(|e| ImageError::Decode(e.to_string()))?
}

fn check_rgb(image: &Tensor<u8>) -> Result<(usize, usize), ImageError> {
    match image.shape.as_slice() {
        &[h, w, 3] => Ok((h, w)),
        shape => Err(ImageError::Encode(format!(
            "expected [H, W, 3] RGB tensor, got {:?}",
            shape
        ))),
    }
}

/// Scale an RGB tensor to `width` x `height` with bilinear filtering.
///
/// Returns a copy when the image already has the requested size.
pub fn resize_rgb(
    image: &Tensor<u8>,
    width: usize,
    height: usize,
) -> Result<Tensor<u8>, ImageError> {
    let (h, w) = check_rgb(image)?;
    if (w, h) == (width, height) {
        return Ok(image.clone());
    }

    let buffer = crates_image::RgbImage::from_raw(w as u32, h as u32, image.data.clone())
        .ok_or_else(|| ImageError::Encode("RGB buffer does not match its shape".to_string()))?;
    let resized =
        crates_image::imageops::resize(&buffer, width as u32, height as u32, FilterType::Triangle);

    to_tensor(width as u32, height as u32, 3, resized.into_raw())
}

/// Encode a gray (`[H, W, 1]`) or RGB (`[H, W, 3]`) tensor as PNG.
pub fn encode_png(image: &Tensor<u8>) -> Result<Vec<u8>, ImageError> {
    let (height, width, color_type) = match image.shape.as_slice() {
        &[h, w, 1] => (h, w, ExtendedColorType::L8),
        &[h, w, 3] => (h, w, ExtendedColorType::Rgb8),
        shape => {
            return Err(ImageError::Encode(format!(
                "unsupported PNG tensor shape: {:?}",
                shape
            )));
        }
    };

    let mut buffer = Vec::new();
    crates_image::codecs::png::PngEncoder::new(&mut buffer)
        .write_image(&image.data, width as u32, height as u32, color_type)
        .map_err(|e| ImageError::Encode(e.to_string()))?;

    Ok(buffer)
}
