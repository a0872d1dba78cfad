//! CLIP image preprocessing.
//!
//! Mirrors the reference `CLIPImageProcessor`: shortest side resized to the
//! input size, center crop, rescale to `[0, 1]`, per-channel mean/std.

use image::DynamicImage;
use image::imageops::FilterType;

use crate::constants::{CLIP_IMAGE_MEAN, CLIP_IMAGE_STD};

/// Converts an image into normalized `(3, size, size)` pixel values (channel-major).
pub fn pixel_values(image: &DynamicImage, size: usize) -> Vec<f32> {
    let side = size as u32;
    let rgb = image
        .resize_to_fill(side, side, FilterType::CatmullRom)
        .to_rgb8();

    let plane = size * size;
    let mut values = vec![0.0f32; 3 * plane];

    for (idx, pixel) in rgb.pixels().enumerate() {
        for channel in 0..3 {
            let scaled = pixel.0[channel] as f32 / 255.0;
            values[channel * plane + idx] =
                (scaled - CLIP_IMAGE_MEAN[channel]) / CLIP_IMAGE_STD[channel];
        }
    }

    values
}

/// Stable digest of an image's decoded RGB content (dimensions included).
pub fn image_digest(image: &DynamicImage) -> blake3::Hash {
    let rgb = image.to_rgb8();
    let mut hasher = blake3::Hasher::new();
    hasher.update(&rgb.width().to_le_bytes());
    hasher.update(&rgb.height().to_le_bytes());
    hasher.update(rgb.as_raw());
    hasher.finalize()
}
