// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the CLIP ViT-B/32 vision tower

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::Array4;

/// Input resolution of the CLIP ViT-B/32 vision tower
pub const CLIP_INPUT_SIZE: u32 = 224;

/// CLIP normalization mean values
pub const CLIP_MEAN: [f32; 3] = [0.48145466, 0.4578275, 0.40821073];

/// CLIP normalization std values
pub const CLIP_STD: [f32; 3] = [0.26862954, 0.26130258, 0.27577711];

/// Preprocess an image for the CLIP vision encoder
///
/// Steps:
/// 1. Resize the shortest side to CLIP_INPUT_SIZE (bicubic)
/// 2. Center crop to CLIP_INPUT_SIZE x CLIP_INPUT_SIZE
/// 3. Convert to RGB
/// 4. Normalize: (pixel/255 - mean) / std
/// 5. Convert to NCHW tensor format [1, 3, H, W]
pub fn preprocess_for_clip(image: &DynamicImage) -> Array4<f32> {
    let cropped = resize_and_center_crop(image, CLIP_INPUT_SIZE);
    let rgb = cropped.to_rgb8();

    let size = CLIP_INPUT_SIZE as usize;
    let mut tensor = Array4::zeros((1, 3, size, size));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] =
                (pixel[c] as f32 / 255.0 - CLIP_MEAN[c]) / CLIP_STD[c];
        }
    }

    tensor
}

/// Resize so the shortest side equals `target_size`, then center crop a square
pub fn resize_and_center_crop(image: &DynamicImage, target_size: u32) -> DynamicImage {
    let (orig_w, orig_h) = image.dimensions();

    if orig_w == 0 || orig_h == 0 {
        return DynamicImage::ImageRgb8(RgbImage::from_pixel(
            target_size,
            target_size,
            Rgb([128, 128, 128]),
        ));
    }

    let (new_w, new_h) = shortest_side_dimensions(orig_w, orig_h, target_size);
    let resized = image.resize_exact(new_w, new_h, FilterType::CatmullRom);

    let crop_x = new_w.saturating_sub(target_size) / 2;
    let crop_y = new_h.saturating_sub(target_size) / 2;

    resized.crop_imm(crop_x, crop_y, target_size, target_size)
}

/// Output dimensions after scaling the shortest side to `target_size`
fn shortest_side_dimensions(width: u32, height: u32, target_size: u32) -> (u32, u32) {
    if width <= height {
        let scaled = (height as f64 * target_size as f64 / width as f64).round() as u32;
        (target_size, scaled.max(target_size))
    } else {
        let scaled = (width as f64 * target_size as f64 / height as f64).round() as u32;
        (scaled.max(target_size), target_size)
    }
}
