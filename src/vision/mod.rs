// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image loading and CLIP preprocessing
//!
//! Runs on CPU only; the result feeds the CLIP vision encoder.

pub mod image_utils;
pub mod preprocessing;

pub use image_utils::{decode_image_bytes, detect_format, load_image_file, ImageError, ImageInfo};
pub use preprocessing::{preprocess_for_clip, CLIP_INPUT_SIZE, CLIP_MEAN, CLIP_STD};
