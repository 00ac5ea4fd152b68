// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! CLIP ViT-B/32 vision tower
//!
//! Maps a preprocessed 224x224 image into the shared 512-dimensional
//! text/image space. Runs on CPU only.

use anyhow::{Context, Result};
use image::DynamicImage;
use ndarray::Array4;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::combine::l2_normalize;
use super::{first_embedding, CLIP_EMBEDDING_DIM};
use crate::vision::{preprocess_for_clip, CLIP_INPUT_SIZE};

#[derive(Clone)]
pub struct ClipVisionEncoder {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    dimension: usize,
}

impl std::fmt::Debug for ClipVisionEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipVisionEncoder")
            .field("input_name", &self.input_name)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl ClipVisionEncoder {
    /// Load the vision tower from an ONNX file
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    /// - Model doesn't output 512 dimensions
    pub async fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("CLIP vision model not found: {}", model_path.display());
        }

        info!("Loading CLIP vision encoder from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load CLIP vision model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "pixel_values".to_string());

        debug!("CLIP vision encoder loaded - input: {}", input_name);

        let encoder = Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            dimension: CLIP_EMBEDDING_DIM,
        };

        // Probe inference on a blank frame validates the output dimension
        let probe = DynamicImage::new_rgb8(CLIP_INPUT_SIZE, CLIP_INPUT_SIZE);
        encoder
            .embed(&probe)
            .context("CLIP vision encoder validation failed")?;

        info!(
            "✅ CLIP vision encoder loaded successfully (CPU-only, {}D embeddings)",
            encoder.dimension
        );

        Ok(encoder)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Preprocess and encode an image into a unit-length embedding
    pub fn embed(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        let pixel_values = preprocess_for_clip(image);
        self.encode(pixel_values)
    }

    /// Encode an already preprocessed `[1, 3, 224, 224]` tensor
    pub fn encode(&self, pixel_values: Array4<f32>) -> Result<Vec<f32>> {
        let shape = pixel_values.shape();
        if shape.len() != 4 || shape[0] != 1 || shape[1] != 3 {
            anyhow::bail!("Invalid input shape: {:?}, expected [1, 3, H, W]", shape);
        }

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("CLIP vision session lock poisoned"))?;

        let input_value =
            Value::from_array(pixel_values).context("Failed to create input tensor")?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_value])
            .context("Vision encoder inference failed")?;

        let output_array = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;
        debug!("Vision encoder output shape: {:?}", output_array.shape());

        let embedding = first_embedding(&output_array, self.dimension)?;
        Ok(l2_normalize(&embedding))
    }
}
