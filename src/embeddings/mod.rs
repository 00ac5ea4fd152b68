// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! CLIP multimodal embeddings
//!
//! Text and images are mapped into one shared 512-dimensional space by the
//! two ONNX towers of CLIP ViT-B/32. Every output vector has unit length.

pub mod clip_text;
pub mod clip_vision;
pub mod combine;
pub mod model_cache;

pub use clip_text::ClipTextEncoder;
pub use clip_vision::ClipVisionEncoder;
pub use combine::{l2_norm, l2_normalize, mean_embedding};
pub use model_cache::{ClipModelCache, ClipModelPaths};

use anyhow::{Context, Result};
use image::DynamicImage;
use ndarray::{ArrayViewD, Axis};
use tracing::info;

/// Output dimension of both CLIP ViT-B/32 towers
pub const CLIP_EMBEDDING_DIM: usize = 512;

pub const CLIP_MODEL_NAME: &str = "clip-ViT-B-32";

/// Encoder that maps text and images into one vector space
pub trait MultimodalEmbedder: Send + Sync {
    fn embed_text(&self, text: &str) -> Result<Vec<f32>>;

    fn embed_image(&self, image: &DynamicImage) -> Result<Vec<f32>>;

    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}

/// Both CLIP towers loaded together
#[derive(Debug, Clone)]
pub struct ClipModel {
    text: ClipTextEncoder,
    vision: ClipVisionEncoder,
}

impl ClipModel {
    /// Build from already resolved model files
    pub async fn from_paths(paths: &ClipModelPaths) -> Result<Self> {
        let text = ClipTextEncoder::new(&paths.text_model, &paths.tokenizer).await?;
        let vision = ClipVisionEncoder::new(&paths.vision_model).await?;
        Ok(Self { text, vision })
    }

    /// Resolve model files through the cache, then load both towers
    pub async fn load(cache: ClipModelCache, offline: bool) -> Result<Self> {
        info!(
            "Resolving CLIP model files in {}",
            cache.model_dir.display()
        );
        let paths = tokio::task::spawn_blocking(move || cache.resolve(offline))
            .await
            .context("Model download task failed")??;

        Self::from_paths(&paths).await
    }
}

impl MultimodalEmbedder for ClipModel {
    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        self.text.embed(text)
    }

    fn embed_image(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        self.vision.embed(image)
    }

    fn dimension(&self) -> usize {
        CLIP_EMBEDDING_DIM
    }

    fn model_name(&self) -> &str {
        CLIP_MODEL_NAME
    }
}

/// First row of a `[batch, dim]` model output
pub(crate) fn first_embedding(output: &ArrayViewD<'_, f32>, expected_dim: usize) -> Result<Vec<f32>> {
    let shape = output.shape();
    if shape.len() != 2 || shape[0] == 0 || shape[1] != expected_dim {
        anyhow::bail!(
            "Model outputs unexpected dimensions: {:?} (expected [batch, {}])",
            shape,
            expected_dim
        );
    }

    Ok(output.index_axis(Axis(0), 0).iter().copied().collect())
}
