// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use image::DynamicImage;
use std::fmt;
use tracing::debug;

use crate::embeddings::{mean_embedding, MultimodalEmbedder};

/// Number of combined values shown in the report
pub const PREVIEW_LEN: usize = 10;

/// Output of one embedding demo run
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingReport {
    pub model_name: String,
    pub text_embedding: Vec<f32>,
    pub image_embedding: Vec<f32>,
    pub combined: Vec<f32>,
}

impl EmbeddingReport {
    pub fn preview(&self) -> &[f32] {
        &self.combined[..self.combined.len().min(PREVIEW_LEN)]
    }
}

impl fmt::Display for EmbeddingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Embedding Info ===")?;
        writeln!(f, "Text Embedding Shape: (1, {})", self.text_embedding.len())?;
        writeln!(f, "Image Embedding Shape: (1, {})", self.image_embedding.len())?;
        writeln!(f, "Combined Embedding Shape: ({},)", self.combined.len())?;
        write!(f, "First {} values: {:?}", PREVIEW_LEN, self.preview())
    }
}

/// Encode one text and one image, then average the two vectors
pub fn build_report<E: MultimodalEmbedder + ?Sized>(
    embedder: &E,
    text: &str,
    image: &DynamicImage,
) -> Result<EmbeddingReport> {
    let text_embedding = embedder
        .embed_text(text)
        .context("Failed to encode text")?;
    let image_embedding = embedder
        .embed_image(image)
        .context("Failed to encode image")?;

    let combined = mean_embedding(&text_embedding, &image_embedding)?;
    debug!(
        "Combined {}D text and {}D image embeddings",
        text_embedding.len(),
        image_embedding.len()
    );

    Ok(EmbeddingReport {
        model_name: embedder.model_name().to_string(),
        text_embedding,
        image_embedding,
        combined,
    })
}
