// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod report;

pub use report::{build_report, EmbeddingReport};

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use crate::embeddings::{ClipModel, ClipModelCache};
use crate::vision::load_image_file;

pub const DEFAULT_TEXT: &str = "Broken glass near the LRT platform entrance.";

/// Embed one text and one image with CLIP and print the averaged vector
#[derive(Parser, Debug, Clone)]
#[command(name = "embed-demo")]
#[command(about = "Encode a text and an image with CLIP ViT-B/32 and average them", long_about = None)]
pub struct EmbedDemoArgs {
    /// Text to encode
    #[arg(long, env = "EMBED_TEXT", default_value = DEFAULT_TEXT)]
    pub text: String,

    /// Image file to encode
    #[arg(long, env = "EMBED_IMAGE_PATH", default_value = "sample_image.jpg")]
    pub image: PathBuf,

    /// Directory holding the CLIP ONNX files
    #[arg(long, env = "CLIP_MODEL_DIR", default_value = crate::embeddings::model_cache::DEFAULT_MODEL_DIR)]
    pub model_dir: PathBuf,

    /// Never download model files
    #[arg(long, env = "CLIP_OFFLINE")]
    pub offline: bool,
}

/// Load the model, encode both inputs and build the report
pub async fn run(args: EmbedDemoArgs) -> Result<EmbeddingReport> {
    let model = ClipModel::load(ClipModelCache::new(&args.model_dir), args.offline).await?;

    let (image, image_info) = load_image_file(&args.image)
        .with_context(|| format!("Failed to load image {}", args.image.display()))?;
    info!(
        "Encoding text ({} chars) and image {} ({}x{})",
        args.text.chars().count(),
        args.image.display(),
        image_info.width,
        image_info.height
    );

    build_report(&model, &args.text, &image)
}
