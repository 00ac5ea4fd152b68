// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! CLIP ViT-B/32 text tower
//!
//! Wraps an ONNX Runtime session and the CLIP BPE tokenizer.
//!
//! Features:
//! - ONNX model loading from disk (CPU execution provider)
//! - Truncation to the 77-token CLIP context
//! - Output dimension validated at load time
//! - L2-normalized 512-dimensional output vectors

use anyhow::{Context, Result};
use ndarray::Array2;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use super::combine::l2_normalize;
use super::{first_embedding, CLIP_EMBEDDING_DIM};

/// CLIP text context length
pub const CLIP_CONTEXT_LENGTH: usize = 77;

/// ONNX-based CLIP text encoder
///
/// # Model Details
/// - Input: `input_ids` and, when the export declares it, `attention_mask`
/// - Output: `[batch, 512]` pooled text embedding
/// - Provider: CPU (ONNX Runtime)
#[derive(Clone)]
pub struct ClipTextEncoder {
    /// ONNX Runtime session (wrapped in Arc<Mutex> for thread-safe shared access)
    session: Arc<Mutex<Session>>,

    tokenizer: Arc<Tokenizer>,

    /// Whether the export takes an attention mask input
    uses_attention_mask: bool,

    dimension: usize,
}

impl std::fmt::Debug for ClipTextEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipTextEncoder")
            .field("uses_attention_mask", &self.uses_attention_mask)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl ClipTextEncoder {
    /// Load the text tower and its tokenizer
    ///
    /// # Errors
    /// Returns error if:
    /// - Model or tokenizer file not found or invalid
    /// - ONNX Runtime initialization fails
    /// - Model doesn't output 512 dimensions
    pub async fn new<P: AsRef<Path>>(model_path: P, tokenizer_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();
        let tokenizer_path = tokenizer_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("CLIP text model not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        info!("Loading CLIP text encoder from {}", model_path.display());

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
                "Failed to load CLIP text model from {}",
                model_path.display()
            ))?;

        let uses_attention_mask = session
            .inputs
            .iter()
            .any(|input| input.name == "attention_mask");
        debug!(
            "CLIP text inputs: {:?}",
            session.inputs.iter().map(|i| &i.name).collect::<Vec<_>>()
        );

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: CLIP_CONTEXT_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        let encoder = Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            uses_attention_mask,
            dimension: CLIP_EMBEDDING_DIM,
        };

        // Probe inference validates the output dimension
        let probe = encoder
            .embed("validation test")
            .context("CLIP text encoder validation failed")?;
        debug!("CLIP text probe produced {} dimensions", probe.len());

        info!(
            "✅ CLIP text encoder loaded successfully (CPU-only, {}D embeddings)",
            encoder.dimension
        );

        Ok(encoder)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Encode a text into a unit-length embedding
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();

        let input_ids_array = Array2::from_shape_vec((1, input_ids.len()), input_ids)
            .context("Failed to create input_ids array")?;
        let attention_mask_array =
            Array2::from_shape_vec((1, attention_mask.len()), attention_mask)
                .context("Failed to create attention_mask array")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("CLIP text session lock poisoned"))?;

        let outputs = if self.uses_attention_mask {
            session.run(ort::inputs![
                "input_ids" => Value::from_array(input_ids_array)?,
                "attention_mask" => Value::from_array(attention_mask_array)?
            ])?
        } else {
            session.run(ort::inputs![
                "input_ids" => Value::from_array(input_ids_array)?
            ])?
        };

        // Index [0]: exports name the pooled output differently
        let output_array = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        let embedding = first_embedding(&output_array, self.dimension)?;
        Ok(l2_normalize(&embedding))
    }
}
