// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! CLIP model file cache
//!
//! Resolves the text and vision ONNX exports under a local directory and,
//! unless running offline, downloads missing files from the HuggingFace Hub.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Text tower repository on HuggingFace
pub const DEFAULT_TEXT_REPO: &str = "Qdrant/clip-ViT-B-32-text";

/// Vision tower repository on HuggingFace
pub const DEFAULT_VISION_REPO: &str = "Qdrant/clip-ViT-B-32-vision";

/// Default local model directory
pub const DEFAULT_MODEL_DIR: &str = "./models/clip-ViT-B-32";

const TEXT_FILES: &[&str] = &["model.onnx", "tokenizer.json"];
const VISION_FILES: &[&str] = &["model.onnx"];

#[derive(Debug, Clone)]
pub struct ClipModelCache {
    pub model_dir: PathBuf,
    pub text_repo: String,
    pub vision_repo: String,
}

/// Paths to the files needed to build a `ClipModel`
#[derive(Debug, Clone, PartialEq)]
pub struct ClipModelPaths {
    pub text_model: PathBuf,
    pub tokenizer: PathBuf,
    pub vision_model: PathBuf,
}

impl Default for ClipModelCache {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_DIR)
    }
}

impl ClipModelCache {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            text_repo: DEFAULT_TEXT_REPO.to_string(),
            vision_repo: DEFAULT_VISION_REPO.to_string(),
        }
    }

    pub fn text_dir(&self) -> PathBuf {
        self.model_dir.join("text")
    }

    pub fn vision_dir(&self) -> PathBuf {
        self.model_dir.join("vision")
    }

    pub fn paths(&self) -> ClipModelPaths {
        ClipModelPaths {
            text_model: self.text_dir().join("model.onnx"),
            tokenizer: self.text_dir().join("tokenizer.json"),
            vision_model: self.vision_dir().join("model.onnx"),
        }
    }

    /// Check if every model file is present locally
    pub fn is_cached(&self) -> bool {
        missing_files(&self.text_dir(), TEXT_FILES).is_empty()
            && missing_files(&self.vision_dir(), VISION_FILES).is_empty()
    }

    /// Return local model paths, downloading missing files unless `offline`
    ///
    /// Blocking: run it off the async executor.
    pub fn resolve(&self, offline: bool) -> Result<ClipModelPaths> {
        if self.is_cached() {
            debug!("Using cached CLIP model at {}", self.model_dir.display());
            return Ok(self.paths());
        }

        if offline {
            let mut missing = missing_files(&self.text_dir(), TEXT_FILES);
            missing.extend(missing_files(&self.vision_dir(), VISION_FILES));
            anyhow::bail!(
                "CLIP model files missing and downloads are disabled: {}",
                missing
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        download_repo_files(&self.text_repo, &self.text_dir(), TEXT_FILES)?;
        download_repo_files(&self.vision_repo, &self.vision_dir(), VISION_FILES)?;

        Ok(self.paths())
    }
}

fn missing_files(dir: &Path, files: &[&str]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|f| dir.join(f))
        .filter(|p| !p.exists())
        .collect()
}

/// Download files from a HuggingFace repo into `dest_dir`
fn download_repo_files(repo_id: &str, dest_dir: &Path, files: &[&str]) -> Result<()> {
    use hf_hub::api::sync::Api;

    let api = Api::new().context("Failed to initialize HuggingFace Hub client")?;
    let repo = api.model(repo_id.to_string());

    std::fs::create_dir_all(dest_dir)
        .with_context(|| format!("Failed to create {}", dest_dir.display()))?;

    for filename in files {
        let dest_path = dest_dir.join(filename);
        if dest_path.exists() {
            continue;
        }

        info!("📥 Downloading {} from {}", filename, repo_id);
        let source_path = repo
            .get(filename)
            .with_context(|| format!("Failed to download {} from {}", filename, repo_id))?;

        install_file(&source_path, &dest_path)?;
        debug!("Downloaded {} to {}", filename, dest_path.display());
    }

    Ok(())
}

/// Copy `source` to `dest` through a `.part` file renamed into place
///
/// An interrupted copy leaves only the `.part` file, which `is_cached` ignores.
fn install_file(source: &Path, dest: &Path) -> Result<()> {
    let mut partial_name = dest.file_name().unwrap_or_default().to_os_string();
    partial_name.push(".part");
    let partial = dest.with_file_name(partial_name);

    std::fs::copy(source, &partial)
        .with_context(|| format!("Failed to copy {} to {}", source.display(), partial.display()))?;
    std::fs::rename(&partial, dest)
        .with_context(|| format!("Failed to move {} into place", dest.display()))?;
    Ok(())
}
