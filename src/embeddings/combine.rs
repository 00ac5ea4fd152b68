// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vector arithmetic for combining modality embeddings

use anyhow::Result;

/// Elementwise arithmetic mean of two embeddings
///
/// The result is not renormalized; its length is at most 1 for unit inputs.
pub fn mean_embedding(a: &[f32], b: &[f32]) -> Result<Vec<f32>> {
    if a.is_empty() || b.is_empty() {
        anyhow::bail!("Cannot combine empty embeddings");
    }
    if a.len() != b.len() {
        anyhow::bail!(
            "Embedding dimension mismatch: {} vs {}",
            a.len(),
            b.len()
        );
    }

    Ok(a.iter().zip(b).map(|(x, y)| (x + y) / 2.0).collect())
}

/// Euclidean length of a vector
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Scale a vector to unit length; a zero vector is returned unchanged
pub fn l2_normalize(v: &[f32]) -> Vec<f32> {
    let norm = l2_norm(v);
    if norm > 0.0 {
        v.iter().map(|x| x / norm).collect()
    } else {
        v.to_vec()
    }
}
